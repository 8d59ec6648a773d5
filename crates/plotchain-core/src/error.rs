// File: crates/plotchain-core/src/error.rs
// Summary: Error taxonomy for chain decoding, argument shape checks and column lookup.

use thiserror::Error;

/// Fatal errors that abort a pipeline stage before anything is forwarded.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The upstream envelope did not decode to (plot specs, option map).
    #[error("malformed chain: {reason}")]
    MalformedChain { reason: String },

    /// Per-plot argument sequences disagree on the number of plots.
    #[error("argument shape mismatch: `{field}` has {found} value(s), expected {expected}")]
    ArgumentShape {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("cannot encode chain: {0}")]
    Encode(#[from] bincode::Error),

    #[error(transparent)]
    Column(#[from] ColumnError),

    #[error("chain i/o: {0}")]
    Io(#[from] std::io::Error),
}

impl ChainError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedChain { reason: reason.into() }
    }
}

/// Failures resolving a column reference against a column source.
#[derive(Debug, Error)]
pub enum ColumnError {
    #[error("no column named or indexed `{0}`")]
    Missing(String),

    #[error("column `{0}` is not numeric")]
    NotNumeric(String),

    #[error("column `{reference}` has {found} rows, expected {expected}")]
    Length {
        reference: String,
        expected: usize,
        found: usize,
    },

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("column i/o: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = ChainError> = std::result::Result<T, E>;
