// File: crates/plotchain-core/src/chain.rs
// Summary: Chain (accumulated plot specs + flagged global options) and the per-stage accumulator.

use std::fmt::Write as _;

use crate::columns::ColumnSource;
use crate::error::{ColumnError, Result};
use crate::options::{GlobalOptions, OptionContext};
use crate::plot::{PlotArgs, PlotSpec};

/// The unit passed between stages.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Chain {
    pub plots: Vec<PlotSpec>,
    pub options: GlobalOptions,
}

impl Chain {
    /// No plots, no options: what a stage sees when nothing is piped in.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.plots.is_empty() && self.options.is_empty()
    }

    pub fn add_plot(&mut self, plot: PlotSpec) {
        self.plots.push(plot);
    }

    /// One line per plot plus the options, for debug logs.
    pub fn describe(&self) -> String {
        let mut out = format!("chain: {} plot(s)", self.plots.len());
        for (i, p) in self.plots.iter().enumerate() {
            let s = p.style();
            let _ = write!(
                out,
                "\n  [{i}] {} x {} point(s), legend={:?} color={:?} style={:?} marker={:?} output={:?} sort={}",
                p.x().kind(),
                p.len(),
                s.legend,
                s.color,
                s.style,
                s.marker,
                s.output,
                s.sort,
            );
        }
        let _ = write!(out, "\n  options: {:?}", self.options);
        out
    }
}

/// What one stage contributes: per-plot tuples and its own global options.
#[derive(Clone, Debug, Default)]
pub struct StageArgs {
    pub plots: PlotArgs,
    pub globals: GlobalOptions,
}

/// Turns (stage args, upstream chain) into the outgoing chain.
///
/// Holds the stage's option context by reference so the caller can finalize
/// it for rendering once accumulation is done.
pub struct ChainAccumulator<'a, S: ColumnSource + ?Sized> {
    context: &'a mut OptionContext,
    source: &'a S,
}

impl<'a, S: ColumnSource + ?Sized> ChainAccumulator<'a, S> {
    pub fn new(context: &'a mut OptionContext, source: &'a S) -> Self {
        Self { context, source }
    }

    /// Merge options and append this stage's plots after the inherited ones.
    ///
    /// The upstream option set is merged into the context first, then the
    /// stage's own set on top. Argument shape is checked before anything
    /// is merged or read.
    pub fn build(&mut self, args: &StageArgs, incoming: Chain) -> Result<Chain> {
        let tuples = args.plots.tuples()?;

        let Chain { plots, options } = incoming;
        let inherited = plots.len();
        self.context.merge(options);
        self.context.merge(args.globals.clone());

        let mut chain = Chain { plots, options: GlobalOptions::empty() };
        chain.plots.reserve(tuples.len());
        for t in tuples {
            let x = self.source.column(t.xcol)?.into_x();
            let y = self.source.column(t.ycol)?.into_y(t.ycol)?;
            let plot = PlotSpec::build(x, y, t.style).map_err(|e| match e {
                ColumnError::Length { expected, found, .. } => ColumnError::Length {
                    reference: t.ycol.to_string(),
                    expected,
                    found,
                },
                other => other,
            })?;
            chain.add_plot(plot);
        }

        tracing::info!(inherited, added = chain.plots.len() - inherited, "accumulated plots");
        chain.options = self.context.options().clone();
        Ok(chain)
    }
}
