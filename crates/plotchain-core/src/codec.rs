// File: crates/plotchain-core/src/codec.rs
// Summary: Chain envelope encode/decode with shape validation, and the stdin gating rule for upstream input.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::chain::Chain;
use crate::error::{ChainError, Result};
use crate::options::{GlobalOptions, Setting, OPTION_NAMES};
use crate::plot::PlotSpec;

/// Leading bytes of every envelope.
pub const MAGIC: &[u8; 4] = b"PLCH";
/// Envelope layout version written by this build.
pub const VERSION: u16 = 1;
/// Input file name meaning "columns come from stdin, there is no upstream chain".
pub const STDIN_SENTINEL: &str = "-";

/// Wire form of one option value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum OptionValue {
    Text(String),
    Number(f64),
    Pair(f64, f64),
}

/// Option value plus its explicit flag.
pub type OptionEntry = (OptionValue, bool);

/// Option name → entry. Unset options are not present.
pub type OptionMap = BTreeMap<String, OptionEntry>;

type Payload = (Vec<PlotSpec>, OptionMap);

fn wire() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Serialize a chain into envelope bytes.
pub fn encode(chain: &Chain) -> Result<Vec<u8>> {
    let payload: (&[PlotSpec], OptionMap) = (chain.plots.as_slice(), options_to_map(&chain.options));
    let body = wire().serialize(&payload)?;
    let mut out = Vec::with_capacity(MAGIC.len() + 2 + body.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&body);
    Ok(out)
}

/// Parse envelope bytes. Empty input is the empty chain.
pub fn decode(bytes: &[u8]) -> Result<Chain> {
    if bytes.is_empty() {
        return Ok(Chain::empty());
    }
    let header = MAGIC.len() + 2;
    if bytes.len() < header || &bytes[..MAGIC.len()] != MAGIC {
        return Err(ChainError::malformed("missing envelope header"));
    }
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != VERSION {
        return Err(ChainError::malformed(format!("unsupported envelope version {version}")));
    }
    let (plots, map): Payload = wire()
        .deserialize(&bytes[header..])
        .map_err(|e| ChainError::malformed(format!("payload is not (plots, options): {e}")))?;
    if let Some(i) = plots.iter().position(|p| !p.is_consistent()) {
        return Err(ChainError::malformed(format!("plot {i} has unpaired x/y series")));
    }
    let options = options_from_map(map)?;
    Ok(Chain { plots, options })
}

/// Whether a stage should look for an upstream chain on stdin.
pub fn should_read_upstream(stdin_is_terminal: bool, input_file: &str) -> bool {
    !stdin_is_terminal && input_file != STDIN_SENTINEL
}

/// Read and decode the upstream chain, or return the empty chain without
/// touching `reader` when gating says there is none.
pub fn read_upstream<R: Read>(reader: &mut R, stdin_is_terminal: bool, input_file: &str) -> Result<Chain> {
    if !should_read_upstream(stdin_is_terminal, input_file) {
        tracing::debug!(input_file, stdin_is_terminal, "no upstream chain");
        return Ok(Chain::empty());
    }
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let chain = decode(&bytes)?;
    tracing::info!(plots = chain.plots.len(), bytes = bytes.len(), "decoded upstream chain");
    tracing::debug!("{}", chain.describe());
    Ok(chain)
}

/// Encode fully, then write in one go so a failed encode leaves `writer` untouched.
pub fn write_chain<W: Write>(writer: &mut W, chain: &Chain) -> Result<()> {
    let bytes = encode(chain)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    tracing::info!(plots = chain.plots.len(), bytes = bytes.len(), "forwarded chain");
    Ok(())
}

fn put<T>(map: &mut OptionMap, name: &str, setting: &Setting<T>, wrap: impl Fn(&T) -> OptionValue) {
    if let Some(v) = setting.value() {
        map.insert(name.to_string(), (wrap(v), setting.is_explicit()));
    }
}

/// Flatten the flagged option set into its wire map.
pub fn options_to_map(o: &GlobalOptions) -> OptionMap {
    let text = |v: &String| OptionValue::Text(v.clone());
    let num = |v: &f64| OptionValue::Number(*v);
    let pair = |v: &(f64, f64)| OptionValue::Pair(v.0, v.1);

    let mut m = OptionMap::new();
    put(&mut m, "xlabel", &o.xlabel, text);
    put(&mut m, "ylabel", &o.ylabel, text);
    put(&mut m, "title", &o.title, text);
    put(&mut m, "xscale", &o.xscale, num);
    put(&mut m, "yscale", &o.yscale, num);
    put(&mut m, "xrange", &o.xrange, pair);
    put(&mut m, "yrange", &o.yrange, pair);
    put(&mut m, "figsize", &o.figsize, pair);
    put(&mut m, "fontsize", &o.fontsize, num);
    put(&mut m, "xtick_fontsize", &o.xtick_fontsize, num);
    put(&mut m, "ytick_fontsize", &o.ytick_fontsize, num);
    put(&mut m, "xlabel_fontsize", &o.xlabel_fontsize, num);
    put(&mut m, "ylabel_fontsize", &o.ylabel_fontsize, num);
    m
}

/// Rebuild the flagged option set, rejecting unknown names and mistyped values.
pub fn options_from_map(map: OptionMap) -> Result<GlobalOptions> {
    let mut o = GlobalOptions::empty();
    for (name, (value, explicit)) in map {
        let mismatch = |want: &str| ChainError::malformed(format!("option `{name}` must be {want}"));
        match name.as_str() {
            "xlabel" | "ylabel" | "title" => {
                let OptionValue::Text(v) = value else { return Err(mismatch("text")) };
                let slot = match name.as_str() {
                    "xlabel" => &mut o.xlabel,
                    "ylabel" => &mut o.ylabel,
                    _ => &mut o.title,
                };
                *slot = Setting::from_parts(Some(v), explicit);
            }
            "xrange" | "yrange" | "figsize" => {
                let OptionValue::Pair(a, b) = value else { return Err(mismatch("a pair")) };
                let slot = match name.as_str() {
                    "xrange" => &mut o.xrange,
                    "yrange" => &mut o.yrange,
                    _ => &mut o.figsize,
                };
                *slot = Setting::from_parts(Some((a, b)), explicit);
            }
            n if OPTION_NAMES.contains(&n) => {
                let OptionValue::Number(v) = value else { return Err(mismatch("a number")) };
                let slot = match n {
                    "xscale" => &mut o.xscale,
                    "yscale" => &mut o.yscale,
                    "fontsize" => &mut o.fontsize,
                    "xtick_fontsize" => &mut o.xtick_fontsize,
                    "ytick_fontsize" => &mut o.ytick_fontsize,
                    "xlabel_fontsize" => &mut o.xlabel_fontsize,
                    _ => &mut o.ylabel_fontsize,
                };
                *slot = Setting::from_parts(Some(v), explicit);
            }
            _ => return Err(ChainError::malformed(format!("unknown option `{name}`"))),
        }
    }
    Ok(o)
}
