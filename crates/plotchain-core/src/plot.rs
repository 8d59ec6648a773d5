// File: crates/plotchain-core/src/plot.rs
// Summary: PlotSpec (one styled series) and the parallel per-plot argument sequences a stage supplies.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ChainError, ColumnError, Result};
use crate::series::{coerce_time_pairs, sort_pairs, XSeries};

/// Per-plot styling and routing, everything except the data itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotStyle {
    pub legend: Option<String>,
    pub color: Option<String>,
    pub style: Option<String>,
    pub marker: Option<String>,
    pub linewidth: Option<f64>,
    pub markersize: Option<f64>,
    /// Writing the figure here happens right after this plot is drawn.
    pub output: Option<PathBuf>,
    pub time_format: Option<String>,
    /// Carried verbatim; never interpreted.
    pub resample: Option<String>,
    pub sort: bool,
}

/// One renderable series with its styling. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlotSpec {
    x: XSeries,
    y: Vec<f64>,
    style: PlotStyle,
}

impl PlotSpec {
    /// Build a spec from raw column data.
    ///
    /// Applies time coercion to `x` (best effort) and, if requested, sorts
    /// both series by x. Fails only when `x` and `y` differ in length.
    pub fn build(x: XSeries, y: Vec<f64>, style: PlotStyle) -> Result<Self, ColumnError> {
        if x.len() != y.len() {
            return Err(ColumnError::Length {
                reference: "y".into(),
                expected: x.len(),
                found: y.len(),
            });
        }
        let (x, y) = coerce_time_pairs(x, y, style.time_format.as_deref());
        let (x, y) = if style.sort { sort_pairs(x, y) } else { (x, y) };
        Ok(Self { x, y, style })
    }

    pub fn x(&self) -> &XSeries {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn style(&self) -> &PlotStyle {
        &self.style
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Decoded specs bypass [`PlotSpec::build`]; this re-checks the pairing.
    pub(crate) fn is_consistent(&self) -> bool {
        self.x.len() == self.y.len()
    }
}

/// Per-plot arguments of one stage, as parallel sequences.
///
/// Entry `i` of every sequence belongs to plot `i`; all sequences must have
/// the same length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlotArgs {
    pub xcol: Vec<String>,
    pub ycol: Vec<String>,
    pub legend: Vec<Option<String>>,
    pub color: Vec<Option<String>>,
    pub style: Vec<Option<String>>,
    pub marker: Vec<Option<String>>,
    pub linewidth: Vec<Option<f64>>,
    pub markersize: Vec<Option<f64>>,
    pub output: Vec<Option<PathBuf>>,
    pub time_format: Vec<Option<String>>,
    pub resample: Vec<Option<String>>,
    pub sort: Vec<bool>,
}

/// One plot's slice across [`PlotArgs`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlotTuple<'a> {
    pub xcol: &'a str,
    pub ycol: &'a str,
    pub style: PlotStyle,
}

impl PlotArgs {
    fn lengths(&self) -> [(&'static str, usize); 12] {
        [
            ("xcol", self.xcol.len()),
            ("ycol", self.ycol.len()),
            ("legend", self.legend.len()),
            ("color", self.color.len()),
            ("style", self.style.len()),
            ("marker", self.marker.len()),
            ("linewidth", self.linewidth.len()),
            ("markersize", self.markersize.len()),
            ("output", self.output.len()),
            ("time_format", self.time_format.len()),
            ("resample", self.resample.len()),
            ("sort", self.sort.len()),
        ]
    }

    /// Number of plots requested, taken from `ycol`.
    pub fn plot_count(&self) -> Result<usize> {
        let expected = self.ycol.len();
        match self.lengths().into_iter().find(|&(_, n)| n != expected) {
            Some((field, found)) => Err(ChainError::ArgumentShape { field, expected, found }),
            None => Ok(expected),
        }
    }

    /// Split into one tuple per plot, after checking the shape.
    pub fn tuples(&self) -> Result<Vec<PlotTuple<'_>>> {
        let n = self.plot_count()?;
        Ok((0..n)
            .map(|i| PlotTuple {
                xcol: &self.xcol[i],
                ycol: &self.ycol[i],
                style: PlotStyle {
                    legend: self.legend[i].clone(),
                    color: self.color[i].clone(),
                    style: self.style[i].clone(),
                    marker: self.marker[i].clone(),
                    linewidth: self.linewidth[i],
                    markersize: self.markersize[i],
                    output: self.output[i].clone(),
                    time_format: self.time_format[i].clone(),
                    resample: self.resample[i].clone(),
                    sort: self.sort[i],
                },
            })
            .collect())
    }
}
