// File: crates/plotchain/src/args.rs
// Summary: Command-line surface of one stage and its conversion into per-plot tuples and flagged globals.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use plotchain_core::types::{DEFAULT_FIGSIZE, DEFAULT_FONTSIZE};
use plotchain_core::{GlobalOptions, PlotArgs, Setting, StageArgs};

/// Where the accumulated chain goes when the stage finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Forward {
    /// Forward when stdout is piped, render when it is a terminal
    Auto,
    Always,
    Never,
}

#[derive(Parser, Debug)]
#[command(
    name = "plotchain",
    version,
    about = "Add plots to a chain of stages; pipe into the next stage or render at the end"
)]
pub struct Cli {
    /// CSV file holding the columns, or `-` to read it from stdin (no upstream chain then)
    pub file: String,

    /// X column (header name or zero-based index); one per plot, defaults to column 0
    #[arg(short = 'x', long)]
    pub xcol: Vec<String>,
    /// Y column (header name or zero-based index); one per plot
    #[arg(short = 'y', long, required = true)]
    pub ycol: Vec<String>,
    #[arg(long)]
    pub legend: Vec<String>,
    #[arg(long)]
    pub color: Vec<String>,
    /// Line style: - -- -. : none
    #[arg(long)]
    pub style: Vec<String>,
    /// Marker: . o s ^ v D x + *
    #[arg(long)]
    pub marker: Vec<String>,
    #[arg(long)]
    pub linewidth: Vec<f64>,
    #[arg(long)]
    pub markersize: Vec<f64>,
    /// Save the figure here right after this plot is drawn
    #[arg(short = 'o', long)]
    pub output: Vec<PathBuf>,
    /// strftime-style pattern for parsing the x column as timestamps
    #[arg(long)]
    pub time_format: Vec<String>,
    /// Resample policy, carried along unchanged
    #[arg(long)]
    pub resample: Vec<String>,
    /// Sort the plot's points by x
    #[arg(long, action = ArgAction::Append, value_parser = clap::value_parser!(bool))]
    pub sort: Vec<bool>,

    #[arg(long)]
    pub xlabel: Option<String>,
    #[arg(long)]
    pub ylabel: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
    /// Distance between x ticks
    #[arg(long)]
    pub xscale: Option<f64>,
    /// Distance between y ticks
    #[arg(long)]
    pub yscale: Option<f64>,
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
    pub xrange: Option<Vec<f64>>,
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
    pub yrange: Option<Vec<f64>>,
    /// Figure size in inches
    #[arg(long, num_args = 2, value_names = ["W", "H"])]
    pub figsize: Option<Vec<f64>>,
    #[arg(long)]
    pub fontsize: Option<f64>,
    #[arg(long)]
    pub xtick_fontsize: Option<f64>,
    #[arg(long)]
    pub ytick_fontsize: Option<f64>,
    #[arg(long)]
    pub xlabel_fontsize: Option<f64>,
    #[arg(long)]
    pub ylabel_fontsize: Option<f64>,

    /// CSV field delimiter
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,
    /// The CSV has no header row; refer to columns by index
    #[arg(long)]
    pub no_header: bool,
    #[arg(long, default_value = "light", value_parser = ["light", "dark"])]
    pub theme: String,
    #[arg(long, value_enum, default_value_t = Forward::Auto)]
    pub forward: Forward,
    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// An option given zero times applies its default to every plot; any
/// other count is passed through for the shape check.
fn fill<T: Clone>(values: Vec<T>, plots: usize, default: T) -> Vec<T> {
    if values.is_empty() {
        vec![default; plots]
    } else {
        values
    }
}

fn optional<T>(values: Vec<T>) -> Vec<Option<T>> {
    values.into_iter().map(Some).collect()
}

/// Empty strings mean "not set" for text options.
fn optional_text(values: Vec<String>) -> Vec<Option<String>> {
    values.into_iter().map(|s| if s.is_empty() { None } else { Some(s) }).collect()
}

fn pair(v: Option<Vec<f64>>) -> Option<(f64, f64)> {
    v.and_then(|v| match v.as_slice() {
        [a, b] => Some((*a, *b)),
        _ => None,
    })
}

impl Cli {
    pub fn stage_args(&self) -> StageArgs {
        let n = self.ycol.len();
        let plots = PlotArgs {
            xcol: fill(self.xcol.clone(), n, "0".to_string()),
            ycol: self.ycol.clone(),
            legend: fill(optional_text(self.legend.clone()), n, None),
            color: fill(optional_text(self.color.clone()), n, None),
            style: fill(optional_text(self.style.clone()), n, None),
            marker: fill(optional_text(self.marker.clone()), n, None),
            linewidth: fill(optional(self.linewidth.clone()), n, None),
            markersize: fill(optional(self.markersize.clone()), n, None),
            output: fill(optional(self.output.clone()), n, None),
            time_format: fill(optional_text(self.time_format.clone()), n, None),
            resample: fill(optional_text(self.resample.clone()), n, None),
            sort: fill(self.sort.clone(), n, false),
        };
        StageArgs { plots, globals: self.globals() }
    }

    /// Options given on the command line are explicit; figure and font size
    /// fall back to carried defaults.
    pub fn globals(&self) -> GlobalOptions {
        let explicit = |v: Option<f64>| Setting::from_parts(v, true);
        let figsize = match pair(self.figsize.clone()) {
            Some(v) => Setting::Explicit(v),
            None => Setting::Default(DEFAULT_FIGSIZE),
        };
        let fontsize = match self.fontsize {
            Some(v) => Setting::Explicit(v),
            None => Setting::Default(DEFAULT_FONTSIZE),
        };
        GlobalOptions {
            xlabel: Setting::from_parts(self.xlabel.clone(), true),
            ylabel: Setting::from_parts(self.ylabel.clone(), true),
            title: Setting::from_parts(self.title.clone(), true),
            xscale: explicit(self.xscale),
            yscale: explicit(self.yscale),
            xrange: Setting::from_parts(pair(self.xrange.clone()), true),
            yrange: Setting::from_parts(pair(self.yrange.clone()), true),
            figsize,
            fontsize,
            xtick_fontsize: explicit(self.xtick_fontsize),
            ytick_fontsize: explicit(self.ytick_fontsize),
            xlabel_fontsize: explicit(self.xlabel_fontsize),
            ylabel_fontsize: explicit(self.ylabel_fontsize),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotchain_core::ChainError;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("plotchain").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn unspecified_per_plot_options_fill_to_plot_count() {
        let cli = parse(&["data.csv", "-x", "t", "-x", "t", "-y", "a", "-y", "b"]);
        let stage = cli.stage_args();
        assert_eq!(stage.plots.plot_count().unwrap(), 2);
        assert_eq!(stage.plots.sort, vec![false, false]);
        assert_eq!(stage.plots.legend, vec![None, None]);
    }

    #[test]
    fn partial_options_surface_as_shape_errors() {
        let cli = parse(&["data.csv", "-y", "a", "-y", "b", "--color", "r"]);
        let err = cli.stage_args().plots.plot_count().unwrap_err();
        assert!(matches!(err, ChainError::ArgumentShape { field: "color", expected: 2, found: 1 }));
    }

    #[test]
    fn command_line_globals_are_explicit() {
        let cli = parse(&["data.csv", "-y", "a", "--title", "T", "--xrange", "-1", "2"]);
        let g = cli.globals();
        assert_eq!(g.title, Setting::Explicit("T".to_string()));
        assert_eq!(g.xrange, Setting::Explicit((-1.0, 2.0)));
        assert_eq!(g.figsize, Setting::Default(DEFAULT_FIGSIZE));
        assert!(g.ylabel.is_unset());
    }

    #[test]
    fn sort_takes_booleans() {
        let cli = parse(&["data.csv", "-y", "a", "--sort", "true"]);
        assert_eq!(cli.stage_args().plots.sort, vec![true]);
    }
}
