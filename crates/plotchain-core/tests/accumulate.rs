// File: crates/plotchain-core/tests/accumulate.rs
// Purpose: Stage accumulation: order preservation, sorting, best-effort time parsing, shape errors.

use std::collections::HashMap;

use plotchain_core::{
    decode, encode, Chain, ChainAccumulator, ChainError, Column, ColumnError, ColumnSource, CsvColumns, CsvOptions,
    GlobalOptions, OptionContext, PlotArgs, Setting, StageArgs, XSeries,
};

#[derive(Default)]
struct MapSource(HashMap<&'static str, Column>);

impl MapSource {
    fn with(mut self, name: &'static str, col: Column) -> Self {
        self.0.insert(name, col);
        self
    }
}

impl ColumnSource for MapSource {
    fn column(&self, reference: &str) -> Result<Column, ColumnError> {
        self.0.get(reference).cloned().ok_or_else(|| ColumnError::Missing(reference.to_string()))
    }
}

fn text(v: &[&str]) -> Column {
    Column::Text(v.iter().map(|s| s.to_string()).collect())
}

/// `n` plots of (x, y) with every optional field left unset.
fn plot_args(pairs: &[(&str, &str)], sort: bool) -> PlotArgs {
    let n = pairs.len();
    PlotArgs {
        xcol: pairs.iter().map(|p| p.0.to_string()).collect(),
        ycol: pairs.iter().map(|p| p.1.to_string()).collect(),
        legend: vec![None; n],
        color: vec![None; n],
        style: vec![None; n],
        marker: vec![None; n],
        linewidth: vec![None; n],
        markersize: vec![None; n],
        output: vec![None; n],
        time_format: vec![None; n],
        resample: vec![None; n],
        sort: vec![sort; n],
    }
}

fn run_stage(source: &MapSource, args: &StageArgs, incoming: Chain) -> Result<Chain, ChainError> {
    let mut ctx = OptionContext::new();
    ChainAccumulator::new(&mut ctx, source).build(args, incoming)
}

fn source() -> MapSource {
    MapSource::default()
        .with("x", Column::Numeric(vec![3.0, 1.0, 2.0]))
        .with("y", Column::Numeric(vec![30.0, 10.0, 20.0]))
        .with("z", Column::Numeric(vec![0.3, 0.1, 0.2]))
        .with("dates", text(&["2024-03-01", "2024-01-01", "2024-02-01"]))
        .with("junk", text(&["not-a-date", "also-not", "nope"]))
        .with("label", text(&["c", "a", "b"]))
}

#[test]
fn sort_reorders_pairs_together() {
    let args = StageArgs { plots: plot_args(&[("x", "y")], true), globals: GlobalOptions::default() };
    let chain = run_stage(&source(), &args, Chain::empty()).unwrap();
    let p = &chain.plots[0];
    assert_eq!(p.x(), &XSeries::Numeric(vec![1.0, 2.0, 3.0]));
    assert_eq!(p.y(), &[10.0, 20.0, 30.0]);
}

#[test]
fn unsorted_plots_keep_input_order() {
    let args = StageArgs { plots: plot_args(&[("x", "y")], false), globals: GlobalOptions::default() };
    let chain = run_stage(&source(), &args, Chain::empty()).unwrap();
    assert_eq!(chain.plots[0].x(), &XSeries::Numeric(vec![3.0, 1.0, 2.0]));
}

#[test]
fn new_plots_append_after_inherited_ones() {
    let src = source();
    let first = StageArgs { plots: plot_args(&[("x", "y"), ("x", "z")], false), globals: GlobalOptions::default() };
    let inherited = run_stage(&src, &first, Chain::empty()).unwrap();
    let inherited = decode(&encode(&inherited).unwrap()).unwrap();

    let second = StageArgs { plots: plot_args(&[("label", "y"), ("dates", "z"), ("x", "y")], true), globals: GlobalOptions::default() };
    let chain = run_stage(&src, &second, inherited.clone()).unwrap();

    assert_eq!(chain.plots.len(), 5);
    assert_eq!(&chain.plots[..2], &inherited.plots[..]);
    assert_eq!(chain.plots[2].x(), &XSeries::Text(vec!["a".into(), "b".into(), "c".into()]));
    assert!(matches!(chain.plots[3].x(), XSeries::Time(_)));
}

#[test]
fn text_dates_become_timestamps_and_sort_chronologically() {
    let args = StageArgs { plots: plot_args(&[("dates", "y")], true), globals: GlobalOptions::default() };
    let chain = run_stage(&source(), &args, Chain::empty()).unwrap();
    match chain.plots[0].x() {
        XSeries::Time(t) => assert_eq!(t[0].to_string(), "2024-01-01 00:00:00"),
        other => panic!("expected timestamps, got {other:?}"),
    }
    assert_eq!(chain.plots[0].y(), &[10.0, 20.0, 30.0]);
}

#[test]
fn unparseable_text_is_kept_as_is() {
    let args = StageArgs { plots: plot_args(&[("junk", "y")], false), globals: GlobalOptions::default() };
    let chain = run_stage(&source(), &args, Chain::empty()).unwrap();
    assert_eq!(
        chain.plots[0].x(),
        &XSeries::Text(vec!["not-a-date".into(), "also-not".into(), "nope".into()])
    );
}

#[test]
fn mismatched_argument_lengths_fail_before_any_work() {
    let mut plots = plot_args(&[("x", "y"), ("x", "z")], false);
    plots.marker.pop();
    let args = StageArgs { plots, globals: GlobalOptions { title: Setting::Explicit("t".into()), ..GlobalOptions::default() } };

    let mut ctx = OptionContext::new();
    let err = ChainAccumulator::new(&mut ctx, &source()).build(&args, Chain::empty()).unwrap_err();
    assert!(matches!(err, ChainError::ArgumentShape { field: "marker", expected: 2, found: 1 }));
    assert!(ctx.options().is_empty(), "options must not be merged on a shape error");
}

#[test]
fn text_y_column_is_rejected() {
    let args = StageArgs { plots: plot_args(&[("x", "label")], false), globals: GlobalOptions::default() };
    let err = run_stage(&source(), &args, Chain::empty()).unwrap_err();
    assert!(matches!(err, ChainError::Column(ColumnError::NotNumeric(ref c)) if c == "label"));
}

#[test]
fn missing_column_is_reported_by_name() {
    let args = StageArgs { plots: plot_args(&[("x", "nope")], false), globals: GlobalOptions::default() };
    let err = run_stage(&source(), &args, Chain::empty()).unwrap_err();
    assert!(err.to_string().contains("nope"));
}

#[test]
fn stage_options_merge_over_upstream() {
    let upstream = Chain {
        plots: Vec::new(),
        options: GlobalOptions {
            title: Setting::Explicit("kept".into()),
            xlabel: Setting::Explicit("old".into()),
            figsize: Setting::Default((6.4, 4.8)),
            ..GlobalOptions::default()
        },
    };
    let stage = StageArgs {
        plots: plot_args(&[], false),
        globals: GlobalOptions {
            xlabel: Setting::Explicit("new".into()),
            figsize: Setting::Default((8.0, 3.0)),
            title: Setting::Default("ignored".into()),
            ..GlobalOptions::default()
        },
    };
    let chain = run_stage(&source(), &stage, upstream).unwrap();
    assert_eq!(chain.options.title, Setting::Explicit("kept".into()));
    assert_eq!(chain.options.xlabel, Setting::Explicit("new".into()));
    assert_eq!(chain.options.figsize, Setting::Default((8.0, 3.0)));
}

#[test]
fn csv_source_feeds_the_accumulator() {
    let csv = "when,temp\n2024-01-02,3.5\n2024-01-01,1.5\n";
    let cols = CsvColumns::from_reader(csv.as_bytes(), CsvOptions::default()).unwrap();
    let mut args = plot_args(&[("when", "temp")], true);
    args.legend = vec![Some("temp".into())];
    let stage = StageArgs { plots: args, globals: GlobalOptions::default() };

    let mut ctx = OptionContext::new();
    let chain = ChainAccumulator::new(&mut ctx, &cols).build(&stage, Chain::empty()).unwrap();
    assert!(matches!(chain.plots[0].x(), XSeries::Time(t) if t.len() == 2));
    assert_eq!(chain.plots[0].y(), &[1.5, 3.5]);
    assert_eq!(chain.plots[0].style().legend.as_deref(), Some("temp"));
}

#[test]
fn blank_date_cells_are_skipped_points() {
    let csv = "when,temp\n2024-01-01,1.0\n,2.0\n2024-01-03,3.0\n";
    let cols = CsvColumns::from_reader(csv.as_bytes(), CsvOptions::default()).unwrap();
    let stage = StageArgs { plots: plot_args(&[("when", "temp")], false), globals: GlobalOptions::default() };

    let mut ctx = OptionContext::new();
    let chain = ChainAccumulator::new(&mut ctx, &cols).build(&stage, Chain::empty()).unwrap();
    assert!(matches!(chain.plots[0].x(), XSeries::Time(t) if t.len() == 2));
    assert_eq!(chain.plots[0].y(), &[1.0, 3.0]);
}

#[test]
fn clock_times_parse_with_an_explicit_format() {
    let src = MapSource::default()
        .with("clock", text(&["12:30:00", "12:31:00"]))
        .with("v", Column::Numeric(vec![1.0, 2.0]));
    let mut plots = plot_args(&[("clock", "v")], false);
    plots.time_format = vec![Some("%H:%M:%S".into())];
    let stage = StageArgs { plots, globals: GlobalOptions::default() };
    let chain = run_stage(&src, &stage, Chain::empty()).unwrap();
    match chain.plots[0].x() {
        XSeries::Time(t) => assert_eq!(t[1].to_string(), "1900-01-01 12:31:00"),
        other => panic!("expected timestamps, got {other:?}"),
    }
}
