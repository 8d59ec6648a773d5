use plotchain_core::{
    decode, encode, Chain, ChainAccumulator, Column, ColumnError, ColumnSource, GlobalOptions, OptionContext,
    PlotArgs, Setting, StageArgs,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

struct Synthetic {
    n: usize,
}

impl ColumnSource for Synthetic {
    fn column(&self, reference: &str) -> Result<Column, ColumnError> {
        let k: f64 = reference.parse().map_err(|_| ColumnError::Missing(reference.to_string()))?;
        Ok(Column::Numeric((0..self.n).map(|i| ((i as f64) * 0.01 * k).sin()).collect()))
    }
}

fn stage(plots: usize) -> StageArgs {
    StageArgs {
        plots: PlotArgs {
            xcol: vec!["0".into(); plots],
            ycol: (1..=plots).map(|k| k.to_string()).collect(),
            legend: vec![None; plots],
            color: vec![None; plots],
            style: vec![None; plots],
            marker: vec![None; plots],
            linewidth: vec![None; plots],
            markersize: vec![None; plots],
            output: vec![None; plots],
            time_format: vec![None; plots],
            resample: vec![None; plots],
            sort: vec![true; plots],
        },
        globals: GlobalOptions { title: Setting::Explicit("bench".into()), ..GlobalOptions::default() },
    }
}

fn build(source: &Synthetic, args: &StageArgs) -> Chain {
    let mut ctx = OptionContext::new();
    ChainAccumulator::new(&mut ctx, source).build(args, Chain::empty()).unwrap()
}

fn bench_accumulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("accumulate");
    for &n in &[1_000usize, 50_000usize] {
        let source = Synthetic { n };
        let args = stage(4);
        group.bench_function(format!("sorted_4x{n}"), |b| {
            b.iter(|| black_box(build(&source, &args)));
        });
    }
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    for &n in &[1_000usize, 50_000usize] {
        let chain = build(&Synthetic { n }, &stage(4));
        let bytes = encode(&chain).unwrap();
        group.bench_function(format!("encode_4x{n}"), |b| b.iter(|| black_box(encode(&chain).unwrap())));
        group.bench_function(format!("decode_4x{n}"), |b| b.iter(|| black_box(decode(&bytes).unwrap())));
    }
    group.finish();
}

criterion_group!(benches, bench_accumulate, bench_codec);
criterion_main!(benches);
