// File: crates/plotchain/src/main.rs
// Summary: One pipeline stage: load columns, decode any upstream chain, add plots, then forward or render.

mod args;

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::Parser;
use plotchain_core::theme;
use plotchain_core::{
    read_upstream, render_chain, write_chain, ChainAccumulator, CsvColumns, CsvOptions, OptionContext,
    RenderOptions, STDIN_SENTINEL,
};
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, Forward};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // stdout may carry the chain envelope, so logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let stdin = io::stdin();
    let stdin_is_terminal = stdin.is_terminal();

    if !cli.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character, got {:?}", cli.delimiter);
    }
    let csv_opts = CsvOptions { delimiter: cli.delimiter as u8, has_headers: !cli.no_header };
    let columns = if cli.file == STDIN_SENTINEL {
        CsvColumns::from_reader(stdin.lock(), csv_opts).context("reading CSV from stdin")?
    } else {
        CsvColumns::from_path(&cli.file, csv_opts).with_context(|| format!("reading CSV '{}'", cli.file))?
    };
    tracing::debug!(headers = ?columns.headers(), rows = columns.row_count(), "columns available");

    let upstream = read_upstream(&mut stdin.lock(), stdin_is_terminal, &cli.file).context("reading upstream chain")?;

    let stage = cli.stage_args();
    let mut context = OptionContext::new();
    let chain = ChainAccumulator::new(&mut context, &columns)
        .build(&stage, upstream)
        .context("building plot definitions")?;

    let forward = match cli.forward {
        Forward::Auto => !io::stdout().is_terminal(),
        Forward::Always => true,
        Forward::Never => false,
    };
    if forward {
        write_chain(&mut io::stdout().lock(), &chain).context("writing chain to stdout")?;
        tracing::info!(plots = chain.plots.len(), "stage complete: chain forwarded");
        return Ok(());
    }

    let resolved = context.finalize();
    let opts = RenderOptions { theme: theme::find(&cli.theme), ..RenderOptions::default() };
    let written = render_chain(&chain.plots, &resolved, &opts)?;
    tracing::info!(plots = chain.plots.len(), files = written.len(), "stage complete: figure rendered");
    for path in written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
