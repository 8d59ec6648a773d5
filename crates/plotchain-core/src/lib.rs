// File: crates/plotchain-core/src/lib.rs
// Summary: Core library entry point; exports the chain model, option merge, envelope codec and renderer.

pub mod axis;
pub mod chain;
pub mod codec;
pub mod columns;
pub mod error;
pub mod options;
pub mod plot;
pub mod render;
pub mod series;
pub mod text;
pub mod theme;
pub mod types;

pub use chain::{Chain, ChainAccumulator, StageArgs};
pub use codec::{decode, encode, read_upstream, should_read_upstream, write_chain, STDIN_SENTINEL};
pub use columns::{Column, ColumnSource, CsvColumns, CsvOptions};
pub use error::{ChainError, ColumnError};
pub use options::{GlobalOptions, OptionContext, ResolvedOptions, Setting};
pub use plot::{PlotArgs, PlotSpec, PlotStyle};
pub use render::{render_chain, render_to_png_bytes, RenderOptions};
pub use series::XSeries;
pub use theme::Theme;
