//! Various configuration options to control wavchunks

mod global_options;
mod padding;
mod parse_options;
mod write_options;

pub use global_options::{GlobalOptions, apply_global_options};
pub use padding::ChunkPadding;
pub use parse_options::{ParseOptions, ParsingMode};
pub use write_options::WriteOptions;

pub(crate) use global_options::global_options;
