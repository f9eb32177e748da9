//! Output module for recording batch results
//!
//! This module handles:
//! - The result sink interface the dispatcher reports into
//! - Per-index text files and a tab-separated summary file
//! - The printable batch summary

mod memory;
mod summary;
mod text_file;
mod traits;
mod tsv;

pub use memory::MemorySink;
pub use summary::BatchSummary;
pub use text_file::TextFileSink;
pub use traits::{MultiSink, NullSink, OutputError, OutputResult, ResultSink};
pub use tsv::{format_row, TsvSink};

use crate::config::OutputConfig;
use std::path::Path;

/// Builds the file sinks described by the output configuration
///
/// `directory` overrides `config.directory` when given. The TSV summary is
/// written inside the output directory.
pub fn file_sinks(config: &OutputConfig, directory: Option<&Path>) -> OutputResult<MultiSink> {
    let directory = directory.unwrap_or_else(|| Path::new(&config.directory));
    let text = TextFileSink::new(directory)?;
    let tsv = TsvSink::new(directory.join(&config.summary_file));

    Ok(MultiSink::new().with(text).with(tsv))
}
