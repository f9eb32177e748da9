//! Result sink trait and errors
//!
//! A sink receives the final report of every URL in a batch, one call per
//! URL, from the dispatcher's collecting loop.

use crate::state::BatchEntry;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for result sinks
///
/// Sinks are driven from a single loop, so they take `&mut self` and need no
/// internal locking.
pub trait ResultSink: Send {
    /// Records the final report for one URL
    ///
    /// Called exactly once per URL, in completion order rather than batch
    /// order. Use [`BatchEntry::index`] to key persisted artifacts.
    fn record(&mut self, entry: &BatchEntry) -> OutputResult<()>;

    /// Flushes anything buffered; called once after the last report
    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

/// Discards every report
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ResultSink for NullSink {
    fn record(&mut self, _entry: &BatchEntry) -> OutputResult<()> {
        Ok(())
    }
}

/// Fans each report out to several sinks
///
/// Every inner sink sees every report even if an earlier one fails; the
/// first error is returned.
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn ResultSink>>,
}

impl MultiSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl ResultSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ResultSink for MultiSink {
    fn record(&mut self, entry: &BatchEntry) -> OutputResult<()> {
        let mut first_error = None;
        for sink in &mut self.sinks {
            if let Err(e) = sink.record(entry) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn finish(&mut self) -> OutputResult<()> {
        let mut first_error = None;
        for sink in &mut self.sinks {
            if let Err(e) = sink.finish() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
