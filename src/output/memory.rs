//! In-memory sink

use crate::output::traits::{OutputResult, ResultSink};
use crate::state::BatchEntry;

/// Keeps every report in arrival order
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    entries: Vec<BatchEntry>,
    finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports in the order the sink received them
    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl ResultSink for MemorySink {
    fn record(&mut self, entry: &BatchEntry) -> OutputResult<()> {
        self.entries.push(entry.clone());
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.finished = true;
        Ok(())
    }
}
