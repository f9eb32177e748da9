//! Aggregated result of one batch run

use crate::state::{FetchFailure, LinkSet};
use std::collections::HashMap;

/// What a chain produced for its URL: the extracted links or a failure marker
pub type ChainResult = Result<LinkSet, FetchFailure>;

/// The final report for one URL in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    /// Position of the URL in the submitted batch
    pub index: usize,

    /// The source URL, exactly as it was submitted
    pub url: String,

    /// The keyword the URL was derived from, if any
    pub keyword: Option<String>,

    /// Extracted links, or the terminal failure
    pub outcome: ChainResult,

    /// Number of fetch attempts made (0 if the chain never fetched)
    pub attempts: u32,
}

impl BatchEntry {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn links(&self) -> Option<&LinkSet> {
        self.outcome.as_ref().ok()
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        self.outcome.as_ref().err()
    }

    /// The keyword if present, otherwise the URL
    pub fn label(&self) -> &str {
        self.keyword.as_deref().unwrap_or(&self.url)
    }
}

/// Per-URL outcomes for a whole batch
///
/// Every submitted URL appears exactly once. Entries are ordered by batch
/// index regardless of the order in which chains completed.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    entries: Vec<BatchEntry>,
    by_url: HashMap<String, usize>,
    failed_urls: Vec<String>,
    sink_errors: usize,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in batch order
    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    pub fn get(&self, url: &str) -> Option<&BatchEntry> {
        self.by_url.get(url).map(|&pos| &self.entries[pos])
    }

    pub fn get_index(&self, index: usize) -> Option<&BatchEntry> {
        self.entries.iter().find(|entry| entry.index == index)
    }

    /// URLs that never succeeded, in batch order
    pub fn failed_urls(&self) -> &[String] {
        &self.failed_urls
    }

    pub fn successes(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries.iter().filter(|entry| entry.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries.iter().filter(|entry| !entry.is_success())
    }

    /// Entries whose fetch succeeded but yielded no links
    pub fn empty_results(&self) -> impl Iterator<Item = &BatchEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.links().is_some_and(LinkSet::is_empty))
    }

    pub fn success_count(&self) -> usize {
        self.successes().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_urls.len()
    }

    /// Number of result sink calls that returned an error during the run
    pub fn sink_errors(&self) -> usize {
        self.sink_errors
    }
}

/// One batch position as seen by the builder
#[derive(Debug)]
enum Slot {
    /// No entry is expected here (e.g. a dropped duplicate)
    Skipped,
    Pending,
    Reported(BatchEntry),
}

/// Incrementally populated batch result, frozen by [`BatchBuilder::finish`]
///
/// Owned by the single collecting loop of the dispatcher; chains never touch it.
/// Slots are keyed by submitted batch position, so indices may have gaps.
#[derive(Debug)]
pub(crate) struct BatchBuilder {
    slots: Vec<Slot>,
    expected: usize,
    reported: usize,
    sink_errors: usize,
}

impl BatchBuilder {
    /// A builder expecting exactly the given batch positions
    pub(crate) fn for_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut slots = Vec::new();
        let mut expected = 0;

        for index in indices {
            if index >= slots.len() {
                slots.resize_with(index + 1, || Slot::Skipped);
            }
            if matches!(slots[index], Slot::Skipped) {
                slots[index] = Slot::Pending;
                expected += 1;
            }
        }

        Self {
            slots,
            expected,
            reported: 0,
            sink_errors: 0,
        }
    }

    /// Number of distinct indices reported so far
    pub(crate) fn reported(&self) -> usize {
        self.reported
    }

    /// True once every expected index has an entry
    pub(crate) fn is_complete(&self) -> bool {
        self.reported == self.expected
    }

    pub(crate) fn is_reported(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Slot::Reported(_)))
    }

    /// Stores an entry; returns false if its index is not expected or already reported
    pub(crate) fn record(&mut self, entry: BatchEntry) -> bool {
        match self.slots.get_mut(entry.index) {
            Some(slot) if matches!(slot, Slot::Pending) => {
                *slot = Slot::Reported(entry);
                self.reported += 1;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn count_sink_error(&mut self) {
        self.sink_errors += 1;
    }

    pub(crate) fn finish(self) -> BatchResult {
        let entries: Vec<BatchEntry> = self
            .slots
            .into_iter()
            .filter_map(|slot| match slot {
                Slot::Reported(entry) => Some(entry),
                Slot::Skipped | Slot::Pending => None,
            })
            .collect();

        let by_url = entries
            .iter()
            .enumerate()
            .map(|(pos, entry)| (entry.url.clone(), pos))
            .collect();

        let failed_urls = entries
            .iter()
            .filter(|entry| !entry.is_success())
            .map(|entry| entry.url.clone())
            .collect();

        BatchResult {
            entries,
            by_url,
            failed_urls,
            sink_errors: self.sink_errors,
        }
    }
}
