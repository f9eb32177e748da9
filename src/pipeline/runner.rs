//! Pipeline runner - one full keyword batch from source to summary

use crate::config::{Config, SearchConfig};
use crate::output::{BatchSummary, ResultSink};
use crate::pipeline::dispatcher::{BatchItem, Dispatcher};
use crate::search::{derive_jobs, SearchJob};
use crate::source::KeywordSource;
use crate::state::BatchResult;
use crate::HarvestError;
use chrono::Utc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// What a completed run hands back to its caller
#[derive(Debug, Clone)]
pub struct RunReport {
    pub result: BatchResult,
    pub summary: BatchSummary,
}

/// Turns keywords into search URLs and drives the dispatcher over them
///
/// The runner does not retry: a failure coming back from the dispatcher is
/// already final.
pub struct PipelineRunner {
    dispatcher: Dispatcher,
    search: SearchConfig,
}

impl PipelineRunner {
    pub fn new(dispatcher: Dispatcher, search: SearchConfig) -> Self {
        Self { dispatcher, search }
    }

    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        Ok(Self::new(
            Dispatcher::from_config(config)?,
            config.search.clone(),
        ))
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Reads the keyword source and derives one search job per usable keyword
    ///
    /// # Errors
    ///
    /// * [`HarvestError::Source`] if the source cannot be read
    /// * [`HarvestError::EmptyBatch`] if no keyword yields a search URL
    pub fn jobs(&self, source: &dyn KeywordSource) -> Result<Vec<SearchJob>, HarvestError> {
        let keywords = source.keywords()?;
        let jobs = derive_jobs(&keywords, &self.search);

        if jobs.is_empty() {
            return Err(HarvestError::EmptyBatch);
        }

        tracing::info!(
            "Derived {} search URLs from {} keywords",
            jobs.len(),
            keywords.len()
        );
        Ok(jobs)
    }

    /// Runs a full batch
    ///
    /// 1. Pull the keywords and derive search URLs
    /// 2. Dispatch every URL, forwarding each report to `sink`
    /// 3. Summarise successes, failures and empty results
    pub async fn run(
        &self,
        source: &dyn KeywordSource,
        sink: &mut dyn ResultSink,
        cancel: &CancellationToken,
    ) -> Result<RunReport, HarvestError> {
        let jobs = self.jobs(source)?;
        let started_at = Utc::now();
        let start = Instant::now();

        let items = jobs.into_iter().map(BatchItem::from).collect();
        let result = self.dispatcher.dispatch(items, sink, cancel).await?;

        let summary = BatchSummary::from_result(&result, started_at, start.elapsed());
        if !summary.failed_urls.is_empty() {
            tracing::warn!("Could not fetch {} URLs", summary.failed_urls.len());
        }

        Ok(RunReport { result, summary })
    }
}
