//! Pipeline module for fetching and extracting search results
//!
//! This module contains the core batch logic, including:
//! - HTTP fetching with typed failures
//! - Region-scoped link extraction
//! - Backoff-schedule retries
//! - Concurrent, cancellable batch dispatch
//! - Keyword-to-summary orchestration

mod dispatcher;
mod extractor;
mod fetcher;
mod retry;
mod runner;

pub use dispatcher::{BatchItem, Dispatcher, DEFAULT_MAX_CONCURRENT};
pub use extractor::{retain_https, ExtractError, Extractor, Region};
pub use fetcher::{build_http_client, Fetch, HttpFetcher};
pub use retry::{RetryDecision, RetryPolicy, RetryReport};
pub use runner::{PipelineRunner, RunReport};

use crate::config::Config;
use crate::output::ResultSink;
use crate::source::KeywordSource;
use crate::HarvestError;
use tokio_util::sync::CancellationToken;

/// Runs a complete keyword batch
///
/// This is the main entry point for a run. It will:
/// 1. Build the HTTP client, extractor and retry policy
/// 2. Read the keywords and derive search URLs
/// 3. Fetch and extract every URL concurrently
/// 4. Hand each result to the sink
/// 5. Return the batch result and its summary
///
/// # Example
///
/// ```no_run
/// use serp_harvest::config::load_config;
/// use serp_harvest::output::MemorySink;
/// use serp_harvest::pipeline::harvest;
/// use serp_harvest::source::StaticKeywords;
/// use std::path::Path;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let keywords = StaticKeywords::new(["rust vs go", "wasm"]);
/// let mut sink = MemorySink::new();
/// let report = harvest(&config, &keywords, &mut sink, &CancellationToken::new()).await?;
/// println!("{}", report.summary);
/// # Ok(())
/// # }
/// ```
pub async fn harvest(
    config: &Config,
    source: &dyn KeywordSource,
    sink: &mut dyn ResultSink,
    cancel: &CancellationToken,
) -> Result<RunReport, HarvestError> {
    PipelineRunner::from_config(config)?
        .run(source, sink, cancel)
        .await
}
