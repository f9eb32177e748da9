//! Batch dispatcher - concurrent chain orchestration
//!
//! This module runs one fetch → retry → extract chain per URL:
//! - Bounding simultaneous chains with a semaphore
//! - Collecting exactly one report per URL over a channel
//! - Forwarding each report to the result sink as it arrives
//! - Propagating a single cancellation signal to every chain

use crate::config::Config;
use crate::output::{NullSink, ResultSink};
use crate::pipeline::extractor::Extractor;
use crate::pipeline::fetcher::{Fetch, HttpFetcher};
use crate::pipeline::retry::RetryPolicy;
use crate::search::SearchJob;
use crate::state::{BatchBuilder, BatchEntry, BatchResult, FetchFailure, FetchOutcome, FetchRequest};
use crate::HarvestError;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Default bound on simultaneous chains
pub const DEFAULT_MAX_CONCURRENT: usize = 8;

/// One URL submitted to a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub url: String,
    pub keyword: Option<String>,
}

impl BatchItem {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            keyword: None,
        }
    }
}

impl From<SearchJob> for BatchItem {
    fn from(job: SearchJob) -> Self {
        Self {
            url: job.url,
            keyword: Some(job.keyword),
        }
    }
}

/// Read-only state shared by every chain of a batch
#[derive(Clone)]
struct ChainContext {
    fetcher: Arc<dyn Fetch>,
    extractor: Arc<Extractor>,
    retry: Arc<RetryPolicy>,
    semaphore: Arc<Semaphore>,
    cancel: CancellationToken,
    reports: mpsc::Sender<BatchEntry>,
}

/// Runs batches of chains with bounded concurrency
pub struct Dispatcher {
    fetcher: Arc<dyn Fetch>,
    extractor: Arc<Extractor>,
    retry: Arc<RetryPolicy>,
    max_concurrent: usize,
    stagger: Duration,
}

impl Dispatcher {
    /// Creates a dispatcher with the default concurrency bound and no stagger
    pub fn new(fetcher: Arc<dyn Fetch>, extractor: Extractor, retry: RetryPolicy) -> Self {
        Self {
            fetcher,
            extractor: Arc::new(extractor),
            retry: Arc::new(retry),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            stagger: Duration::ZERO,
        }
    }

    /// Builds the HTTP fetcher, extractor and retry policy from configuration
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let fetcher = HttpFetcher::new(&config.fetcher)?;
        let extractor = Extractor::from_config(&config.extractor)?;
        let retry = RetryPolicy::from_config(&config.retry);

        Ok(Self::new(Arc::new(fetcher), extractor, retry)
            .with_max_concurrent(config.dispatcher.max_concurrent_fetches)
            .with_stagger(config.dispatcher.stagger()))
    }

    /// Sets the bound on simultaneous chains (at least 1)
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Sets the delay between launching consecutive chains
    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Runs a batch of plain URLs and returns one entry per distinct URL
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::InvalidUrl`] if any URL is malformed. The batch
    /// is checked as a whole before anything is fetched. Failures of
    /// well-formed URLs are per-entry outcomes and never an error here.
    pub async fn run_batch(
        &self,
        urls: &[String],
        cancel: &CancellationToken,
    ) -> Result<BatchResult, HarvestError> {
        let items = urls.iter().map(|url| BatchItem::url(url.as_str())).collect();
        self.dispatch(items, &mut NullSink, cancel).await
    }

    /// Runs a batch, handing each report to `sink` as it completes
    ///
    /// # Flow
    ///
    /// 1. Validate every URL and drop duplicates (first occurrence wins)
    /// 2. Spawn one chain per URL; chains wait on the semaphore before fetching
    /// 3. Receive reports while launching, then until all arrived or every
    ///    sender is gone
    /// 4. Synthesise a failure for any chain that died without reporting
    ///
    /// Entries keep the position of their URL in `items`, so indices have gaps
    /// where duplicates were dropped.
    ///
    /// Individual URL failures, sink errors and chain panics never fail the
    /// batch. The only error is an invalid URL in the input, detected before
    /// anything is launched (see [`Dispatcher::run_batch`]).
    pub async fn dispatch(
        &self,
        items: Vec<BatchItem>,
        sink: &mut dyn ResultSink,
        cancel: &CancellationToken,
    ) -> Result<BatchResult, HarvestError> {
        let jobs = prepare(items)?;
        let total = jobs.len();

        tracing::info!(
            total,
            max_concurrent = self.max_concurrent,
            "Dispatching batch"
        );

        let (tx, mut rx) = mpsc::channel(total.max(1));
        let context = ChainContext {
            fetcher: Arc::clone(&self.fetcher),
            extractor: Arc::clone(&self.extractor),
            retry: Arc::clone(&self.retry),
            semaphore: Arc::new(Semaphore::new(self.max_concurrent)),
            cancel: cancel.clone(),
            reports: tx,
        };

        let mut builder = BatchBuilder::for_indices(jobs.iter().map(|(index, _, _)| *index));
        let mut submitted = Vec::with_capacity(total);
        let mut tasks = JoinSet::new();

        for (launched, (index, item, request)) in jobs.into_iter().enumerate() {
            if launched > 0 && !self.stagger.is_zero() && !cancel.is_cancelled() {
                let stagger = tokio::time::sleep(self.stagger);
                tokio::pin!(stagger);

                // Early finishers reach the sink while later chains wait to launch
                loop {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        _ = &mut stagger => break,
                        Some(entry) = rx.recv() => accept(entry, &mut builder, sink),
                    }
                }
            }

            submitted.push((index, item.clone()));
            tasks.spawn(run_chain(index, item, request, context.clone()));
        }

        // Only the chains hold senders now, so the channel closes once all are gone
        drop(context);

        while !builder.is_complete() {
            match rx.recv().await {
                Some(entry) => accept(entry, &mut builder, sink),
                None => break,
            }
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Chain task aborted: {}", e);
            }
        }

        if !builder.is_complete() {
            tracing::warn!(
                reported = builder.reported(),
                total,
                "Some chains ended without reporting"
            );
        }

        for (index, item) in submitted {
            if !builder.is_reported(index) {
                let entry = BatchEntry {
                    index,
                    url: item.url,
                    keyword: item.keyword,
                    outcome: Err(FetchFailure::cancelled("chain ended without reporting")),
                    attempts: 0,
                };
                accept(entry, &mut builder, sink);
            }
        }

        if let Err(e) = sink.finish() {
            tracing::warn!("Result sink failed to finish: {}", e);
            builder.count_sink_error();
        }

        let result = builder.finish();
        tracing::info!(
            total = result.len(),
            succeeded = result.success_count(),
            failed = result.failure_count(),
            "Batch complete"
        );

        Ok(result)
    }
}

/// Validates URLs and removes duplicates, keeping each item's submitted position
fn prepare(items: Vec<BatchItem>) -> Result<Vec<(usize, BatchItem, FetchRequest)>, HarvestError> {
    let mut seen = HashSet::new();
    let mut jobs = Vec::with_capacity(items.len());

    for (index, item) in items.into_iter().enumerate() {
        if !seen.insert(item.url.clone()) {
            tracing::warn!("Duplicate URL in batch, keeping first occurrence: {}", item.url);
            continue;
        }
        let request = FetchRequest::new(&item.url)?;
        jobs.push((index, item, request));
    }

    Ok(jobs)
}

/// Merges one report into the batch and forwards it to the sink
fn accept(entry: BatchEntry, builder: &mut BatchBuilder, sink: &mut dyn ResultSink) {
    if builder.is_reported(entry.index) {
        tracing::warn!("Ignoring duplicate report for {}", entry.url);
        return;
    }

    match &entry.outcome {
        Ok(links) => tracing::debug!(
            url = %entry.url,
            links = links.len(),
            attempts = entry.attempts,
            "Chain succeeded"
        ),
        Err(failure) => tracing::warn!(
            url = %entry.url,
            attempts = entry.attempts,
            "Chain failed: {}",
            failure
        ),
    }

    if let Err(e) = sink.record(&entry) {
        tracing::warn!("Result sink rejected {}: {}", entry.url, e);
        builder.count_sink_error();
    }

    builder.record(entry);
}

/// Task body for one chain; sends exactly one report
async fn run_chain(index: usize, item: BatchItem, request: FetchRequest, context: ChainContext) {
    let entry = execute_chain(index, item, request, &context).await;
    if context.reports.send(entry).await.is_err() {
        tracing::debug!("Dispatcher stopped listening before chain {} reported", index);
    }
}

async fn execute_chain(
    index: usize,
    item: BatchItem,
    request: FetchRequest,
    context: &ChainContext,
) -> BatchEntry {
    let permit = tokio::select! {
        biased;
        _ = context.cancel.cancelled() => None,
        permit = Arc::clone(&context.semaphore).acquire_owned() => permit.ok(),
    };

    let Some(_permit) = permit else {
        return BatchEntry {
            index,
            url: item.url,
            keyword: item.keyword,
            outcome: Err(FetchFailure::cancelled("batch cancelled before fetch started")),
            attempts: 0,
        };
    };

    let report = context
        .retry
        .with_retries(context.fetcher.as_ref(), request, &context.cancel)
        .await;

    let outcome = match report.outcome {
        FetchOutcome::Success { body, .. } => context
            .extractor
            .extract(&body)
            .map_err(|e| FetchFailure::parse(e.to_string())),
        FetchOutcome::Failure(failure) => Err(failure),
    };

    BatchEntry {
        index,
        url: item.url,
        keyword: item.keyword,
        outcome,
        attempts: report.attempts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorConfig;
    use crate::output::{MemorySink, OutputError, OutputResult};
    use crate::state::FailureKind;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn result_page(links: &[&str]) -> Vec<u8> {
        let items: String = links
            .iter()
            .map(|link| format!(r#"<li class="b_algo"><a href="{}">r</a></li>"#, link))
            .collect();
        format!("<html><body><ol>{}</ol></body></html>", items).into_bytes()
    }

    /// Serves canned outcomes per URL; unknown URLs fail with a network error
    struct MapFetcher {
        pages: HashMap<String, FetchOutcome>,
        delay: Duration,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    impl MapFetcher {
        fn new(pages: HashMap<String, FetchOutcome>) -> Self {
            Self {
                pages,
                delay: Duration::ZERO,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                calls: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl Fetch for MapFetcher {
        async fn fetch(&self, request: &FetchRequest) -> FetchOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.pages
                .get(request.url().as_str())
                .cloned()
                .unwrap_or_else(|| FetchOutcome::Failure(FetchFailure::network("no route")))
        }
    }

    /// Panics for one URL, succeeds for the rest
    struct PanickyFetcher {
        poison: String,
    }

    #[async_trait]
    impl Fetch for PanickyFetcher {
        async fn fetch(&self, request: &FetchRequest) -> FetchOutcome {
            if request.url().as_str() == self.poison {
                panic!("fetcher exploded");
            }
            FetchOutcome::Success {
                status_code: 200,
                body: result_page(&["https://ok.com"]),
            }
        }
    }

    fn dispatcher(fetcher: Arc<dyn Fetch>) -> Dispatcher {
        let extractor = Extractor::from_config(&ExtractorConfig::default()).unwrap();
        Dispatcher::new(fetcher, extractor, RetryPolicy::none())
    }

    fn urls(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| format!("https://search.example.com/search?q=term{}&first=10", i))
            .collect()
    }

    fn success(links: &[&str]) -> FetchOutcome {
        FetchOutcome::Success {
            status_code: 200,
            body: result_page(links),
        }
    }

    #[tokio::test]
    async fn test_every_url_reports_exactly_once() {
        let urls = urls(50);
        let pages = urls
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 3 != 0)
            .map(|(i, url)| (url.clone(), success(&[format!("https://site{}.com", i).as_str()])))
            .collect();
        let fetcher = Arc::new(MapFetcher::new(pages));

        let result = dispatcher(fetcher)
            .with_max_concurrent(10)
            .run_batch(&urls, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.len(), 50);
        let indices: Vec<usize> = result.entries().iter().map(|e| e.index).collect();
        assert_eq!(indices, (0..50).collect::<Vec<_>>());
        for (i, url) in urls.iter().enumerate() {
            let entry = result.get(url).unwrap();
            assert_eq!(entry.index, i);
            if i % 3 == 0 {
                assert!(!entry.is_success());
            } else {
                let expected = format!("https://site{}.com", i);
                assert_eq!(entry.links().unwrap().as_slice(), &[expected]);
            }
        }
        assert_eq!(result.failure_count(), 17);
        assert_eq!(result.success_count(), 33);
    }

    #[tokio::test]
    async fn test_failed_urls_are_in_batch_order() {
        let urls = urls(6);
        let pages = [(urls[1].clone(), success(&[])), (urls[4].clone(), success(&[]))]
            .into_iter()
            .collect();
        let fetcher = Arc::new(MapFetcher::new(pages));

        let result = dispatcher(fetcher)
            .run_batch(&urls, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            result.failed_urls(),
            &[
                urls[0].clone(),
                urls[2].clone(),
                urls[3].clone(),
                urls[5].clone()
            ]
        );
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let urls = urls(20);
        let pages = urls.iter().map(|url| (url.clone(), success(&[]))).collect();
        let fetcher = Arc::new(MapFetcher::new(pages).with_delay(Duration::from_millis(20)));

        let result = dispatcher(fetcher.clone())
            .with_max_concurrent(3)
            .run_batch(&urls, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.success_count(), 20);
        assert!(fetcher.peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 20);
    }

    #[tokio::test]
    async fn test_unparsable_body_is_parse_error_without_retry() {
        let url = "https://search.example.com/search?q=binary&first=10".to_string();
        let pages = [(
            url.clone(),
            FetchOutcome::Success {
                status_code: 200,
                body: vec![0xff, 0xfe, 0xfd],
            },
        )]
        .into_iter()
        .collect();
        let fetcher = Arc::new(MapFetcher::new(pages));
        let extractor = Extractor::from_config(&ExtractorConfig::default()).unwrap();
        let dispatcher = Dispatcher::new(
            fetcher.clone(),
            extractor,
            RetryPolicy::new(vec![Duration::from_millis(1)]),
        );

        let result = dispatcher
            .run_batch(&[url.clone()], &CancellationToken::new())
            .await
            .unwrap();

        let entry = result.get(&url).unwrap();
        assert_eq!(entry.failure().unwrap().kind, FailureKind::ParseError);
        assert_eq!(entry.attempts, 1);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_duplicate_urls_are_reported_once() {
        let url = "https://search.example.com/search?q=dup&first=10".to_string();
        let fetcher = Arc::new(MapFetcher::new(
            [(url.clone(), success(&["https://x.com"]))].into_iter().collect(),
        ));

        let result = dispatcher(fetcher.clone())
            .run_batch(&[url.clone(), url.clone()], &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_indices_follow_submitted_positions_after_duplicates() {
        let x = "https://search.example.com/search?q=x&first=10".to_string();
        let y = "https://search.example.com/search?q=y&first=10".to_string();
        let fetcher = Arc::new(MapFetcher::new(
            [(x.clone(), success(&[])), (y.clone(), success(&[]))]
                .into_iter()
                .collect(),
        ));
        let mut sink = MemorySink::new();

        let result = dispatcher(fetcher)
            .dispatch(
                vec![
                    BatchItem::url(x.as_str()),
                    BatchItem::url(x.as_str()),
                    BatchItem::url(y.as_str()),
                ],
                &mut sink,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.get(&x).unwrap().index, 0);
        assert_eq!(result.get(&y).unwrap().index, 2);
        assert!(result.get_index(1).is_none());

        let mut indices: Vec<usize> = sink.entries().iter().map(|e| e.index).collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 2]);
    }

    #[tokio::test]
    async fn test_invalid_url_rejects_batch() {
        let fetcher = Arc::new(MapFetcher::new(HashMap::new()));
        let result = dispatcher(fetcher.clone())
            .run_batch(
                &["https://ok.example.com/".to_string(), "not a url".to_string()],
                &CancellationToken::new(),
            )
            .await;

        assert!(matches!(result, Err(HarvestError::InvalidUrl { .. })));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let fetcher = Arc::new(MapFetcher::new(HashMap::new()));
        let result = dispatcher(fetcher)
            .run_batch(&[], &CancellationToken::new())
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_cancellation_resolves_pending_chains() {
        let urls = urls(12);
        let pages = urls.iter().map(|url| (url.clone(), success(&[]))).collect();
        let fetcher = Arc::new(MapFetcher::new(pages).with_delay(Duration::from_secs(60)));
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            dispatcher(fetcher).with_max_concurrent(4).run_batch(&urls, &cancel),
        )
        .await
        .expect("batch hung after cancellation")
        .unwrap();

        assert_eq!(result.len(), 12);
        assert_eq!(result.failure_count(), 12);
        assert!(result
            .entries()
            .iter()
            .all(|e| e.failure().unwrap().kind == FailureKind::Cancelled));

        // Chains still waiting for a permit never fetched
        let never_fetched = result.entries().iter().filter(|e| e.attempts == 0).count();
        assert_eq!(never_fetched, 8);
    }

    #[tokio::test]
    async fn test_cancelled_stagger_stops_waiting() {
        let urls = urls(5);
        let fetcher = Arc::new(MapFetcher::new(HashMap::new()));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            dispatcher(fetcher.clone())
                .with_stagger(Duration::from_secs(30))
                .run_batch(&urls, &cancel),
        )
        .await
        .expect("stagger ignored cancellation")
        .unwrap();

        assert_eq!(result.len(), 5);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_panicking_chain_still_yields_an_entry() {
        let urls = urls(4);
        let fetcher = Arc::new(PanickyFetcher {
            poison: urls[2].clone(),
        });

        let result = dispatcher(fetcher)
            .run_batch(&urls, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.len(), 4);
        assert_eq!(result.failed_urls(), &[urls[2].clone()]);
        assert_eq!(result.success_count(), 3);
    }

    /// Rejects every report and the final flush
    struct BrokenSink {
        attempts: usize,
    }

    impl ResultSink for BrokenSink {
        fn record(&mut self, _entry: &BatchEntry) -> OutputResult<()> {
            self.attempts += 1;
            Err(OutputError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        }

        fn finish(&mut self) -> OutputResult<()> {
            Err(OutputError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        }
    }

    /// Notes the (paused) clock time of every report
    #[derive(Default)]
    struct TimedSink {
        seen: Vec<(usize, tokio::time::Instant)>,
    }

    impl ResultSink for TimedSink {
        fn record(&mut self, entry: &BatchEntry) -> OutputResult<()> {
            self.seen.push((entry.index, tokio::time::Instant::now()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_sink_errors_are_counted_not_fatal() {
        let urls = urls(4);
        let pages = urls.iter().map(|url| (url.clone(), success(&[]))).collect();
        let fetcher = Arc::new(MapFetcher::new(pages));
        let mut sink = BrokenSink { attempts: 0 };

        let items = urls.iter().map(|url| BatchItem::url(url.as_str())).collect();
        let result = dispatcher(fetcher)
            .dispatch(items, &mut sink, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.len(), 4);
        assert_eq!(result.success_count(), 4);
        assert_eq!(sink.attempts, 4);
        assert_eq!(result.sink_errors(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reports_reach_sink_while_later_chains_are_staggered() {
        let urls = urls(3);
        let pages = urls.iter().map(|url| (url.clone(), success(&[]))).collect();
        let fetcher = Arc::new(MapFetcher::new(pages));
        let mut sink = TimedSink::default();

        let start = tokio::time::Instant::now();
        let items = urls.iter().map(|url| BatchItem::url(url.as_str())).collect();
        let result = dispatcher(fetcher)
            .with_stagger(Duration::from_secs(1))
            .dispatch(items, &mut sink, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.len(), 3);
        assert!(start.elapsed() >= Duration::from_secs(2));

        let (_, first_seen) = sink
            .seen
            .iter()
            .find(|(index, _)| *index == 0)
            .copied()
            .unwrap();
        assert!(first_seen - start < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_sink_receives_every_report() {
        let urls = urls(5);
        let pages = urls
            .iter()
            .take(3)
            .map(|url| (url.clone(), success(&["https://x.com"])))
            .collect();
        let fetcher = Arc::new(MapFetcher::new(pages));
        let mut sink = MemorySink::new();

        let items = urls
            .iter()
            .enumerate()
            .map(|(i, url)| BatchItem {
                url: url.clone(),
                keyword: Some(format!("term{}", i)),
            })
            .collect();
        let result = dispatcher(fetcher)
            .dispatch(items, &mut sink, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(sink.entries().len(), 5);
        assert!(sink.is_finished());
        let mut indices: Vec<usize> = sink.entries().iter().map(|e| e.index).collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(result.get_index(4).unwrap().keyword.as_deref(), Some("term4"));
        assert_eq!(result.sink_errors(), 0);
    }
}
