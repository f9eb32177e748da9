//! Retry logic with a fixed backoff schedule
//!
//! A [`RetryPolicy`] holds an ordered list of waits. The first attempt is
//! always made; each retryable failure consumes the next wait, and the policy
//! gives up when the schedule runs out.
//!
//! # Example
//!
//! ```
//! use serp_harvest::pipeline::{RetryDecision, RetryPolicy};
//! use serp_harvest::state::FetchFailure;
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::default();
//! let failure = FetchFailure::bad_status(503);
//!
//! assert_eq!(
//!     policy.should_retry(&failure, 0),
//!     RetryDecision::Retry { delay: Duration::from_secs(1), attempt: 1 }
//! );
//! ```

use crate::config::RetryConfig;
use crate::pipeline::fetcher::Fetch;
use crate::state::{FetchFailure, FetchOutcome, FetchRequest};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Decision on whether to retry a failed attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after the specified delay
    Retry {
        /// How long to wait before retrying
        delay: Duration,
        /// Zero-based attempt number of the retry
        attempt: u32,
    },

    /// Give up and surface the failure
    DoNotRetry {
        /// Human-readable reason why no retry is attempted
        reason: String,
    },
}

/// Terminal outcome of a request after retries, plus how many attempts it took
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryReport {
    pub outcome: FetchOutcome,
    pub attempts: u32,
}

/// Bounded backoff schedule applied around a [`Fetch`] implementation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    schedule: Vec<Duration>,
}

impl Default for RetryPolicy {
    /// The 1s, 3s schedule
    fn default() -> Self {
        Self::new(vec![Duration::from_secs(1), Duration::from_secs(3)])
    }
}

impl RetryPolicy {
    pub fn new(schedule: Vec<Duration>) -> Self {
        Self { schedule }
    }

    /// A policy that never retries
    pub fn none() -> Self {
        Self::new(Vec::new())
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.schedule())
    }

    pub fn schedule(&self) -> &[Duration] {
        &self.schedule
    }

    /// Maximum number of attempts, including the first
    pub fn max_attempts(&self) -> u32 {
        self.schedule.len() as u32 + 1
    }

    /// Decides whether the attempt that just failed should be retried
    ///
    /// # Arguments
    ///
    /// * `failure` - The failure of that attempt
    /// * `attempt` - Zero-based number of the attempt that failed
    pub fn should_retry(&self, failure: &FetchFailure, attempt: u32) -> RetryDecision {
        if !failure.kind.is_retryable() {
            return RetryDecision::DoNotRetry {
                reason: format!("{} is not retryable", failure.kind),
            };
        }

        match self.schedule.get(attempt as usize) {
            Some(&delay) => RetryDecision::Retry {
                delay,
                attempt: attempt + 1,
            },
            None => RetryDecision::DoNotRetry {
                reason: format!("backoff schedule exhausted after {} attempts", attempt + 1),
            },
        }
    }

    /// Runs a request through the fetcher until it succeeds or the policy gives up
    ///
    /// The decision is made per attempt from that attempt's own outcome. Both
    /// the fetch and the backoff sleep stop as soon as `cancel` fires, yielding
    /// a `Cancelled` failure.
    pub async fn with_retries(
        &self,
        fetcher: &dyn Fetch,
        request: FetchRequest,
        cancel: &CancellationToken,
    ) -> RetryReport {
        let mut request = request;

        loop {
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    FetchOutcome::Failure(FetchFailure::cancelled("batch cancelled during fetch"))
                }
                outcome = fetcher.fetch(&request) => outcome,
            };
            let attempts = request.attempt() + 1;

            let failure = match outcome {
                success @ FetchOutcome::Success { .. } => {
                    tracing::debug!(url = %request.url(), attempts, "fetch succeeded");
                    return RetryReport {
                        outcome: success,
                        attempts,
                    };
                }
                FetchOutcome::Failure(failure) => failure,
            };

            match self.should_retry(&failure, request.attempt()) {
                RetryDecision::DoNotRetry { reason } => {
                    tracing::debug!(url = %request.url(), attempts, %reason, "giving up");
                    return RetryReport {
                        outcome: FetchOutcome::Failure(failure),
                        attempts,
                    };
                }
                RetryDecision::Retry { delay, .. } => {
                    tracing::warn!(
                        url = %request.url(),
                        attempt = attempts,
                        error = %failure,
                        delay_ms = delay.as_millis() as u64,
                        "fetch failed, retrying"
                    );

                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            return RetryReport {
                                outcome: FetchOutcome::Failure(FetchFailure::cancelled(
                                    "batch cancelled during backoff",
                                )),
                                attempts,
                            };
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }

                    request = request.next_attempt();
                }
            }
        }
    }
}
