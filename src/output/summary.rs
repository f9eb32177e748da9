//! Printable batch summary

use crate::state::BatchResult;
use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// Counts and notable URLs of a finished batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,

    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_links: usize,
    pub sink_errors: usize,

    /// Source URLs that never succeeded, in batch order
    pub failed_urls: Vec<String>,

    /// Keywords (or URLs) whose page was fetched but held no links
    pub empty_results: Vec<String>,
}

impl BatchSummary {
    pub fn from_result(result: &BatchResult, started_at: DateTime<Utc>, elapsed: Duration) -> Self {
        let total_links = result
            .successes()
            .filter_map(|entry| entry.links())
            .map(|links| links.len())
            .sum();

        Self {
            started_at,
            elapsed,
            total: result.len(),
            succeeded: result.success_count(),
            failed: result.failure_count(),
            total_links,
            sink_errors: result.sink_errors(),
            failed_urls: result.failed_urls().to_vec(),
            empty_results: result
                .empty_results()
                .map(|entry| entry.label().to_string())
                .collect(),
        }
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / self.total as f64) * 100.0
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Harvest Summary ===\n")?;

        writeln!(f, "Overview:")?;
        writeln!(f, "  Started: {}", self.started_at.to_rfc3339())?;
        writeln!(f, "  Elapsed: {:.1}s", self.elapsed.as_secs_f64())?;
        writeln!(f, "  URLs: {}", self.total)?;
        writeln!(f, "  Links extracted: {}", self.total_links)?;
        if self.sink_errors > 0 {
            writeln!(f, "  Output errors: {}", self.sink_errors)?;
        }
        writeln!(f)?;

        if !self.failed_urls.is_empty() {
            writeln!(f, "Failed URLs ({}):", self.failed_urls.len())?;
            for url in &self.failed_urls {
                writeln!(f, "  - {}", url)?;
            }
            writeln!(f)?;
        }

        if !self.empty_results.is_empty() {
            writeln!(f, "Empty Results ({}):", self.empty_results.len())?;
            for label in &self.empty_results {
                writeln!(f, "  - {}", label)?;
            }
            writeln!(f)?;
        }

        write!(
            f,
            "Success Rate: {:.1}% ({} / {} URLs fetched)",
            self.success_rate(),
            self.succeeded,
            self.total
        )
    }
}
