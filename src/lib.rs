//! Serp-Harvest: a bounded, retrying search-result link harvester
//!
//! This crate fetches search-result pages concurrently, extracts the outbound
//! links found in a fixed set of page regions, and reports a per-URL result
//! (link list or failure) for the whole batch.

pub mod config;
pub mod output;
pub mod pipeline;
pub mod search;
pub mod source;
pub mod state;

use thiserror::Error;

/// Main error type for Serp-Harvest operations
///
/// Per-URL fetch failures are not errors at this level: they are recorded in
/// the [`state::BatchResult`]. This type covers what stops a batch from
/// starting at all.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Keyword source error: {0}")]
    Source(#[from] source::SourceError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Keyword source produced no usable keywords")]
    EmptyBatch,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid region selector: {0}")]
    InvalidSelector(String),
}

/// Result type alias for Serp-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::{Dispatcher, Extractor, HttpFetcher, PipelineRunner, RetryPolicy};
pub use state::{BatchEntry, BatchResult, FailureKind, FetchFailure, FetchOutcome, LinkSet};
