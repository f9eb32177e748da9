//! Search URL handling for Serp-Harvest
//!
//! This module turns keywords into search-result page URLs, one URL per
//! keyword, using the configured endpoint and query layout.

mod query;

pub use query::{build_search_url, derive_jobs, encode_terms};

/// A keyword paired with the search URL derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchJob {
    /// The keyword as read from the keyword source (trimmed)
    pub keyword: String,

    /// The derived search-result page URL
    pub url: String,
}
