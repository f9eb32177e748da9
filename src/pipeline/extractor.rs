//! HTML link extraction
//!
//! This module pulls outbound links out of a search-result page. Only anchors
//! inside the configured regions are considered; regions are scanned in
//! configuration order and anchors in document order.

use crate::config::ExtractorConfig;
use crate::state::LinkSet;
use crate::ConfigError;
use scraper::{Html, Selector};
use thiserror::Error;

/// Substring a link must contain to survive the post-filter
///
/// This is a plain substring test, not URL validation.
const SCHEME_MARKER: &str = "https";

/// Reasons a body cannot be treated as a document at all
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("document is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::str::Utf8Error),

    #[error("document is empty")]
    EmptyDocument,
}

/// A named region of a result page
#[derive(Debug, Clone)]
pub struct Region {
    name: String,
    selector: Selector,
}

impl Region {
    /// Creates a region from a CSS selector
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSelector`] if the selector does not parse.
    pub fn new(name: &str, selector: &str) -> Result<Self, ConfigError> {
        let selector = Selector::parse(selector).map_err(|e| {
            ConfigError::InvalidSelector(format!("{} ('{}'): {}", name, selector, e))
        })?;

        Ok(Self {
            name: name.to_string(),
            selector,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Extracts link targets from the anchors of a fixed set of regions
#[derive(Debug, Clone)]
pub struct Extractor {
    regions: Vec<Region>,
    anchor: Selector,
}

impl Extractor {
    pub fn new(regions: Vec<Region>) -> Result<Self, ConfigError> {
        let anchor = Selector::parse("a[href]")
            .map_err(|e| ConfigError::InvalidSelector(format!("anchor: {}", e)))?;

        Ok(Self { regions, anchor })
    }

    /// Builds an extractor from the configured regions
    pub fn from_config(config: &ExtractorConfig) -> Result<Self, ConfigError> {
        let regions = config
            .regions
            .iter()
            .map(|region| Region::new(&region.name, &region.selector))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(regions)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Extracts the deduplicated, https-filtered links of a page body
    ///
    /// # Link Extraction Rules
    ///
    /// - Regions are scanned in order; within a region, anchors in document order
    /// - The `href` is trimmed; empty hrefs are skipped
    /// - Duplicates are dropped, the first occurrence keeps its position
    /// - Only links containing `"https"` are kept
    ///
    /// A missing region yields no links; it is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] if the body is not UTF-8 or is blank.
    ///
    /// # Example
    ///
    /// ```
    /// use serp_harvest::config::ExtractorConfig;
    /// use serp_harvest::pipeline::Extractor;
    ///
    /// let extractor = Extractor::from_config(&ExtractorConfig::default()).unwrap();
    /// let html = br#"<html><body><li class="b_algo"><a href="https://a.com">A</a></li></body></html>"#;
    /// let links = extractor.extract(html).unwrap();
    /// assert_eq!(links.as_slice(), &["https://a.com"]);
    /// ```
    pub fn extract(&self, body: &[u8]) -> Result<LinkSet, ExtractError> {
        let text = std::str::from_utf8(body)?;
        if text.trim().is_empty() {
            return Err(ExtractError::EmptyDocument);
        }

        let document = Html::parse_document(text);
        let mut links = LinkSet::new();

        for region in &self.regions {
            let mut found = 0usize;
            for container in document.select(&region.selector) {
                for anchor in container.select(&self.anchor) {
                    let Some(href) = anchor.value().attr("href") else {
                        continue;
                    };
                    let href = href.trim();
                    if !href.is_empty() {
                        links.insert(href);
                        found += 1;
                    }
                }
            }
            tracing::trace!(region = region.name(), found, "scanned region");
        }

        retain_https(&mut links);
        Ok(links)
    }
}

/// Drops every link that does not contain the literal `"https"`
pub fn retain_https(links: &mut LinkSet) {
    links.retain(|link| link.contains(SCHEME_MARKER));
}
