//! Per-attempt request and outcome types
//!
//! A [`FetchRequest`] is created for every attempt and a [`FetchOutcome`] is
//! its terminal result. Neither is mutated after construction.

use crate::HarvestError;
use std::fmt;
use url::Url;

/// A single fetch attempt against one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    url: Url,
    attempt: u32,
}

impl FetchRequest {
    /// Creates the first attempt (attempt 0) for a URL string
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::InvalidUrl`] if the string is empty, does not
    /// parse, is not absolute, or does not use http/https.
    pub fn new(url: &str) -> Result<Self, HarvestError> {
        let invalid = |reason: String| HarvestError::InvalidUrl {
            url: url.to_string(),
            reason,
        };

        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err(invalid("URL is empty".to_string()));
        }

        let parsed = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;

        if parsed.cannot_be_a_base() {
            return Err(invalid("not an absolute URL".to_string()));
        }

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
        }

        Ok(Self::from_url(parsed))
    }

    /// Wraps an already parsed URL as attempt 0
    pub fn from_url(url: Url) -> Self {
        Self { url, attempt: 0 }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Zero-based attempt counter
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Returns a fresh request for the same URL with the attempt counter incremented
    pub fn next_attempt(&self) -> Self {
        Self {
            url: self.url.clone(),
            attempt: self.attempt + 1,
        }
    }
}

/// Classification of a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Connection, DNS or other transport-level failure
    Network,

    /// The request did not complete within the configured timeout
    Timeout,

    /// The server answered with a status outside 200-299
    BadStatus(u16),

    /// The body could not be parsed as a document
    ParseError,

    /// The batch was cancelled before this chain finished
    Cancelled,
}

impl FailureKind {
    /// Returns true if another attempt could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network | Self::Timeout | Self::BadStatus(_))
    }

    /// Short machine-friendly label, used in summaries and sink output
    pub fn label(&self) -> String {
        match self {
            Self::Network => "network".to_string(),
            Self::Timeout => "timeout".to_string(),
            Self::BadStatus(code) => format!("status-{}", code),
            Self::ParseError => "parse-error".to_string(),
            Self::Cancelled => "cancelled".to_string(),
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "network error"),
            Self::Timeout => write!(f, "timeout"),
            Self::BadStatus(code) => write!(f, "HTTP {}", code),
            Self::ParseError => write!(f, "parse error"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A failure marker: what went wrong, plus a human-readable detail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl FetchFailure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn network(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::Network, detail)
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::Timeout, detail)
    }

    pub fn bad_status(status_code: u16) -> Self {
        Self::new(
            FailureKind::BadStatus(status_code),
            format!("server responded with status {}", status_code),
        )
    }

    pub fn parse(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::ParseError, detail)
    }

    pub fn cancelled(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::Cancelled, detail)
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.detail)
    }
}

/// Terminal result of one fetch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The server answered 2xx and the body was read completely
    Success {
        /// HTTP status code (always 200-299)
        status_code: u16,
        /// Raw response body
        body: Vec<u8>,
    },

    /// The attempt failed
    Failure(FetchFailure),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}
