//! HTTP fetcher implementation
//!
//! This module performs the single GET request behind every attempt:
//! - Building the HTTP client with the fixed identity header and timeouts
//! - Sending the request and reading the body
//! - Classifying transport errors and non-2xx statuses into typed failures

use crate::config::FetcherConfig;
use crate::state::{FetchFailure, FetchOutcome, FetchRequest};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};

/// Something that can perform one fetch attempt
///
/// Implementations never panic or abort on a bad response; every problem is
/// reported as a [`FetchOutcome::Failure`].
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> FetchOutcome;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use serp_harvest::config::FetcherConfig;
/// use serp_harvest::pipeline::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let redirect = if config.max_redirects == 0 {
        Policy::none()
    } else {
        Policy::limited(config.max_redirects)
    };

    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .redirect(redirect)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a pooled reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher from configuration
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    /// Wraps an existing client; the client's settings are used as-is
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    /// Fetches a URL and classifies the result
    ///
    /// | Condition | Outcome |
    /// |-----------|---------|
    /// | 2xx and body read | `Success` |
    /// | Non-2xx status | `BadStatus(code)` |
    /// | Timeout (request or body) | `Timeout` |
    /// | Connection refused, DNS, TLS, redirect limit | `Network` |
    async fn fetch(&self, request: &FetchRequest) -> FetchOutcome {
        let response = match self.client.get(request.url().clone()).send().await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::Failure(classify_error(&e)),
        };

        let status = response.status();
        if !status.is_success() {
            return FetchOutcome::Failure(FetchFailure::bad_status(status.as_u16()));
        }

        match response.bytes().await {
            Ok(body) => FetchOutcome::Success {
                status_code: status.as_u16(),
                body: body.to_vec(),
            },
            Err(e) => FetchOutcome::Failure(classify_error(&e)),
        }
    }
}

/// Maps a reqwest error onto the failure taxonomy
fn classify_error(error: &reqwest::Error) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::timeout(error.to_string())
    } else if error.is_connect() {
        FetchFailure::network(format!("connection failed: {}", error))
    } else if error.is_redirect() {
        FetchFailure::network(format!("redirect error: {}", error))
    } else {
        FetchFailure::network(error.to_string())
    }
}
