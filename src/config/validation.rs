use crate::config::types::{
    Config, DispatcherConfig, ExtractorConfig, FetcherConfig, RetryConfig, SearchConfig,
};
use crate::ConfigError;
use reqwest::header::HeaderValue;
use scraper::Selector;
use url::Url;

/// Upper bound on the number of retries a schedule may request
const MAX_SCHEDULE_ENTRIES: usize = 10;

/// Upper bound on a single backoff wait (milliseconds)
const MAX_BACKOFF_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_retry_config(&config.retry)?;
    validate_dispatcher_config(&config.dispatcher)?;
    validate_search_config(&config.search)?;
    validate_extractor_config(&config.extractor)?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if HeaderValue::from_str(&config.user_agent).is_err() {
        return Err(ConfigError::Validation(format!(
            "user_agent is not a valid header value: '{}'",
            config.user_agent
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout_secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates the backoff schedule
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.schedule_ms.len() > MAX_SCHEDULE_ENTRIES {
        return Err(ConfigError::Validation(format!(
            "schedule_ms may have at most {} entries, got {}",
            MAX_SCHEDULE_ENTRIES,
            config.schedule_ms.len()
        )));
    }

    if let Some(&wait) = config.schedule_ms.iter().find(|&&ms| ms > MAX_BACKOFF_MS) {
        return Err(ConfigError::Validation(format!(
            "schedule_ms entries must be <= {}ms, got {}ms",
            MAX_BACKOFF_MS, wait
        )));
    }

    Ok(())
}

/// Validates dispatcher configuration
fn validate_dispatcher_config(config: &DispatcherConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 256 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and 256, got {}",
            config.max_concurrent_fetches
        )));
    }

    Ok(())
}

/// Validates search URL settings
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if config.query_param.is_empty() {
        return Err(ConfigError::Validation(
            "query_param cannot be empty".to_string(),
        ));
    }

    if config.offset_param.is_empty() {
        return Err(ConfigError::Validation(
            "offset_param cannot be empty".to_string(),
        ));
    }

    if config.term_separator.is_empty() {
        return Err(ConfigError::Validation(
            "term_separator cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the extractor regions
fn validate_extractor_config(config: &ExtractorConfig) -> Result<(), ConfigError> {
    if config.regions.is_empty() {
        return Err(ConfigError::Validation(
            "at least one extractor region is required".to_string(),
        ));
    }

    for region in &config.regions {
        if region.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "extractor region name cannot be empty".to_string(),
            ));
        }

        validate_selector(&region.name, &region.selector)?;
    }

    Ok(())
}

/// Checks that a region selector is valid CSS
pub(crate) fn validate_selector(name: &str, selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSelector(format!("{} ('{}'): {}", name, selector, e)))
}
