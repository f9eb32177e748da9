use serde::Deserialize;
use std::time::Duration;

/// Identity header sent with every request when none is configured
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_6) ";

/// Main configuration structure for Serp-Harvest
///
/// Every section has defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// User-Agent header value sent on every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Maximum redirect hops to follow; 0 disables redirect following
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 15,
            connect_timeout_secs: 10,
            max_redirects: 5,
        }
    }
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Backoff schedule configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Wait before each retry (milliseconds); the length is the retry budget
    #[serde(rename = "schedule-ms")]
    pub schedule_ms: Vec<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            schedule_ms: vec![1000, 3000],
        }
    }
}

impl RetryConfig {
    pub fn schedule(&self) -> Vec<Duration> {
        self.schedule_ms
            .iter()
            .map(|&ms| Duration::from_millis(ms))
            .collect()
    }
}

/// Batch dispatch configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Maximum number of chains fetching at the same time
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: usize,

    /// Delay between launching consecutive chains (milliseconds)
    #[serde(rename = "stagger-ms")]
    pub stagger_ms: u64,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 8,
            stagger_ms: 50,
        }
    }
}

impl DispatcherConfig {
    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }
}

/// Search URL derivation configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search endpoint, without query string
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Query parameter carrying the search terms
    #[serde(rename = "query-param")]
    pub query_param: String,

    /// Separator placed between encoded terms
    #[serde(rename = "term-separator")]
    pub term_separator: String,

    /// Query parameter carrying the result offset
    #[serde(rename = "offset-param")]
    pub offset_param: String,

    /// Fixed result offset requested for every keyword
    #[serde(rename = "result-offset")]
    pub result_offset: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.bing.com/search".to_string(),
            query_param: "q".to_string(),
            term_separator: "+".to_string(),
            offset_param: "first".to_string(),
            result_offset: 10,
        }
    }
}

/// Link extraction configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Regions scanned for anchors, in scan order
    pub regions: Vec<RegionConfig>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            regions: vec![
                RegionConfig::new("top-ad", ".b_ad.b_adTop"),
                RegionConfig::new("main-results", ".b_algo"),
                RegionConfig::new("bottom-ad", ".b_ad.b_adBottom"),
            ],
        }
    }
}

/// A named structural region of a result page
#[derive(Debug, Clone, Deserialize)]
pub struct RegionConfig {
    /// Region name, used in logs
    pub name: String,

    /// CSS selector matching the region's container elements
    pub selector: String,
}

impl RegionConfig {
    pub fn new(name: &str, selector: &str) -> Self {
        Self {
            name: name.to_string(),
            selector: selector.to_string(),
        }
    }
}

/// Keyword input configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Path to the keyword file (one keyword per line)
    #[serde(rename = "keywords-path")]
    pub keywords_path: String,

    /// Treat the first line as a header and skip it
    #[serde(rename = "skip-header")]
    pub skip_header: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            keywords_path: "keywords.txt".to_string(),
            skip_header: false,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving one `<index>.txt` file per successful URL
    pub directory: String,

    /// Tab-separated summary file, relative to `directory`
    #[serde(rename = "summary-file")]
    pub summary_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "results".to_string(),
            summary_file: "results.tsv".to_string(),
        }
    }
}
