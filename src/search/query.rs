use crate::config::SearchConfig;
use crate::search::SearchJob;
use url::form_urlencoded;

/// URL-encodes each whitespace-separated term and joins them with `separator`
///
/// Returns None if the keyword has no terms.
pub fn encode_terms(keyword: &str, separator: &str) -> Option<String> {
    let terms: Vec<String> = keyword
        .split_whitespace()
        .map(|term| form_urlencoded::byte_serialize(term.as_bytes()).collect::<String>())
        .collect();

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(separator))
    }
}

/// Builds the search-result page URL for one keyword
///
/// # Example
///
/// ```
/// use serp_harvest::config::SearchConfig;
/// use serp_harvest::search::build_search_url;
///
/// let url = build_search_url("rust vs go", &SearchConfig::default()).unwrap();
/// assert_eq!(url, "https://www.bing.com/search?q=rust+vs+go&first=10");
/// ```
pub fn build_search_url(keyword: &str, config: &SearchConfig) -> Option<String> {
    let terms = encode_terms(keyword, &config.term_separator)?;
    let glue = if config.base_url.contains('?') { '&' } else { '?' };

    Some(format!(
        "{}{}{}={}&{}={}",
        config.base_url,
        glue,
        config.query_param,
        terms,
        config.offset_param,
        config.result_offset
    ))
}

/// Derives one job per keyword, in keyword order
///
/// Blank keywords are skipped with a warning.
pub fn derive_jobs(keywords: &[String], config: &SearchConfig) -> Vec<SearchJob> {
    keywords
        .iter()
        .filter_map(|keyword| match build_search_url(keyword, config) {
            Some(url) => Some(SearchJob {
                keyword: keyword.trim().to_string(),
                url,
            }),
            None => {
                tracing::warn!("Skipping blank keyword {:?}", keyword);
                None
            }
        })
        .collect()
}
