//! Integration tests for the harvest pipeline
//!
//! These tests use wiremock to stand in for the search engine and run
//! full keyword batches end-to-end.

use serp_harvest::config::{parse_config, Config};
use serp_harvest::output::{file_sinks, MemorySink};
use serp_harvest::pipeline::{harvest, PipelineRunner};
use serp_harvest::source::{LineFileKeywords, StaticKeywords};
use serp_harvest::state::FailureKind;
use serp_harvest::HarvestError;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESULTS_PAGE: &str = r#"<html><head><title>wasm - Search</title></head><body>
<div class="b_ad b_adTop"><a href="https://ads.example.com/wasm">Ad</a></div>
<ol id="b_results">
  <li class="b_algo"><h2><a href="https://webassembly.org/">WebAssembly</a></h2></li>
  <li class="b_algo"><h2><a href="http://insecure.example.com/">Insecure</a></h2></li>
  <li class="b_algo"><h2><a href="https://developer.mozilla.org/docs/WebAssembly">MDN</a></h2></li>
  <li class="b_algo"><h2><a href="https://webassembly.org/">Duplicate</a></h2></li>
</ol>
<div class="b_ad b_adBottom"><a href="https://ads.example.com/bottom">Ad</a></div>
</body></html>"#;

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.search.base_url = format!("{}/search", base_url);
    config.retry.schedule_ms = vec![10];
    config.dispatcher.stagger_ms = 0;
    config.fetcher.timeout_secs = 5;
    config
}

#[tokio::test]
async fn test_failed_keyword_is_reported_after_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "wasm"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(RESULTS_PAGE)
                .insert_header("content-type", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    // One initial attempt plus one retry
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust vs go"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let keywords = StaticKeywords::new(["rust vs go", "wasm"]);
    let mut sink = MemorySink::new();

    let report = harvest(&config, &keywords, &mut sink, &CancellationToken::new())
        .await
        .expect("harvest failed");

    let failed_url = format!("{}/search?q=rust+vs+go&first=10", mock_server.uri());
    let wasm_url = format!("{}/search?q=wasm&first=10", mock_server.uri());

    assert_eq!(report.result.len(), 2);
    assert_eq!(report.result.failed_urls(), &[failed_url.clone()]);

    let failed = report.result.get(&failed_url).unwrap();
    assert_eq!(failed.failure().unwrap().kind, FailureKind::BadStatus(500));
    assert_eq!(failed.attempts, 2);

    let wasm = report.result.get(&wasm_url).unwrap();
    assert_eq!(
        wasm.links().unwrap().as_slice(),
        &[
            "https://ads.example.com/wasm",
            "https://webassembly.org/",
            "https://developer.mozilla.org/docs/WebAssembly",
            "https://ads.example.com/bottom",
        ]
    );

    assert_eq!(sink.entries().len(), 2);
    assert!(report.summary.to_string().contains(&failed_url));
}

#[tokio::test]
async fn test_unreachable_engine_fails_every_url() {
    let mut config = create_test_config("http://127.0.0.1:1");
    config.fetcher.connect_timeout_secs = 1;

    let keywords = StaticKeywords::new(["one", "two", "three"]);
    let mut sink = MemorySink::new();

    let report = harvest(&config, &keywords, &mut sink, &CancellationToken::new())
        .await
        .expect("harvest failed");

    assert_eq!(report.result.len(), 3);
    assert_eq!(report.result.failure_count(), 3);
    assert_eq!(report.summary.succeeded, 0);
    for entry in report.result.entries() {
        let kind = entry.failure().unwrap().kind;
        assert!(matches!(kind, FailureKind::Network | FailureKind::Timeout));
    }
}

#[tokio::test]
async fn test_user_agent_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(header("user-agent", "serp-harvest-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.fetcher.user_agent = "serp-harvest-test/1.0".to_string();

    let report = harvest(
        &config,
        &StaticKeywords::new(["wasm"]),
        &mut MemorySink::new(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.result.success_count(), 1);
}

#[tokio::test]
async fn test_file_sinks_write_artifacts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "wasm"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "empty page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body><p>No results</p></body></html>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let keywords_path = dir.path().join("keywords.txt");
    std::fs::write(&keywords_path, "keyword\nwasm\n\nempty page\nmissing\n").unwrap();
    let out_dir = dir.path().join("out");

    let config = create_test_config(&mock_server.uri());
    let source = LineFileKeywords::new(&keywords_path).with_header(true);
    let mut sink = file_sinks(&config.output, Some(out_dir.as_path())).unwrap();

    let report = PipelineRunner::from_config(&config)
        .unwrap()
        .run(&source, &mut sink, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.result.len(), 3);
    assert_eq!(report.summary.empty_results, vec!["empty page".to_string()]);
    assert_eq!(report.result.sink_errors(), 0);

    let first = std::fs::read_to_string(out_dir.join("0.txt")).unwrap();
    assert!(first.starts_with("wasm\nhttps://ads.example.com/wasm\n"));
    assert_eq!(
        std::fs::read_to_string(out_dir.join("1.txt")).unwrap(),
        "empty page\n"
    );
    assert!(!out_dir.join("2.txt").exists());

    let tsv = std::fs::read_to_string(out_dir.join("results.tsv")).unwrap();
    let lines: Vec<&str> = tsv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("wasm\tok\thttps://ads.example.com/wasm "));
    assert_eq!(lines[2], "empty page\tok\t");
    assert_eq!(lines[3], "missing\tstatus-404\t");
}

#[tokio::test]
async fn test_missing_keyword_file_is_an_error() {
    let config = create_test_config("http://127.0.0.1:1");
    let source = LineFileKeywords::new("/nonexistent/keywords.txt");

    let result = harvest(&config, &source, &mut MemorySink::new(), &CancellationToken::new()).await;
    assert!(matches!(result, Err(HarvestError::Source(_))));
}

#[tokio::test]
async fn test_config_file_drives_the_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/find"))
        .and(query_param("query", "wasm"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><div class="hit"><a href="https://webassembly.org/">w</a></div></body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = parse_config(&format!(
        r#"
[retry]
schedule-ms = []

[dispatcher]
stagger-ms = 0

[search]
base-url = "{}/find"
query-param = "query"
offset-param = "offset"
result-offset = 0

[[extractor.regions]]
name = "hits"
selector = "div.hit"
"#,
        mock_server.uri()
    ))
    .unwrap();

    let report = harvest(
        &config,
        &StaticKeywords::new(["wasm"]),
        &mut MemorySink::new(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    let entry = &report.result.entries()[0];
    assert_eq!(entry.links().unwrap().as_slice(), &["https://webassembly.org/"]);
}
