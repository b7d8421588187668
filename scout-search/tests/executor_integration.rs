//! Integration tests for the HTTP-backed executor.
//!
//! A local wiremock server stands in for the provider so the full path
//! (request building → reqwest → extraction → sentinel handling) runs
//! without touching the network.

use scout_search::{
    NO_RESULTS_TITLE, ResultItem, SEARCH_ERROR_TITLE, SearchConfig, SearchExecutor, links,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FIXTURE_DDG_HTML: &str = include_str!("../test-data/duckduckgo.html");

fn config_for(server: &MockServer) -> SearchConfig {
    SearchConfig {
        endpoint: format!("{}/html/", server.uri()),
        timeout_seconds: 2,
        user_agent: Some("Mozilla/5.0".into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn fixture_page_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .and(query_param("q", "rust programming"))
        .and(header("User-Agent", "Mozilla/5.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FIXTURE_DDG_HTML))
        .expect(1)
        .mount(&server)
        .await;

    let executor = SearchExecutor::http(config_for(&server)).expect("valid config");
    let items = executor.run("rust programming").await;

    assert_eq!(items.len(), 6);
    assert_eq!(items[0].title, "Rust Programming Language");
    assert!(items[0].link.starts_with("//duckduckgo.com/l/?uddg="));
    assert_eq!(
        links::resolve(&executor.config().endpoint, &items[0].link).as_deref(),
        Some("https://www.rust-lang.org/")
    );
}

#[tokio::test]
async fn page_without_results_yields_sentinel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><div class=\"no-results\">No results.</div></body></html>",
        ))
        .mount(&server)
        .await;

    let executor = SearchExecutor::http(config_for(&server)).expect("valid config");
    let items = executor.run("qwzxv").await;

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, NO_RESULTS_TITLE);
    assert_eq!(items[0].link, "");
}

#[tokio::test]
async fn slow_provider_becomes_error_sentinel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(FIXTURE_DDG_HTML)
                .set_delay(std::time::Duration::from_secs(4)),
        )
        .mount(&server)
        .await;

    let config = SearchConfig {
        timeout_seconds: 1,
        ..config_for(&server)
    };
    let executor = SearchExecutor::http(config).expect("valid config");
    let items = executor.run("xyz").await;

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, SEARCH_ERROR_TITLE);
    assert!(!items[0].link.is_empty());
}

#[tokio::test]
async fn unreachable_provider_becomes_error_sentinel() {
    let config = SearchConfig {
        endpoint: "http://127.0.0.1:9/html/".into(),
        timeout_seconds: 2,
        ..Default::default()
    };
    let executor = SearchExecutor::http(config).expect("valid config");
    let items = executor.run("xyz").await;

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, SEARCH_ERROR_TITLE);
    assert!(!items[0].link.is_empty());
    assert!(!items[0].is_navigable());
}

#[tokio::test]
async fn max_results_caps_fixture() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FIXTURE_DDG_HTML))
        .mount(&server)
        .await;

    let config = SearchConfig {
        max_results: Some(3),
        ..config_for(&server)
    };
    let executor = SearchExecutor::http(config).expect("valid config");
    let items: Vec<ResultItem> = executor.run("rust").await;
    assert_eq!(items.len(), 3);
}
