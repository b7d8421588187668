//! Search executor: one provider request, one extraction, no failures out.
//!
//! [`SearchExecutor::run`] always returns at least one [`ResultItem`].
//! Transport failures become the "Error performing search" sentinel and
//! pages without results become the "No results found" sentinel, so the
//! caller never has to handle an error or an empty list.

use std::collections::BTreeMap;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::extract::Extractor;
use crate::http;
use crate::transport::{FetchRequest, HttpTransport, Transport};
use crate::types::ResultItem;

/// Runs searches against the configured provider through a [`Transport`].
#[derive(Debug)]
pub struct SearchExecutor<T> {
    transport: T,
    extractor: Extractor,
    config: SearchConfig,
}

impl SearchExecutor<HttpTransport> {
    /// Build an executor that talks to the network with [`reqwest`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if `config` is invalid or the HTTP client
    /// cannot be built.
    pub fn http(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Self::new(transport, config)
    }
}

impl<T: Transport> SearchExecutor<T> {
    /// Build an executor over an arbitrary transport.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if `config` is invalid.
    pub fn new(transport: T, config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let extractor = Extractor::new(&config.result_rule)?.with_max_results(config.max_results);
        Ok(Self {
            transport,
            extractor,
            config,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The request [`run`](Self::run) sends for `query`.
    pub fn build_request(&self, query: &str) -> FetchRequest {
        FetchRequest {
            url: self.config.endpoint.clone(),
            params: BTreeMap::from([("q".to_owned(), query.to_owned())]),
            headers: BTreeMap::from([
                ("User-Agent".to_owned(), http::user_agent(&self.config)),
                (
                    "Accept-Language".to_owned(),
                    self.config.accept_language.clone(),
                ),
            ]),
        }
    }

    /// Search for `query` and return the extracted results.
    ///
    /// A single attempt is made; there are no retries.
    pub async fn run(&self, query: &str) -> Vec<ResultItem> {
        tracing::trace!(query, "provider search");

        let request = self.build_request(query);
        match self.transport.fetch(&request).await {
            Ok(response) => {
                if !response.is_success() {
                    tracing::warn!(
                        status = response.status,
                        "provider answered with non-success status"
                    );
                }
                tracing::debug!(bytes = response.body.len(), "parsing provider response");
                self.extractor.extract(&response.body)
            }
            Err(err) => {
                tracing::warn!(error = %err, "provider request failed");
                vec![ResultItem::search_error(err.to_string())]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::transport::FetchResponse;
    use crate::types::{NO_RESULTS_TITLE, SEARCH_ERROR_TITLE};
    use std::sync::Mutex;

    /// A transport that replays a canned outcome and records what it was asked.
    struct MockTransport {
        outcome: Result<FetchResponse, TransportError>,
        seen: Mutex<Vec<FetchRequest>>,
    }

    impl MockTransport {
        fn ok(status: u16, body: &str) -> Self {
            Self {
                outcome: Ok(FetchResponse {
                    status,
                    body: body.to_owned(),
                }),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: TransportError) -> Self {
            Self {
                outcome: Err(err),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for MockTransport {
        async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, TransportError> {
            self.seen
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(request.clone());
            self.outcome.clone()
        }
    }

    fn config() -> SearchConfig {
        SearchConfig {
            user_agent: Some("TestBot/1.0".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn request_carries_only_the_query_parameter() {
        let executor =
            SearchExecutor::new(MockTransport::ok(200, ""), config()).expect("valid config");
        executor.run("rust lang").await;

        let seen = executor.transport.seen.lock().expect("lock");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url, "https://html.duckduckgo.com/html/");
        assert_eq!(seen[0].params.len(), 1);
        assert_eq!(seen[0].params.get("q").map(String::as_str), Some("rust lang"));
        assert_eq!(
            seen[0].headers.get("User-Agent").map(String::as_str),
            Some("TestBot/1.0")
        );
    }

    #[tokio::test]
    async fn success_feeds_extractor() {
        let body = r#"<a class="result__a" href="https://a.example">A</a>
                      <a class="result__a" href="https://b.example">B</a>"#;
        let executor =
            SearchExecutor::new(MockTransport::ok(200, body), config()).expect("valid config");

        let items = executor.run("ab").await;
        assert_eq!(
            items,
            vec![
                ResultItem::new("A", "https://a.example"),
                ResultItem::new("B", "https://b.example"),
            ]
        );
    }

    #[tokio::test]
    async fn empty_page_yields_no_results_sentinel() {
        let executor = SearchExecutor::new(MockTransport::ok(200, "<html></html>"), config())
            .expect("valid config");
        let items = executor.run("nothing").await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, NO_RESULTS_TITLE);
        assert!(items[0].link.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_body_is_still_parsed() {
        let executor = SearchExecutor::new(MockTransport::ok(403, "<p>blocked</p>"), config())
            .expect("valid config");
        let items = executor.run("blocked").await;
        assert_eq!(items, vec![ResultItem::no_results()]);
    }

    #[tokio::test]
    async fn transport_failure_yields_error_sentinel() {
        let transport =
            MockTransport::failing(TransportError::Request("connection refused".into()));
        let executor = SearchExecutor::new(transport, config()).expect("valid config");

        let items = executor.run("xyz").await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, SEARCH_ERROR_TITLE);
        assert_eq!(items[0].link, "request failed: connection refused");
    }

    #[tokio::test]
    async fn no_retries_after_failure() {
        let transport = MockTransport::failing(TransportError::Timeout("10s".into()));
        let executor = SearchExecutor::new(transport, config()).expect("valid config");
        executor.run("xyz").await;
        assert_eq!(executor.transport.seen.lock().expect("lock").len(), 1);
    }

    #[test]
    fn invalid_config_rejected() {
        let bad = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert!(SearchExecutor::new(MockTransport::ok(200, ""), bad).is_err());
    }

    #[test]
    fn http_executor_builds_with_defaults() {
        assert!(SearchExecutor::http(SearchConfig::default()).is_ok());
    }
}
