//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls which endpoint is queried, how results are
//! recognised in the returned page, and request behaviour. The defaults
//! target DuckDuckGo's HTML-only endpoint.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::SelectorRule;

/// DuckDuckGo's JavaScript-free results page.
pub const DEFAULT_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

/// Configuration for the provider-facing half of a search.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour. Deserializes from a partial table,
/// with missing fields taking their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Provider query endpoint. The query is sent as its single `q` parameter.
    pub endpoint: String,
    /// Which elements of the returned page are results.
    pub result_rule: SelectorRule,
    /// HTTP request timeout in seconds.
    pub timeout_seconds: u64,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Optional cap on extracted results. `None` keeps every match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
    /// Value of the `Accept-Language` header.
    pub accept_language: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            result_rule: SelectorRule::default(),
            timeout_seconds: 10,
            user_agent: None,
            max_results: None,
            accept_language: "en-US,en;q=0.9".to_owned(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `endpoint` must be an absolute http(s) URL
    /// - `timeout_seconds` must be greater than 0
    /// - `max_results`, when set, must be greater than 0
    /// - the selector rule must name a tag, an attribute and a value
    pub fn validate(&self) -> Result<(), SearchError> {
        let endpoint = url::Url::parse(&self.endpoint)
            .map_err(|e| SearchError::Config(format!("endpoint is not a valid URL: {e}")))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(SearchError::Config("endpoint must use http or https".into()));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config("timeout_seconds must be greater than 0".into()));
        }
        if self.max_results == Some(0) {
            return Err(SearchError::Config("max_results must be greater than 0 when set".into()));
        }
        let rule = &self.result_rule;
        if rule.tag.trim().is_empty()
            || rule.attribute.trim().is_empty()
            || rule.value.is_empty()
        {
            return Err(SearchError::Config(
                "result_rule needs a tag, an attribute and a value".into(),
            ));
        }
        Ok(())
    }
}
