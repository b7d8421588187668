//! The fetch seam between the executor and the network.
//!
//! [`Transport`] is the black-box `fetch(url, params, headers)` call the
//! executor depends on. [`HttpTransport`] is the production implementation
//! over [`reqwest`]; tests substitute their own.

use std::collections::BTreeMap;

use crate::config::SearchConfig;
use crate::error::{SearchError, TransportError};
use crate::http;

/// One provider request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub params: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
}

/// A provider answer: the HTTP status and the decoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A way of performing a single GET request.
///
/// Implementations must be `Send + Sync` so one transport can serve
/// concurrent searches from worker tasks.
pub trait Transport: Send + Sync {
    /// Fetch `request.url` with `request.params` as the query string and
    /// `request.headers` as request headers.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no response body could be obtained.
    /// A non-2xx status is not an error at this layer.
    fn fetch(
        &self,
        request: &FetchRequest,
    ) -> impl std::future::Future<Output = Result<FetchResponse, TransportError>> + Send;
}

/// [`Transport`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport whose client honours `config`'s timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the client cannot be constructed.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Self {
            client: http::build_client(config)?,
        })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, TransportError> {
        let mut builder = self.client.get(&request.url).query(&request.params);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        tracing::trace!(status, bytes = body.len(), "provider response received");

        Ok(FetchResponse { status, body })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_builder() {
        TransportError::Client(err.to_string())
    } else if err.is_decode() || err.is_body() {
        TransportError::Decode(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}
