//! Error types for the scout-search crate.
//!
//! Two families live here. [`TransportError`] covers a single failed fetch
//! and never crosses the executor boundary as an error: the executor turns
//! it into a sentinel result entry. [`SearchError`] covers construction
//! problems (bad configuration, an HTTP client that cannot be built) and is
//! only returned before any search runs.

/// A failed provider fetch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Request(String),

    /// The provider did not answer within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The response body could not be read or decoded as text.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The request could not be built (invalid URL, bad header value).
    #[error("invalid request: {0}")]
    Client(String),
}

/// Errors raised while setting up a search pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A selector rule could not be compiled.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Convenience type alias for scout-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
