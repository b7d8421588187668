//! # scout-search
//!
//! The provider-facing half of scout: send a query to a web search
//! provider's HTML endpoint, pull the result anchors out of the page, and
//! hand back a list that is never empty and never an error.
//!
//! ## Design
//!
//! - The network is behind the [`Transport`] trait; [`HttpTransport`] is the
//!   [`reqwest`] implementation
//! - Results are recognised by an explicit [`SelectorRule`] (tag + attribute
//!   token), compiled once into an [`Extractor`]
//! - Failures degrade to sentinel [`ResultItem`]s instead of errors
//!
//! ## Security
//!
//! - No API keys or secrets to leak
//! - No network listeners; this is a library, not a server
//! - Search queries are logged only at trace level

pub mod config;
pub mod error;
pub mod executor;
pub mod extract;
pub mod http;
pub mod links;
pub mod transport;
pub mod types;

pub use config::SearchConfig;
pub use error::{Result, SearchError, TransportError};
pub use executor::SearchExecutor;
pub use extract::Extractor;
pub use transport::{FetchRequest, FetchResponse, HttpTransport, Transport};
pub use types::{ItemKind, NO_RESULTS_TITLE, ResultItem, SEARCH_ERROR_TITLE, SelectorRule};

/// Search the provider once with the given configuration.
///
/// Convenience wrapper that builds an HTTP-backed [`SearchExecutor`] for a
/// single query. Hosts issuing many searches should build one executor and
/// reuse it.
///
/// # Errors
///
/// Returns [`SearchError`] only if `config` is invalid or the HTTP client
/// cannot be built. Provider failures are reported in-band as the
/// "Error performing search" entry.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> scout_search::Result<()> {
/// let config = scout_search::SearchConfig::default();
/// let items = scout_search::search("rust programming", &config).await?;
/// for item in &items {
///     println!("{}: {}", item.title, item.link);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &SearchConfig) -> Result<Vec<ResultItem>> {
    let executor = SearchExecutor::http(config.clone())?;
    Ok(executor.run(query).await)
}
