//! Scout: non-blocking web search with a fuzzy-matched query history.
//!
//! A presentation shell submits raw query text and later receives one
//! [`ResultBundle`] per accepted query, without ever blocking on the network.
//!
//! # Architecture
//!
//! - **History**: every accepted query is counted in a shared
//!   [`HistoryStore`], which also ranks past queries by similarity
//! - **Provider**: searches run through `scout_search`, which fetches the
//!   provider's HTML page and extracts result anchors
//! - **Orchestrator**: records the query, then runs matching and the search
//!   on a tokio worker and queues the bundle
//! - **Delivery**: a [`DeliveryContext`] owned by the shell runs each
//!   completion callback exactly once
//! - **Host bridge**: newline-delimited JSON commands and events for shells
//!   in other processes

pub mod bundle;
pub mod config;
pub mod delivery;
pub mod error;
pub mod history;
pub mod host;
pub mod orchestrator;
pub mod query;
pub mod render;
pub mod similarity;

pub use bundle::{LinkBinding, ResultBundle};
pub use config::{HistoryConfig, OutputFormat, ScoutConfig};
pub use delivery::{DeliveryContext, SubmissionState};
pub use error::{Result, ScoutError};
pub use history::{HistoryEntry, HistoryStore};
pub use orchestrator::{Orchestrator, Submission};
pub use query::Query;
pub use render::render_text;
