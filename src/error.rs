//! Error types for the scout orchestration layer.
//!
//! None of these surface from a search itself: provider failures travel
//! in-band as sentinel result entries. These cover setup (configuration,
//! runtime) and the host bridge's I/O.

/// Top-level error type for scout.
#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Search pipeline setup error.
    #[error("search error: {0}")]
    Search(#[from] scout_search::SearchError),

    /// No async runtime available to run searches on.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A host command was malformed or cannot be carried out.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// Channel send/receive or protocol stream error.
    #[error("channel error: {0}")]
    Channel(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ScoutError>;
