//! Error types for logscope-core

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the logscope-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// The log root could not be enumerated
    #[error("failed to discover log files under {root:?}: {message}")]
    Discovery { root: PathBuf, message: String },

    /// A transcript could not be read as text
    #[error("failed to load session {path:?}: {source}")]
    SessionLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Analysis cache write or delete failure
    #[error("analysis cache error: {0}")]
    Cache(String),

    /// Provider reply could not be turned into suggestions
    #[error("analysis error: {0}")]
    Analysis(String),

    /// A background worker panicked or was cancelled
    #[error("task error: {0}")]
    Task(String),
}

/// Result type alias for logscope-core
pub type Result<T> = std::result::Result<T, Error>;
