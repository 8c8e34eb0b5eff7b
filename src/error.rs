//! Error types shared by the engine and the application shell.

use std::io;

/// Error type for analysis and rendering.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The target URL was rejected before any network call.
    #[error("invalid URL {input:?}: {reason}")]
    InvalidInput { input: String, reason: &'static str },

    /// Retrieval failed (timeout, DNS, TLS, connection, non-2xx status).
    #[error("{0}")]
    Fetch(#[from] reqwest::Error),

    /// The base URL handed to the extraction pipeline does not parse.
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV output failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, Error>;
