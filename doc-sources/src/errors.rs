//! Unified error type for the doc-sources crate.

use thiserror::Error;

/// Errors produced while reading a content source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Target path/URL was empty.
    #[error("target is empty")]
    EmptyTarget,

    /// Target could not be parsed as an absolute URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Transport/HTTP client error.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-successful HTTP status from the fetched site.
    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    /// Underlying I/O error (file readers).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
