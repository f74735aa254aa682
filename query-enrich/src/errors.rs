//! Unified error type for the query-enrich crate.

use thiserror::Error;

/// Errors produced by the synonym / spell-check capability adapters.
///
/// These never reach the user: callers branch on them and fall back to the
/// identity correction or an empty synonym list.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// Endpoint is empty or missing an http/https scheme.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Transport/HTTP client error.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-successful HTTP status from upstream.
    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("decode error: {0}")]
    Decode(String),
}
