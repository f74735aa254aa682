//! Unified error handling for `llm-service`.
//!
//! A single top-level [`LlmServiceError`] covers both providers; config
//! problems live in the nested [`ConfigError`]. Helpers for reading
//! environment variables return the unified [`Result<T>`] alias.

use reqwest::StatusCode;
use thiserror::Error;

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, LlmServiceError>;

/// Top-level error for the `llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LlmServiceError {
    /// Configuration/validation errors (startup time).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The provider in the config does not match the service being built.
    #[error("invalid provider for this service")]
    InvalidProvider,

    /// Endpoint is empty or missing an http/https scheme.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The provider requires an API key and none was configured.
    #[error("missing API key")]
    MissingApiKey,

    /// Underlying HTTP transport error.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-successful HTTP status from upstream.
    #[error("unexpected HTTP status {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        /// Short snippet of the response body.
        snippet: String,
    },

    /// Unexpected/invalid JSON response.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Chat completion returned no usable choices.
    #[error("completion response contained no choices")]
    EmptyChoices,
}

/// Error enum for environment-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (ports, limits, timeouts).
    #[error("invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    /// Unsupported provider name.
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),
}

/// Clamps a response body to a short, log-friendly snippet.
pub fn make_snippet(body: &str) -> String {
    body.chars().take(240).collect()
}

/// Fetches a required, non-empty environment variable.
pub fn must_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name).into()),
    }
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => v.parse::<u64>().map(Some).map_err(|_| {
            LlmServiceError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        _ => Ok(None),
    }
}

