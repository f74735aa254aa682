//! Unified error type for the rag-index crate.

use thiserror::Error;

/// Errors produced by embedding-index operations.
#[derive(Debug, Error)]
pub enum RagIndexError {
    /// Embedding or completion capability failed.
    #[error("capability error: {0}")]
    Capability(#[from] llm_service::LlmServiceError),
}
