//! Unified error type for the chat-session crate.

use thiserror::Error;

/// Errors that can abort a turn.
///
/// These never escape [`crate::ChatSession::send`]: the turn controller maps
/// them to the fixed recoverable-failure message.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Semantic retrieval (embedding or completion) failed.
    #[error("retrieval error: {0}")]
    Retrieval(#[from] rag_index::RagIndexError),
}
