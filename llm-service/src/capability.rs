//! Capability traits consumed by the retrieval core, plus the chat turn
//! model shared with the session layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error_handler::Result;

/// Author of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    /// Wire-level role string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

/// One turn of a conversation, as forwarded to the completion capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Produces one embedding vector per input text.
///
/// Failures always surface as `Err`; callers decide whether that aborts the
/// whole operation (query time) or just one chunk's contribution (index
/// build).
#[async_trait]
pub trait EmbeddingCapability: Send + Sync {
    async fn embed(&self, input: &str) -> Result<Vec<f32>>;
}

/// Produces a chat completion for an ordered list of turns.
#[async_trait]
pub trait CompletionCapability: Send + Sync {
    async fn complete(&self, turns: &[ChatTurn], temperature: f32) -> Result<String>;
}
