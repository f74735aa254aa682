//! Chat transcript: what the presentation layer renders.

use chrono::{DateTime, Utc};
use llm_service::ChatRole;
use serde::{Deserialize, Serialize};

/// Placeholder shown while a turn is in flight; always removed before the
/// final answer lands.
pub const TYPING_PLACEHOLDER: &str = "Typing…";

/// One rendered transcript entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only message list, except for the transient typing placeholder.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::new(ChatRole::User, text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.messages
            .push(ChatMessage::new(ChatRole::Assistant, text));
    }

    pub fn push_typing(&mut self) {
        self.push_assistant(TYPING_PLACEHOLDER);
    }

    /// Removes the most recent typing placeholder, if present.
    pub fn remove_typing(&mut self) {
        if let Some(pos) = self
            .messages
            .iter()
            .rposition(|m| m.role == ChatRole::Assistant && m.text == TYPING_PLACEHOLDER)
        {
            self.messages.remove(pos);
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_placeholder_is_removed_once() {
        let mut transcript = Transcript::default();
        transcript.push_user("question");
        transcript.push_typing();
        transcript.remove_typing();
        transcript.push_assistant("answer");

        let texts: Vec<&str> = transcript
            .messages()
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(texts, vec!["question", "answer"]);

        // A second removal is a no-op.
        transcript.remove_typing();
        assert_eq!(transcript.messages().len(), 2);
    }
}
