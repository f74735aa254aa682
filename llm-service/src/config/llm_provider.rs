//! Provider (backend) selection for LLM calls.

use crate::error_handler::{ConfigError, LlmServiceError};

/// Which backend serves embedding / completion requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// OpenAI-compatible REST API (bearer-authenticated).
    OpenAi,
    /// Local Ollama runtime.
    Ollama,
}

impl LlmProvider {
    /// Parses a provider name (case-insensitive).
    pub fn parse(value: &str) -> Result<Self, LlmServiceError> {
        match value.trim().to_lowercase().as_str() {
            "openai" | "open_ai" | "chatgpt" => Ok(LlmProvider::OpenAi),
            "ollama" => Ok(LlmProvider::Ollama),
            other => Err(ConfigError::UnsupportedProvider(other.to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_providers() {
        assert_eq!(LlmProvider::parse("OpenAI").unwrap(), LlmProvider::OpenAi);
        assert_eq!(LlmProvider::parse("ollama").unwrap(), LlmProvider::Ollama);
        assert!(LlmProvider::parse("mystery").is_err());
    }
}
