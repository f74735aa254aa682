//! Default chat/embedding configs loaded strictly from environment variables.
//!
//! Two roles are provided:
//!
//! - **Chat**      → answer synthesis over assembled context
//! - **Embedding** → query/chunk vectors for semantic retrieval
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_PROVIDER`     = `openai` (default) or `ollama`
//! - `LLM_TIMEOUT_SECS` = optional request timeout (u64)
//!
//! OpenAI-specific:
//! - `OPENAI_API_KEY`  = API key (mandatory)
//! - `OPENAI_BASE_URL` = endpoint (default `https://api.openai.com`)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (default `http://localhost:11434`)
//!
//! Models:
//! - `CHAT_MODEL`        (default `gpt-4o-mini` / `llama3.1`)
//! - `EMBEDDING_MODEL`   (default `text-embedding-3-small` / `nomic-embed-text`)

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{ConfigError, LlmServiceError, env_opt_u64, must_env};

/// Resolves the active provider from `LLM_PROVIDER` (default OpenAI).
pub fn provider_from_env() -> Result<LlmProvider, LlmServiceError> {
    match std::env::var("LLM_PROVIDER") {
        Ok(v) if !v.trim().is_empty() => LlmProvider::parse(&v),
        _ => Ok(LlmProvider::OpenAi),
    }
}

fn endpoint_from_env(provider: LlmProvider) -> Result<String, LlmServiceError> {
    match provider {
        LlmProvider::OpenAi => Ok(std::env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "https://api.openai.com".to_string())),
        LlmProvider::Ollama => {
            if let Ok(url) = std::env::var("OLLAMA_URL") {
                if !url.trim().is_empty() {
                    return Ok(url);
                }
            }
            if let Ok(port) = std::env::var("OLLAMA_PORT") {
                if !port.trim().is_empty() {
                    port.parse::<u16>().map_err(|_| ConfigError::InvalidNumber {
                        var: "OLLAMA_PORT",
                        reason: "expected u16 (1..=65535)",
                    })?;
                    return Ok(format!("http://localhost:{port}"));
                }
            }
            Ok("http://localhost:11434".to_string())
        }
    }
}

fn api_key_from_env(provider: LlmProvider) -> Result<Option<String>, LlmServiceError> {
    match provider {
        LlmProvider::OpenAi => Ok(Some(must_env("OPENAI_API_KEY")?)),
        LlmProvider::Ollama => Ok(None),
    }
}

/// Constructs the **chat** model config.
///
/// # Defaults
/// - `timeout_secs = Some(60)`
pub fn config_chat_from_env() -> Result<LlmModelConfig, LlmServiceError> {
    let provider = provider_from_env()?;
    let model = std::env::var("CHAT_MODEL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| match provider {
            LlmProvider::OpenAi => "gpt-4o-mini".to_string(),
            LlmProvider::Ollama => "llama3.1".to_string(),
        });

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint: endpoint_from_env(provider)?,
        api_key: api_key_from_env(provider)?,
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(60)),
    })
}

/// Constructs the **embedding** model config.
///
/// # Defaults
/// - `timeout_secs = Some(30)`
pub fn config_embedding_from_env() -> Result<LlmModelConfig, LlmServiceError> {
    let provider = provider_from_env()?;
    let model = std::env::var("EMBEDDING_MODEL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| match provider {
            LlmProvider::OpenAi => "text-embedding-3-small".to_string(),
            LlmProvider::Ollama => "nomic-embed-text".to_string(),
        });

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint: endpoint_from_env(provider)?,
        api_key: api_key_from_env(provider)?,
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(30)),
    })
}
