//! Lightweight Ollama service for chat completions and embeddings.
//!
//! Thin client for the local Ollama API:
//! - `POST {endpoint}/api/chat`       — non-streaming chat (`stream=false`)
//! - `POST {endpoint}/api/embeddings` — embeddings retrieval
//!
//! Uses the shared [`LlmModelConfig`] and requires the provider to be
//! [`LlmProvider::Ollama`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::capability::{ChatTurn, CompletionCapability, EmbeddingCapability};
use crate::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
use crate::error_handler::{LlmServiceError, Result, make_snippet};

/// Thin client for Ollama.
#[derive(Debug)]
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    url_embeddings: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - [`LlmServiceError::InvalidProvider`] if `cfg.provider` is not Ollama
    /// - [`LlmServiceError::InvalidEndpoint`] if `cfg.endpoint` is invalid
    /// - [`LlmServiceError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        if cfg.provider != LlmProvider::Ollama {
            return Err(LlmServiceError::InvalidProvider);
        }

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(LlmServiceError::InvalidEndpoint(cfg.endpoint));
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        Ok(Self {
            client,
            cfg,
            url_chat: format!("{base}/api/chat"),
            url_embeddings: format!("{base}/api/embeddings"),
        })
    }

    /// Performs a **non-streaming** chat request via `/api/chat`.
    ///
    /// # Errors
    /// - [`LlmServiceError::HttpStatus`] for non-2xx responses
    /// - [`LlmServiceError::Transport`] for client errors
    /// - [`LlmServiceError::Decode`] if the response cannot be parsed
    #[instrument(skip_all, fields(model = %self.cfg.model, turns = turns.len()))]
    pub async fn chat(&self, turns: &[ChatTurn], temperature: f32) -> Result<String> {
        let body = ChatRequest::new(&self.cfg.model, turns, temperature);

        debug!(target: "llm_service::ollama", "POST {}", self.url_chat);
        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(LlmServiceError::HttpStatus {
                status,
                url,
                snippet: make_snippet(&text),
            });
        }

        let out: ChatResponse = resp.json().await.map_err(|e| {
            LlmServiceError::Decode(format!("serde error: {e}; ensure `stream=false` is used"))
        })?;

        Ok(out.message.content)
    }

    /// Retrieves embeddings via `/api/embeddings`.
    ///
    /// # Errors
    /// - [`LlmServiceError::HttpStatus`] for non-2xx responses
    /// - [`LlmServiceError::Transport`] for client errors
    /// - [`LlmServiceError::Decode`] if the response cannot be parsed
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>> {
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            prompt: input,
        };

        debug!(target: "llm_service::ollama", "POST {}", self.url_embeddings);
        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_embeddings.clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(LlmServiceError::HttpStatus {
                status,
                url,
                snippet: make_snippet(&text),
            });
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            LlmServiceError::Decode(format!("serde error: {e}; expected `{{ embedding: [..] }}`"))
        })?;

        Ok(out.embedding)
    }
}

#[async_trait]
impl EmbeddingCapability for OllamaService {
    async fn embed(&self, input: &str) -> Result<Vec<f32>> {
        self.embeddings(input).await
    }
}

#[async_trait]
impl CompletionCapability for OllamaService {
    async fn complete(&self, turns: &[ChatTurn], temperature: f32) -> Result<String> {
        self.chat(turns, temperature).await
    }
}

/* ==========================
HTTP payloads & options
========================== */

/// Request body for `/api/chat` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

impl<'a> ChatRequest<'a> {
    fn new(model: &'a str, turns: &'a [ChatTurn], temperature: f32) -> Self {
        let messages = turns
            .iter()
            .map(|t| WireMessage {
                role: t.role.as_str(),
                content: &t.content,
            })
            .collect();
        Self {
            model,
            messages,
            stream: false,
            options: ChatOptions { temperature },
        }
    }
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

/// Response body for `/api/chat`.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: String,
}

/// Request body for `/api/embeddings`.
#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Response body for `/api/embeddings`.
#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_provider() {
        let cfg = LlmModelConfig {
            provider: LlmProvider::OpenAi,
            model: "llama3.1".into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            timeout_secs: None,
        };
        assert!(matches!(
            OllamaService::new(cfg).unwrap_err(),
            LlmServiceError::InvalidProvider
        ));
    }

    #[test]
    fn rejects_empty_endpoint() {
        let cfg = LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "llama3.1".into(),
            endpoint: "   ".into(),
            api_key: None,
            timeout_secs: None,
        };
        assert!(matches!(
            OllamaService::new(cfg).unwrap_err(),
            LlmServiceError::InvalidEndpoint(_)
        ));
    }
}
