//! OpenAI-compatible service for chat completions and embeddings.
//!
//! Minimal, non-streaming client around the REST API. Endpoints derive from
//! `LlmModelConfig::endpoint`:
//! - `POST {endpoint}/v1/chat/completions` — chat completion
//! - `POST {endpoint}/v1/embeddings`       — embeddings retrieval
//!
//! Constructor validation:
//! - `cfg.provider` must be [`LlmProvider::OpenAi`]
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::capability::{ChatTurn, CompletionCapability, EmbeddingCapability};
use crate::config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
use crate::error_handler::{LlmServiceError, Result, make_snippet};

/// Thin client for an OpenAI-compatible API.
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    url_embeddings: String,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from the given config.
    ///
    /// # Errors
    /// - [`LlmServiceError::InvalidProvider`] if `cfg.provider` is not OpenAI
    /// - [`LlmServiceError::MissingApiKey`] if `cfg.api_key` is `None`
    /// - [`LlmServiceError::InvalidEndpoint`] if `cfg.endpoint` is invalid
    /// - [`LlmServiceError::Transport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self> {
        if cfg.provider != LlmProvider::OpenAi {
            return Err(LlmServiceError::InvalidProvider);
        }

        let api_key = cfg.api_key.clone().ok_or(LlmServiceError::MissingApiKey)?;

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

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| LlmServiceError::Decode(format!("invalid API key header: {e}")))?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_chat = format!("{base}/v1/chat/completions");
        let url_embeddings = format!("{base}/v1/embeddings");

        info!(
            target: "llm_service::openai",
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            "OpenAiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
            url_embeddings,
        })
    }

    /// Performs a **non-streaming** chat completion (`/v1/chat/completions`).
    ///
    /// # Errors
    /// - [`LlmServiceError::HttpStatus`] for non-2xx responses
    /// - [`LlmServiceError::Transport`] for client/network failures
    /// - [`LlmServiceError::Decode`] if the JSON cannot be parsed
    /// - [`LlmServiceError::EmptyChoices`] if no choices are returned
    #[instrument(skip_all, fields(model = %self.cfg.model, turns = turns.len()))]
    pub async fn chat(&self, turns: &[ChatTurn], temperature: f32) -> Result<String> {
        let started = Instant::now();
        let body = ChatCompletionRequest::new(&self.cfg.model, turns, temperature);

        debug!(target: "llm_service::openai", "POST {}", self.url_chat);
        let resp = self.client.post(&self.url_chat).json(&body).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                target: "llm_service::openai",
                %status,
                %url,
                latency_ms = started.elapsed().as_millis(),
                "chat completion returned non-success status"
            );

            return Err(LlmServiceError::HttpStatus {
                status,
                url,
                snippet,
            });
        }

        let out: ChatCompletionResponse = resp.json().await.map_err(|e| {
            LlmServiceError::Decode(format!(
                "serde error: {e}; expected `choices[0].message.content`"
            ))
        })?;

        let content = out
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or(LlmServiceError::EmptyChoices)?;

        info!(
            target: "llm_service::openai",
            latency_ms = started.elapsed().as_millis(),
            "chat completion finished"
        );

        Ok(content)
    }

    /// Retrieves a single embeddings vector via `/v1/embeddings`.
    ///
    /// # Errors
    /// - [`LlmServiceError::HttpStatus`] for non-2xx responses
    /// - [`LlmServiceError::Transport`] for client/network failures
    /// - [`LlmServiceError::Decode`] if the JSON cannot be parsed or `data` is empty
    #[instrument(skip_all, fields(model = %self.cfg.model, input_len = input.len()))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>> {
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            input,
        };

        debug!(target: "llm_service::openai", "POST {}", self.url_embeddings);
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
            LlmServiceError::Decode(format!("serde error: {e}; expected `data[0].embedding`"))
        })?;

        let first = out
            .data
            .into_iter()
            .next()
            .ok_or_else(|| LlmServiceError::Decode("empty `data` in embeddings response".into()))?;

        Ok(first.embedding)
    }
}

#[async_trait]
impl EmbeddingCapability for OpenAiService {
    async fn embed(&self, input: &str) -> Result<Vec<f32>> {
        self.embeddings(input).await
    }
}

#[async_trait]
impl CompletionCapability for OpenAiService {
    async fn complete(&self, turns: &[ChatTurn], temperature: f32) -> Result<String> {
        self.chat(turns, temperature).await
    }
}

/* ==========================
HTTP payloads & options
========================== */

/// Request body for `/v1/chat/completions` (non-streaming).
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
}

impl<'a> ChatCompletionRequest<'a> {
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
            temperature,
        }
    }
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Minimal response for `/v1/chat/completions`.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

/// Request body for `/v1/embeddings`.
#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

/// Response body for `/v1/embeddings`.
#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(provider: LlmProvider, api_key: Option<&str>) -> LlmModelConfig {
        LlmModelConfig {
            provider,
            model: "gpt-4o-mini".into(),
            endpoint: "https://api.openai.com".into(),
            api_key: api_key.map(str::to_string),
            timeout_secs: Some(10),
        }
    }

    #[test]
    fn rejects_wrong_provider() {
        let err = OpenAiService::new(cfg(LlmProvider::Ollama, Some("sk-x"))).unwrap_err();
        assert!(matches!(err, LlmServiceError::InvalidProvider));
    }

    #[test]
    fn rejects_missing_api_key() {
        let err = OpenAiService::new(cfg(LlmProvider::OpenAi, None)).unwrap_err();
        assert!(matches!(err, LlmServiceError::MissingApiKey));
    }

    #[test]
    fn rejects_bad_endpoint() {
        let mut config = cfg(LlmProvider::OpenAi, Some("sk-x"));
        config.endpoint = "ftp://example.com".into();
        let err = OpenAiService::new(config).unwrap_err();
        assert!(matches!(err, LlmServiceError::InvalidEndpoint(_)));
    }
}
