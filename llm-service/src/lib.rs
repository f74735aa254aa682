//! LLM capability layer: embedding and chat-completion providers behind
//! substitutable traits, with unified errors and env-driven configs.
//!
//! Providers:
//! - [`services::open_ai_service::OpenAiService`] — OpenAI-compatible REST API
//! - [`services::ollama_service::OllamaService`]  — local Ollama runtime

pub mod capability;
pub mod config;
pub mod error_handler;
pub mod services;
pub mod telemetry;

pub use capability::{ChatRole, ChatTurn, CompletionCapability, EmbeddingCapability};
pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{LlmServiceError, Result};
