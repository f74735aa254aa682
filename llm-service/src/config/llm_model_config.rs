use crate::config::llm_provider::LlmProvider;

/// Configuration for one LLM model invocation target.
///
/// A service is constructed from exactly one config; use separate configs
/// (and services) for chat and embedding models.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The LLM provider/backend.
    pub provider: LlmProvider,

    /// Model identifier (e.g. `"gpt-4o-mini"`, `"nomic-embed-text"`).
    pub model: String,

    /// Inference endpoint (local server or remote API base URL).
    pub endpoint: String,

    /// Optional API key for providers that require authentication.
    pub api_key: Option<String>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}
