//! Whole-query spell correction: a LanguageTool-style capability client plus
//! a session cache.
//!
//! The corrector is an optional pre-pass in front of vocabulary-based typo
//! repair; when the capability is absent or failing it degrades to the
//! identity correction.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::errors::EnrichError;

/// External whole-string spell checker. Best-effort only.
#[async_trait]
pub trait SpellCheckCapability: Send + Sync {
    /// Returns a corrected copy of `text`.
    async fn correct(&self, text: &str) -> Result<String, EnrichError>;
}

/// Thin client for the LanguageTool `/v2/check` endpoint.
pub struct LanguageToolClient {
    client: reqwest::Client,
    url_check: String,
    language: String,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<CheckMatch>,
}

#[derive(Debug, Deserialize)]
struct CheckMatch {
    offset: usize,
    length: usize,
    #[serde(default)]
    replacements: Vec<Replacement>,
}

#[derive(Debug, Deserialize)]
struct Replacement {
    value: String,
}

impl LanguageToolClient {
    /// Creates a client for the given base URL (e.g. `https://api.languagetool.org`).
    pub fn new(base_url: &str, language: &str, timeout_secs: u64) -> Result<Self, EnrichError> {
        let endpoint = base_url.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(EnrichError::InvalidEndpoint(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        Ok(Self {
            client,
            url_check: format!("{base}/v2/check"),
            language: language.to_string(),
        })
    }
}

#[async_trait]
impl SpellCheckCapability for LanguageToolClient {
    #[instrument(skip_all, fields(len = text.len()))]
    async fn correct(&self, text: &str) -> Result<String, EnrichError> {
        let resp = self
            .client
            .post(&self.url_check)
            .form(&[("text", text), ("language", self.language.as_str())])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(EnrichError::HttpStatus {
                status: resp.status(),
                url: self.url_check.clone(),
            });
        }

        let parsed: CheckResponse = resp
            .json()
            .await
            .map_err(|e| EnrichError::Decode(format!("spell payload: {e}")))?;

        Ok(apply_replacements(text, &parsed.matches))
    }
}

/// Applies the first replacement of every match, back to front so earlier
/// offsets stay valid. Out-of-bounds matches are skipped.
fn apply_replacements(text: &str, matches: &[CheckMatch]) -> String {
    let mut chars: Vec<char> = text.chars().collect();

    let mut ordered: Vec<&CheckMatch> = matches
        .iter()
        .filter(|m| !m.replacements.is_empty())
        .collect();
    ordered.sort_by(|a, b| b.offset.cmp(&a.offset));

    for m in ordered {
        let value = m.replacements[0].value.trim();
        if value.is_empty() {
            continue;
        }
        let end = m.offset + m.length;
        if end > chars.len() {
            continue;
        }
        chars.splice(m.offset..end, value.chars());
    }

    chars.into_iter().collect()
}

/// Session-scoped corrector with an unbounded per-input cache.
///
/// Failures are cached as the identity result, so a degraded capability is
/// queried at most once per input within a session.
pub struct SpellCorrector {
    capability: Option<Arc<dyn SpellCheckCapability>>,
    cache: Mutex<HashMap<String, String>>,
}

impl SpellCorrector {
    pub fn new(capability: Option<Arc<dyn SpellCheckCapability>>) -> Self {
        Self {
            capability,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the corrected text, or `text` unchanged when the capability is
    /// absent or fails.
    pub async fn correct(&self, text: &str) -> String {
        let Some(capability) = &self.capability else {
            return text.to_string();
        };

        if let Some(cached) = self.cache.lock().expect("spell cache lock").get(text) {
            return cached.clone();
        }

        let corrected = match capability.correct(text).await {
            Ok(value) => value,
            Err(err) => {
                debug!(
                    target: "query_enrich::spell",
                    error = %err,
                    "spell check failed; caching identity result"
                );
                text.to_string()
            }
        };

        self.cache
            .lock()
            .expect("spell cache lock")
            .insert(text.to_string(), corrected.clone());
        corrected
    }
}
