//! Synonym expansion: a Datamuse-style capability client plus a session cache.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::errors::EnrichError;

/// External thesaurus lookup. Best-effort: failures degrade to an empty list.
#[async_trait]
pub trait SynonymCapability: Send + Sync {
    /// Returns up to `max` replacement words for `word`.
    async fn synonyms(&self, word: &str, max: usize) -> Result<Vec<String>, EnrichError>;
}

/// Thin client for the Datamuse `/words?rel_syn=` endpoint.
pub struct DatamuseClient {
    client: reqwest::Client,
    url_words: String,
}

/// One entry of the Datamuse response array.
#[derive(Debug, Deserialize)]
struct DatamuseWord {
    word: String,
    #[serde(default)]
    #[allow(dead_code)]
    score: i64,
}

impl DatamuseClient {
    /// Creates a client for the given base URL (e.g. `https://api.datamuse.com`).
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, EnrichError> {
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
            url_words: format!("{base}/words"),
        })
    }
}

#[async_trait]
impl SynonymCapability for DatamuseClient {
    #[instrument(skip_all, fields(word = %word, max))]
    async fn synonyms(&self, word: &str, max: usize) -> Result<Vec<String>, EnrichError> {
        let resp = self
            .client
            .get(&self.url_words)
            .query(&[("rel_syn", word), ("max", &max.to_string())])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(EnrichError::HttpStatus {
                status: resp.status(),
                url: self.url_words.clone(),
            });
        }

        let words: Vec<DatamuseWord> = resp
            .json()
            .await
            .map_err(|e| EnrichError::Decode(format!("synonym payload: {e}")))?;

        Ok(words.into_iter().map(|w| w.word).collect())
    }
}

/// Session-scoped expander with an unbounded `(word, max)` cache.
///
/// Failed lookups are cached as empty results, so a degraded capability is
/// queried at most once per key within a session.
pub struct SynonymExpander {
    capability: Option<Arc<dyn SynonymCapability>>,
    cache: Mutex<HashMap<String, Vec<String>>>,
}

impl SynonymExpander {
    pub fn new(capability: Option<Arc<dyn SynonymCapability>>) -> Self {
        Self {
            capability,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns up to `max` lowercased synonyms for `word`, excluding the word
    /// itself. Words shorter than two characters never hit the capability.
    pub async fn expand(&self, word: &str, max: usize) -> Vec<String> {
        let word = word.trim();
        if word.chars().count() < 2 {
            return Vec::new();
        }

        let word_lower = word.to_lowercase();
        let key = format!("{word_lower}|{max}");
        if let Some(cached) = self.cache.lock().expect("synonym cache lock").get(&key) {
            return cached.clone();
        }

        let fetched = match &self.capability {
            Some(capability) => match capability.synonyms(word, max).await {
                Ok(list) => list,
                Err(err) => {
                    debug!(
                        target: "query_enrich::synonyms",
                        error = %err,
                        word,
                        "synonym lookup failed; caching empty result"
                    );
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let mut seen: HashSet<String> = HashSet::new();
        let mut result: Vec<String> = Vec::new();
        for entry in fetched {
            let entry = entry.trim().to_lowercase();
            if entry.is_empty() || entry == word_lower {
                continue;
            }
            if seen.insert(entry.clone()) {
                result.push(entry);
            }
        }
        result.truncate(max);

        self.cache
            .lock()
            .expect("synonym cache lock")
            .insert(key, result.clone());
        result
    }
}
