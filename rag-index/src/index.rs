//! In-memory embedding index and the retrieval-augmented ask path.

use std::sync::Arc;

use doc_index::PageText;
use llm_service::{ChatTurn, CompletionCapability, EmbeddingCapability};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::errors::RagIndexError;
use crate::vector_math::cosine;

/// Chunks forwarded as context per question.
pub const DEFAULT_TOP_K: usize = 4;

/// History turns forwarded alongside the context.
const HISTORY_WINDOW: usize = 8;

/// Sampling temperature for context-grounded answers.
const ANSWER_TEMPERATURE: f32 = 0.2;

const SYSTEM_INSTRUCTION: &str =
    "You are a helpful assistant. Answer using ONLY the provided CONTEXT. If not found, say you don't know.";

const NOT_INDEXED_MESSAGE: &str =
    "No document/web content is indexed yet. Load a document or URL first.";

/// One chunk with its embedding vector.
///
/// Vectors share one dimensionality within an index (the provider's output
/// size); the whole set is replaced per load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingChunk {
    pub page_number: u32,
    pub text: String,
    pub vector: Vec<f32>,
}

/// Per-session semantic index over the loaded chunks.
pub struct RagIndex {
    embedding: Arc<dyn EmbeddingCapability>,
    completion: Arc<dyn CompletionCapability>,
    chunks: Vec<EmbeddingChunk>,
    top_k: usize,
}

impl RagIndex {
    pub fn new(
        embedding: Arc<dyn EmbeddingCapability>,
        completion: Arc<dyn CompletionCapability>,
    ) -> Self {
        Self {
            embedding,
            completion,
            chunks: Vec::new(),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Readiness signal: the index answers questions only when at least one
    /// chunk was embedded.
    pub fn has_index(&self) -> bool {
        !self.chunks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// Rebuilds the index for a fresh load: clear, then embed every non-empty
    /// chunk in order.
    ///
    /// A failure mid-build propagates immediately and leaves the index in the
    /// partial state the loop reached; callers treat [`RagIndex::has_index`]
    /// as the readiness signal.
    #[instrument(skip_all, fields(pages = pages.len()))]
    pub async fn index_pages(&mut self, pages: &[PageText]) -> Result<usize, RagIndexError> {
        self.chunks.clear();

        for page in pages {
            if page.text.trim().is_empty() {
                continue;
            }
            let vector = self.embedding.embed(&page.text).await.map_err(|e| {
                warn!(
                    target: "rag_index::build",
                    page = page.page_number,
                    indexed = self.chunks.len(),
                    "embedding failed mid-build; index left partial"
                );
                e
            })?;
            self.chunks.push(EmbeddingChunk {
                page_number: page.page_number,
                text: page.text.clone(),
                vector,
            });
        }

        info!(
            target: "rag_index::build",
            indexed = self.chunks.len(),
            "embedding index rebuilt"
        );
        Ok(self.chunks.len())
    }

    /// Answers `question` from the indexed chunks.
    ///
    /// Embeds the question, ranks every chunk by cosine similarity, and calls
    /// the completion capability with, in order: the fixed system
    /// instruction, the assembled context block, the last [`HISTORY_WINDOW`]
    /// history turns, and the question itself.
    ///
    /// # Errors
    /// Any embedding or completion failure aborts the whole retrieval.
    #[instrument(skip_all, fields(history = history.len()))]
    pub async fn ask(&self, question: &str, history: &[ChatTurn]) -> Result<String, RagIndexError> {
        if !self.has_index() {
            return Ok(NOT_INDEXED_MESSAGE.to_string());
        }

        let query_vector = self.embedding.embed(question).await?;

        let mut ranked: Vec<(&EmbeddingChunk, f64)> = self
            .chunks
            .iter()
            .map(|chunk| (chunk, cosine(&query_vector, &chunk.vector)))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(self.top_k);

        debug!(
            target: "rag_index::ask",
            candidates = self.chunks.len(),
            selected = ranked.len(),
            best_score = ranked.first().map(|(_, s)| *s).unwrap_or_default(),
            "chunks selected for context"
        );

        let context = build_context(ranked.iter().map(|(chunk, _)| *chunk));

        let mut turns: Vec<ChatTurn> = Vec::with_capacity(HISTORY_WINDOW + 3);
        turns.push(ChatTurn::system(SYSTEM_INSTRUCTION));
        turns.push(ChatTurn::system(context));
        let start = history.len().saturating_sub(HISTORY_WINDOW);
        turns.extend(history[start..].iter().cloned());
        turns.push(ChatTurn::user(question));

        Ok(self.completion.complete(&turns, ANSWER_TEMPERATURE).await?)
    }
}

/// Concatenates chosen chunks into the context block, best match first.
fn build_context<'a>(chunks: impl Iterator<Item = &'a EmbeddingChunk>) -> String {
    let mut out = String::from("CONTEXT:\n--------\n");
    for chunk in chunks {
        out.push_str(&format!("[Chunk p{}]\n{}\n\n", chunk.page_number, chunk.text));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use llm_service::{ChatRole, LlmServiceError, Result as LlmResult};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Embeds each text as a fixed vector looked up by keyword.
    struct KeywordEmbedder {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl EmbeddingCapability for KeywordEmbedder {
        async fn embed(&self, input: &str) -> LlmResult<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(LlmServiceError::Decode("stub embedding failure".into()));
            }
            // Orthogonal axes per topic keeps ranking predictable.
            let vector = if input.contains("refund") {
                vec![1.0, 0.0]
            } else if input.contains("shipping") {
                vec![0.0, 1.0]
            } else {
                vec![0.7, 0.7]
            };
            Ok(vector)
        }
    }

    /// Records the turns it was called with and echoes a canned answer.
    struct RecordingCompletion {
        seen: Mutex<Vec<ChatTurn>>,
    }

    #[async_trait]
    impl CompletionCapability for RecordingCompletion {
        async fn complete(&self, turns: &[ChatTurn], _temperature: f32) -> LlmResult<String> {
            *self.seen.lock().unwrap() = turns.to_vec();
            Ok("canned answer".to_string())
        }
    }

    fn page(n: u32, text: &str) -> PageText {
        PageText {
            page_number: n,
            text: text.to_string(),
        }
    }

    fn make_index(fail_embed: bool) -> (RagIndex, Arc<RecordingCompletion>) {
        let embedder = Arc::new(KeywordEmbedder {
            calls: AtomicUsize::new(0),
            fail: fail_embed,
        });
        let completion = Arc::new(RecordingCompletion {
            seen: Mutex::new(Vec::new()),
        });
        (RagIndex::new(embedder, completion.clone()), completion)
    }

    #[tokio::test]
    async fn indexes_non_empty_pages_only() {
        let (mut index, _) = make_index(false);
        let pages = vec![page(1, "refund terms"), page(2, "   "), page(3, "shipping")];
        let indexed = index.index_pages(&pages).await.unwrap();
        assert_eq!(indexed, 2);
        assert!(index.has_index());
    }

    #[tokio::test]
    async fn build_failure_leaves_empty_index() {
        let (mut index, _) = make_index(true);
        let pages = vec![page(1, "refund terms")];
        assert!(index.index_pages(&pages).await.is_err());
        assert!(!index.has_index());
    }

    #[tokio::test]
    async fn ask_without_index_reports_not_ready() {
        let (index, _) = make_index(false);
        let answer = index.ask("anything", &[]).await.unwrap();
        assert_eq!(answer, NOT_INDEXED_MESSAGE);
    }

    #[tokio::test]
    async fn ask_sends_instruction_context_history_question() {
        let (mut index, completion) = make_index(false);
        let pages = vec![page(1, "refund terms"), page(2, "shipping rules")];
        index.index_pages(&pages).await.unwrap();

        let history = vec![
            ChatTurn::user("earlier question"),
            ChatTurn::assistant("earlier answer"),
        ];
        let answer = index.ask("what about the refund", &history).await.unwrap();
        assert_eq!(answer, "canned answer");

        let turns = completion.seen.lock().unwrap().clone();
        assert_eq!(turns[0].role, ChatRole::System);
        assert_eq!(turns[0].content, SYSTEM_INSTRUCTION);
        assert_eq!(turns[1].role, ChatRole::System);
        // Best-matching chunk leads the context block.
        assert!(turns[1].content.starts_with("CONTEXT:"));
        assert!(turns[1].content.contains("[Chunk p1]"));
        let refund_pos = turns[1].content.find("refund terms").unwrap();
        let shipping_pos = turns[1].content.find("shipping rules").unwrap();
        assert!(refund_pos < shipping_pos);
        // History sits between the context and the final user question.
        assert_eq!(turns[2].content, "earlier question");
        assert_eq!(turns[3].content, "earlier answer");
        assert_eq!(turns.last().unwrap().role, ChatRole::User);
        assert_eq!(turns.last().unwrap().content, "what about the refund");
    }

    #[tokio::test]
    async fn history_is_windowed_to_eight_turns() {
        let (mut index, completion) = make_index(false);
        index.index_pages(&[page(1, "refund terms")]).await.unwrap();

        let history: Vec<ChatTurn> = (0..12).map(|i| ChatTurn::user(format!("q{i}"))).collect();
        index.ask("question", &history).await.unwrap();

        let turns = completion.seen.lock().unwrap().clone();
        // 2 system turns + 8 history turns + 1 user question.
        assert_eq!(turns.len(), 11);
        assert_eq!(turns[2].content, "q4");
    }
}
