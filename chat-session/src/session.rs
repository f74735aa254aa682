//! The per-session turn controller and load operations.

use std::sync::Arc;

use doc_index::{PageText, Vocabulary, search};
use doc_sources::SourceReader;
use llm_service::{ChatTurn, CompletionCapability, EmbeddingCapability};
use query_enrich::{
    QueryEnricher, SpellCheckCapability, SpellCorrector, SynonymCapability, SynonymExpander,
};
use rag_index::RagIndex;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::compose;
use crate::errors::SessionError;
use crate::intent::{QueryIntent, classify_intent, is_follow_up};
use crate::transcript::{ChatMessage, Transcript};

/// Result cap for `find:` queries.
const FIND_TOP: usize = 8;
/// Result cap for general-question keyword retrieval.
const GENERAL_TOP: usize = 12;

const GREETING: &str =
    "Load a PDF/Word document or a website and ask me a question. (Type 'help' for commands)";

const NEW_CHAT_MESSAGE: &str = "New chat started. Type 'help' to see commands.";

const TURN_FAILURE_MESSAGE: &str =
    "Something went wrong while processing the document. Try re-loading or ask a shorter question.";

/// Which content source the session is currently pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Word,
    Web,
}

/// External capabilities wired into a session. All optional: a session with
/// none of them still answers from keyword retrieval alone.
#[derive(Default)]
pub struct SessionCapabilities {
    pub embedding: Option<Arc<dyn EmbeddingCapability>>,
    pub completion: Option<Arc<dyn CompletionCapability>>,
    pub synonyms: Option<Arc<dyn SynonymCapability>>,
    pub spell: Option<Arc<dyn SpellCheckCapability>>,
}

/// One chat session over one loaded content source.
///
/// All entry points funnel through a single async mutex: a load can never
/// interleave with an in-flight turn, and a second send waits for the first.
pub struct ChatSession {
    state: Mutex<SessionState>,
}

struct SessionState {
    active_source: SourceKind,
    selected_pdf: Option<String>,
    selected_word: Option<String>,
    website_url: String,

    pages: Vec<PageText>,
    vocab: Vocabulary,
    rag: Option<RagIndex>,

    enricher: QueryEnricher,
    history: Vec<ChatTurn>,
    last_question: String,
    transcript: Transcript,
}

impl ChatSession {
    pub fn new(caps: SessionCapabilities) -> Self {
        let rag = match (caps.embedding, caps.completion) {
            (Some(embedding), Some(completion)) => Some(RagIndex::new(embedding, completion)),
            _ => None,
        };
        let enricher = QueryEnricher::new(
            SynonymExpander::new(caps.synonyms),
            SpellCorrector::new(caps.spell),
        );

        let mut transcript = Transcript::default();
        transcript.push_assistant(GREETING);

        Self {
            state: Mutex::new(SessionState {
                active_source: SourceKind::Pdf,
                selected_pdf: None,
                selected_word: None,
                website_url: String::new(),
                pages: Vec::new(),
                vocab: Vocabulary::default(),
                rag,
                enricher,
                history: Vec::new(),
                last_question: String::new(),
                transcript,
            }),
        }
    }

    /// Handles one user turn and returns the rendered answer.
    ///
    /// Blank input is ignored. Any failure inside the turn is replaced with
    /// the fixed recoverable-failure message; the typing placeholder is
    /// removed on both paths.
    pub async fn send(&self, input: &str) -> Option<String> {
        let text = input.trim().to_string();
        if text.is_empty() {
            return None;
        }

        let mut state = self.state.lock().await;
        state.transcript.push_user(&text);
        state.transcript.push_typing();

        let answer = match state.run_turn(&text).await {
            Ok(answer) => answer,
            Err(err) => {
                warn!(
                    target: "chat_session::turn",
                    error = %err,
                    "turn failed; answering with the recovery message"
                );
                TURN_FAILURE_MESSAGE.to_string()
            }
        };

        state.transcript.remove_typing();
        state.transcript.push_assistant(&answer);
        Some(answer)
    }

    /// Loads (or reloads) content for `kind` from `target` via `reader`.
    ///
    /// The chunk set, vocabulary, and embedding index are replaced as one
    /// unit; on failure all three are cleared and a source-specific message
    /// is returned.
    pub async fn load_source(
        &self,
        kind: SourceKind,
        target: &str,
        reader: &dyn SourceReader,
    ) -> String {
        let mut state = self.state.lock().await;
        state.active_source = kind;

        let target = target.trim();
        match kind {
            SourceKind::Pdf => state.selected_pdf = Some(target.to_string()),
            SourceKind::Word => state.selected_word = Some(target.to_string()),
            SourceKind::Web => {
                if target.is_empty() {
                    let message = "Paste a URL first.".to_string();
                    state.transcript.push_assistant(&message);
                    return message;
                }
                state.website_url = target.to_string();
            }
        }

        let message = match reader.read(target).await {
            Ok(pages) => {
                state.install_pages(pages).await;
                info!(
                    target: "chat_session::load",
                    ?kind,
                    chunks = state.pages.len(),
                    "content loaded"
                );
                load_success_message(kind, state.pages.len())
            }
            Err(err) => {
                warn!(
                    target: "chat_session::load",
                    ?kind,
                    error = %err,
                    "load failed; clearing content state"
                );
                state.clear_content();
                load_failure_message(kind).to_string()
            }
        };

        state.transcript.push_assistant(&message);
        message
    }

    /// Clears the transcript and follow-up memory; loaded content survives.
    pub async fn new_chat(&self) -> String {
        let mut state = self.state.lock().await;
        state.transcript.clear();
        state.history.clear();
        state.last_question.clear();
        state.transcript.push_assistant(NEW_CHAT_MESSAGE);
        NEW_CHAT_MESSAGE.to_string()
    }

    /// Snapshot of the rendered transcript.
    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.state.lock().await.transcript.messages().to_vec()
    }
}

impl SessionState {
    async fn run_turn(&mut self, text: &str) -> Result<String, SessionError> {
        // Follow-up phrases continue the previous question.
        let normalized = text.to_lowercase();
        let effective = if is_follow_up(&normalized) && !self.last_question.is_empty() {
            format!("{} (follow-up: {})", self.last_question, text)
        } else {
            self.last_question = text.to_string();
            text.to_string()
        };

        let intent = classify_intent(&effective);
        info!(target: "chat_session::turn", ?intent, "intent classified");

        // Help works without any loaded source.
        if intent == QueryIntent::Help {
            return Ok(compose::help_text());
        }

        if let Some(message) = self.not_ready_message() {
            return Ok(message);
        }

        let answer = match intent {
            QueryIntent::Help => compose::help_text(),
            QueryIntent::Find(keyword) => self.answer_find(&keyword).await,
            QueryIntent::SummarizePage(n) => match self.page(n) {
                Some(page) => compose::render_page_summary(page),
                None => compose::render_missing_page(n, self.pages.len()),
            },
            QueryIntent::ExtractPage(n) => match self.page(n) {
                Some(page) => compose::render_page_excerpt(page),
                None => compose::render_missing_page(n, self.pages.len()),
            },
            QueryIntent::SummarizeDocument => compose::render_document_summary(&self.pages),
            QueryIntent::General => self.answer_general(&effective).await?,
        };

        self.history.push(ChatTurn::user(text));
        self.history.push(ChatTurn::assistant(&answer));
        Ok(answer)
    }

    async fn answer_find(&self, keyword: &str) -> String {
        let keyword = keyword.trim();
        if keyword.chars().count() < 2 {
            return compose::find_usage_hint();
        }

        let enriched = self.enricher.enrich(&self.vocab, keyword).await;

        // The expanded probe goes first; if the expansion made things worse,
        // fall back to the corrected query alone.
        let mut hits = search(&self.pages, &enriched.expanded, FIND_TOP);
        if hits.is_empty() {
            hits = search(&self.pages, &enriched.corrected, FIND_TOP);
        }

        if hits.is_empty() {
            compose::render_no_matches(&enriched.corrected)
        } else {
            compose::render_find(&enriched.corrected, &hits)
        }
    }

    async fn answer_general(&self, question: &str) -> Result<String, SessionError> {
        // Prefer semantic retrieval whenever an embedding index is ready;
        // otherwise answer extractively from keyword hits.
        if let Some(rag) = &self.rag {
            if rag.has_index() {
                return Ok(rag.ask(question, &self.history).await?);
            }
        }

        let enriched = self.enricher.enrich(&self.vocab, question).await;

        let mut hits = search(&self.pages, &enriched.expanded, GENERAL_TOP);
        if hits.is_empty() {
            hits = search(&self.pages, &enriched.corrected, GENERAL_TOP);
        }

        if hits.is_empty() {
            return Ok(compose::general_no_hits());
        }

        Ok(compose::render_general(
            question,
            &enriched.corrected,
            &hits,
            &self.pages,
        ))
    }

    /// Replaces chunk set, vocabulary, and embedding index as one unit.
    ///
    /// The embedding build is best-effort: a mid-build failure leaves a
    /// partial index behind and keyword retrieval keeps working.
    async fn install_pages(&mut self, pages: Vec<PageText>) {
        self.pages = pages;
        self.vocab = Vocabulary::build(&self.pages);
        if let Some(rag) = self.rag.as_mut() {
            if let Err(err) = rag.index_pages(&self.pages).await {
                warn!(
                    target: "chat_session::load",
                    error = %err,
                    indexed = rag.len(),
                    "embedding index build failed; keyword retrieval stays available"
                );
            }
        }
    }

    fn clear_content(&mut self) {
        self.pages.clear();
        self.vocab = Vocabulary::default();
        if let Some(rag) = self.rag.as_mut() {
            rag.clear();
        }
    }

    fn page(&self, page_number: u32) -> Option<&PageText> {
        self.pages.iter().find(|p| p.page_number == page_number)
    }

    /// Source-specific guidance when nothing is loaded yet.
    fn not_ready_message(&self) -> Option<String> {
        if !self.pages.is_empty() {
            return None;
        }

        let message = match self.active_source {
            SourceKind::Pdf => match self.selected_pdf {
                None => "Pick a PDF file first and try again.",
                Some(_) => {
                    "A PDF is selected but no text is loaded. Try another PDF (or OCR if it is scanned)."
                }
            },
            SourceKind::Word => match self.selected_word {
                None => "Pick a Word (.docx) file first and try again.",
                Some(_) => "A Word file is selected but no text is loaded.",
            },
            SourceKind::Web => {
                if self.website_url.trim().is_empty() {
                    "Paste a website URL first, then load it."
                } else {
                    "The website URL is set but its content is not loaded. Load the website again."
                }
            }
        };
        Some(message.to_string())
    }
}

fn load_success_message(kind: SourceKind, count: usize) -> String {
    match kind {
        SourceKind::Pdf => format!("PDF loaded. Pages: {count}"),
        SourceKind::Word => format!("Word document loaded. Sections: {count}"),
        SourceKind::Web => format!("Website loaded. Chunks: {count}"),
    }
}

fn load_failure_message(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Pdf => {
            "PDF selected, but I couldn't extract any text. If it is scanned, you'll need OCR."
        }
        SourceKind::Word => {
            "Word file selected, but I couldn't read it. Make sure it is .docx (not .doc)."
        }
        SourceKind::Web => "Couldn't load the website. Try another URL or check internet access.",
    }
}
