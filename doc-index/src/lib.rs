//! Document text layer: chunking, tokenization, and lexical retrieval.
//!
//! Public API:
//! - `chunk_pages`: split extracted text into bounded, numbered chunks.
//! - `Vocabulary`: deterministic token set over the loaded chunks.
//! - `search`: term-overlap ranking with snippet generation.
//! - `extract`: bullet-line / key-sentence / page-snippet helpers.

mod chunker;
pub mod extract;
mod models;
mod search;
mod tokenize;

pub use chunker::{DEFAULT_MAX_CHARS, chunk_pages};
pub use models::{PageText, SearchHit};
pub use search::search;
pub use tokenize::{Vocabulary, tokenize};
