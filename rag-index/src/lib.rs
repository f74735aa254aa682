//! Semantic retrieval: per-chunk embedding vectors, cosine ranking, and
//! context-conditioned answer synthesis.
//!
//! Public API:
//! - `RagIndex::index_pages`: rebuild the embedding index for a new load.
//! - `RagIndex::ask`: embed the question, rank chunks, call the completion
//!   capability with the assembled context and rolling history.

mod errors;
mod index;
mod vector_math;

pub use errors::RagIndexError;
pub use index::{DEFAULT_TOP_K, EmbeddingChunk, RagIndex};
pub use vector_math::cosine;
