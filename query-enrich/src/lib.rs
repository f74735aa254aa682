//! Query enrichment: vocabulary-driven typo repair, stop-word handling, and
//! best-effort synonym/spell expansion backed by external capabilities.
//!
//! Every external dependency in this crate degrades silently: a missing or
//! failing capability yields the identity correction / an empty synonym list,
//! never a user-visible error.

mod enrich;
mod errors;
mod fuzzy;
mod spell;
mod stopwords;
mod synonyms;

pub use enrich::{EnrichedQuery, QueryEnricher};
pub use errors::EnrichError;
pub use fuzzy::correct_with_vocab;
pub use spell::{LanguageToolClient, SpellCheckCapability, SpellCorrector};
pub use stopwords::is_stop_word;
pub use synonyms::{DatamuseClient, SynonymCapability, SynonymExpander};
