//! Tokenizer and per-load vocabulary.
//!
//! The vocabulary keeps document order so downstream fuzzy tie-breaks are
//! deterministic for a fixed chunk set.

use std::collections::HashSet;

use tracing::debug;

use crate::models::PageText;

/// Splits `text` into lowercase alphanumeric tokens.
///
/// Runs of letters/digits are accumulated and lowercased; any other character
/// ends the current token. Tokens of length 1 are dropped, and duplicates are
/// removed preserving first-occurrence order.
pub fn tokenize(text: &str) -> Vec<String> {
    fn flush(current: &mut String, terms: &mut Vec<String>, seen: &mut HashSet<String>) {
        if current.chars().count() > 1 && !seen.contains(current.as_str()) {
            seen.insert(current.clone());
            terms.push(std::mem::take(current));
        } else {
            current.clear();
        }
    }

    let mut terms: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut current = String::new();

    for c in text.chars() {
        if c.is_alphanumeric() {
            current.extend(c.to_lowercase());
        } else {
            flush(&mut current, &mut terms, &mut seen);
        }
    }
    flush(&mut current, &mut terms, &mut seen);

    terms
}

/// Token set derived from the currently loaded chunks.
///
/// Rebuilt wholesale on every load and cleared on load failure; it never
/// outlives the chunk set it was built from.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    seen: HashSet<String>,
}

impl Vocabulary {
    /// Builds the vocabulary from every chunk's text.
    pub fn build(pages: &[PageText]) -> Self {
        let mut vocab = Self::default();
        for page in pages {
            for term in tokenize(&page.text) {
                vocab.insert(term);
            }
        }
        debug!(
            target: "doc_index::vocab",
            terms = vocab.terms.len(),
            pages = pages.len(),
            "vocabulary rebuilt"
        );
        vocab
    }

    fn insert(&mut self, term: String) {
        if self.seen.insert(term.clone()) {
            self.terms.push(term);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, term: &str) -> bool {
        self.seen.contains(&term.to_lowercase())
    }

    /// Iterates terms in document order (stable for a fixed chunk set).
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }
}
