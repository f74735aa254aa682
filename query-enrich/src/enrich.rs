//! The enrichment pipeline: spell pre-pass, per-term vocabulary correction,
//! and bounded synonym expansion.

use doc_index::{Vocabulary, tokenize};
use tracing::debug;

use crate::fuzzy::correct_with_vocab;
use crate::spell::SpellCorrector;
use crate::stopwords::is_stop_word;
use crate::synonyms::SynonymExpander;

/// Synonyms requested per content term.
const SYNONYMS_PER_TERM: usize = 3;

/// Result of enriching one query.
///
/// `corrected` is what the user is shown ("I searched for: ..."); `expanded`
/// is a retrieval probe only and is never displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedQuery {
    pub corrected: String,
    pub expanded: String,
}

/// Session-scoped enricher owning the synonym and spell caches.
pub struct QueryEnricher {
    expander: SynonymExpander,
    spell: SpellCorrector,
}

impl QueryEnricher {
    pub fn new(expander: SynonymExpander, spell: SpellCorrector) -> Self {
        Self { expander, spell }
    }

    /// Produces both query forms. Always succeeds: degraded spell/synonym
    /// services fall back to the identity correction / no expansion.
    ///
    /// Synonym lookups run sequentially per term: the expanded string is an
    /// insertion-ordered, duplicate-free union, and that order feeds into
    /// downstream tie-breaking.
    pub async fn enrich(&self, vocab: &Vocabulary, query: &str) -> EnrichedQuery {
        let query = query.trim();
        if query.is_empty() {
            return EnrichedQuery {
                corrected: String::new(),
                expanded: String::new(),
            };
        }

        let pre_corrected = self.spell.correct(query).await;
        let terms = tokenize(&pre_corrected);

        let corrected_terms: Vec<String> = terms
            .iter()
            .map(|term| correct_with_vocab(vocab, term))
            .collect();
        let corrected = corrected_terms.join(" ");

        let mut expanded: Vec<String> = Vec::new();
        for term in &corrected_terms {
            push_unique(&mut expanded, term.clone());
            if passthrough(term) {
                continue;
            }
            for synonym in self.expander.expand(term, SYNONYMS_PER_TERM).await {
                push_unique(&mut expanded, synonym);
            }
        }

        let expanded = expanded.join(" ");
        debug!(
            target: "query_enrich::enrich",
            corrected = %corrected,
            expanded = %expanded,
            "query enriched"
        );

        EnrichedQuery {
            corrected,
            expanded,
        }
    }
}

/// Terms that are included verbatim and never expanded.
fn passthrough(term: &str) -> bool {
    term.chars().count() <= 2
        || term.chars().next().is_some_and(char::is_numeric)
        || is_stop_word(term)
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.iter().any(|existing| *existing == value) {
        list.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EnrichError;
    use crate::synonyms::SynonymCapability;
    use async_trait::async_trait;
    use doc_index::PageText;
    use std::sync::Arc;

    struct FixedSynonyms;

    #[async_trait]
    impl SynonymCapability for FixedSynonyms {
        async fn synonyms(&self, word: &str, _max: usize) -> Result<Vec<String>, EnrichError> {
            match word {
                "refund" => Ok(vec!["repayment".into(), "rebate".into()]),
                _ => Ok(Vec::new()),
            }
        }
    }

    fn enricher(with_synonyms: bool) -> QueryEnricher {
        let capability: Option<Arc<dyn SynonymCapability>> = if with_synonyms {
            Some(Arc::new(FixedSynonyms))
        } else {
            None
        };
        QueryEnricher::new(SynonymExpander::new(capability), SpellCorrector::new(None))
    }

    fn vocab() -> Vocabulary {
        Vocabulary::build(&[PageText {
            page_number: 1,
            text: "The refund policy allows returns within 30 days.".to_string(),
        }])
    }

    #[tokio::test]
    async fn corrects_typos_against_the_vocabulary() {
        let enriched = enricher(false).enrich(&vocab(), "refnd policy").await;
        assert_eq!(enriched.corrected, "refund policy");
        assert_eq!(enriched.expanded, "refund policy");
    }

    #[tokio::test]
    async fn expands_content_terms_only() {
        let enriched = enricher(true).enrich(&vocab(), "the refund").await;
        assert_eq!(enriched.corrected, "the refund");
        // "the" is a stop word; only "refund" gains synonyms.
        assert_eq!(enriched.expanded, "the refund repayment rebate");
    }

    #[tokio::test]
    async fn empty_query_is_empty() {
        let enriched = enricher(true).enrich(&vocab(), "   ").await;
        assert_eq!(enriched.corrected, "");
        assert_eq!(enriched.expanded, "");
    }

    #[tokio::test]
    async fn digit_leading_terms_pass_through() {
        let enriched = enricher(true).enrich(&vocab(), "30 days refund").await;
        assert_eq!(enriched.corrected, "30 days refund");
        assert!(enriched.expanded.starts_with("30 days"));
        assert!(enriched.expanded.contains("repayment"));
    }
}
