//! Keyword search over loaded chunks: term-overlap scoring plus snippets.

use tracing::debug;

use crate::models::{PageText, SearchHit};

/// Characters of context kept before the first matched term in a snippet.
const SNIPPET_LEAD: usize = 80;
/// Total snippet budget in characters.
const SNIPPET_LEN: usize = 240;

/// Ranks `pages` against `query` and returns at most `top` hits.
///
/// The query is split on whitespace into lowercased terms of length > 1; a
/// chunk's score is the number of distinct terms occurring in it
/// (case-insensitive substring match). Chunks without any match are dropped.
/// Ordering is (score desc, page_number asc), which keeps ties deterministic.
pub fn search(pages: &[PageText], query: &str, top: usize) -> Vec<SearchHit> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let terms: Vec<Vec<char>> = query
        .split_whitespace()
        .map(fold_lower)
        .filter(|t| t.len() > 1)
        .collect();
    if terms.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<SearchHit> = Vec::new();
    for page in pages {
        let chars: Vec<char> = page.text.chars().collect();
        if chars.is_empty() {
            continue;
        }
        let lower: Vec<char> = chars
            .iter()
            .map(|&c| c.to_lowercase().next().unwrap_or(c))
            .collect();

        let score = terms
            .iter()
            .filter(|term| find_sub(&lower, term.as_slice()).is_some())
            .count() as u32;
        if score == 0 {
            continue;
        }

        hits.push(SearchHit {
            page_number: page.page_number,
            score,
            snippet: make_snippet(&chars, &lower, &terms),
        });
    }

    hits.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.page_number.cmp(&b.page_number))
    });
    hits.truncate(top);

    debug!(
        target: "doc_index::search",
        hits = hits.len(),
        terms = terms.len(),
        "keyword search finished"
    );

    hits
}

/// Lowercases a term one character at a time so needle and haystack share the
/// same (length-preserving) mapping.
fn fold_lower(term: &str) -> Vec<char> {
    term.trim()
        .chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

/// First occurrence of `needle` in `hay`, by character offset.
fn find_sub(hay: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > hay.len() {
        return None;
    }
    hay.windows(needle.len()).position(|w| w == needle)
}

/// Builds the display snippet around the first matched term.
///
/// The window starts [`SNIPPET_LEAD`] characters before the first occurrence
/// of the first term that matches at all (offset 0 when none does), spans up
/// to [`SNIPPET_LEN`] characters, and flattens embedded line breaks. An
/// ellipsis marks snippets that stop short of the chunk end.
fn make_snippet(chars: &[char], lower: &[char], terms: &[Vec<char>]) -> String {
    let mut index = 0usize;
    for term in terms {
        if let Some(found) = find_sub(lower, term) {
            index = found;
            break;
        }
    }

    let start = index.saturating_sub(SNIPPET_LEAD);
    let len = (chars.len() - start).min(SNIPPET_LEN);
    let mut snippet: String = chars[start..start + len]
        .iter()
        .map(|&c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if start + len < chars.len() {
        snippet.push_str(" ...");
    }
    snippet
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: u32, text: &str) -> PageText {
        PageText {
            page_number: n,
            text: text.to_string(),
        }
    }

    #[test]
    fn empty_query_returns_nothing() {
        let pages = vec![page(1, "alpha beta")];
        assert!(search(&pages, "", 5).is_empty());
        assert!(search(&pages, "   ", 5).is_empty());
    }

    #[test]
    fn score_ties_break_by_ascending_page_number() {
        let pages = vec![page(1, "alpha beta"), page(2, "beta gamma")];
        let hits = search(&pages, "beta", 5);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].page_number, 1);
        assert_eq!(hits[0].score, 1);
        assert_eq!(hits[1].page_number, 2);
        assert_eq!(hits[1].score, 1);
    }

    #[test]
    fn counts_distinct_terms_not_occurrences() {
        let pages = vec![page(1, "beta beta beta"), page(2, "alpha beta gamma")];
        let hits = search(&pages, "alpha beta", 5);
        assert_eq!(hits[0].page_number, 2);
        assert_eq!(hits[0].score, 2);
        assert_eq!(hits[1].page_number, 1);
        assert_eq!(hits[1].score, 1);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let pages = vec![page(1, "The Refund Policy allows returns.")];
        let hits = search(&pages, "refund", 5);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].snippet.contains("Refund Policy"));
    }

    #[test]
    fn snippet_flattens_newlines_and_marks_truncation() {
        let text = format!("{}refund\nline two{}", "x".repeat(200), "y".repeat(300));
        let pages = vec![page(1, &text)];
        let hits = search(&pages, "refund", 5);
        let snippet = &hits[0].snippet;
        assert!(!snippet.contains('\n'));
        assert!(snippet.ends_with(" ..."));
        assert!(snippet.contains("refund line two"));
    }

    #[test]
    fn single_char_terms_are_ignored() {
        let pages = vec![page(1, "a b c")];
        assert!(search(&pages, "a b c", 5).is_empty());
    }

    #[test]
    fn truncates_to_requested_top() {
        let pages: Vec<PageText> = (1..=10).map(|n| page(n, "common text")).collect();
        let hits = search(&pages, "common", 3);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].page_number, 1);
    }
}
