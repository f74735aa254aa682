//! Answer composition: pure renderers from retrieval results to response
//! text. Keeping these free of session state makes every branch directly
//! testable.

use doc_index::extract::{bullet_like_lines, key_sentences, page_snippet};
use doc_index::{PageText, SearchHit};

/// Bullets per page in a page summary.
const PAGE_SUMMARY_BULLETS: usize = 7;
/// Fallback key sentences when a page has no bullet-like lines.
const PAGE_SUMMARY_SENTENCES: usize = 5;
/// Bullets per page in the document overview.
const OVERVIEW_BULLETS: usize = 4;
/// Pages sampled for the document overview.
const OVERVIEW_PAGES: usize = 3;
/// Character budget for a page excerpt.
const EXCERPT_CHARS: usize = 900;
/// Key sentences quoted per evidence page in a general answer.
const GENERAL_SENTENCES: usize = 3;
/// Evidence pages quoted in a general answer.
const GENERAL_PAGES: usize = 2;
/// Evidence page numbers listed at the end of a general answer.
const GENERAL_PAGE_LIST: usize = 5;

pub fn help_text() -> String {
    [
        "Commands you can use:",
        "",
        "• help",
        "• summary",
        "• summary page 7",
        "• page 7",
        "• find: payment terms",
        "• find: refund policy",
        "",
        "Tip:",
        "- If you type with small typos, I try to fix them.",
        "- I also expand synonyms to improve search.",
    ]
    .join("\n")
}

/// Renders ranked `find:` hits plus a suggested follow-up.
///
/// Callers guarantee `hits` is non-empty.
pub fn render_find(corrected: &str, hits: &[SearchHit]) -> String {
    let mut out = format!("Top matches for: {corrected}\n\n");
    for hit in hits {
        out.push_str(&format!("Page {}\n{}\n\n", hit.page_number, hit.snippet));
    }
    out.push_str(&format!("Try: summary page {}", hits[0].page_number));
    out.trim().to_string()
}

pub fn render_no_matches(corrected: &str) -> String {
    format!("No matches found for: {corrected}")
}

pub fn find_usage_hint() -> String {
    "Type like this: find: payment terms".to_string()
}

pub fn render_missing_page(page_number: u32, total: usize) -> String {
    format!("I can't find page {page_number}. This document has {total} pages/chunks.")
}

/// Summarizes one page: bullet-like lines first, key sentences as fallback.
pub fn render_page_summary(page: &PageText) -> String {
    let mut bullets = bullet_like_lines(&page.text, PAGE_SUMMARY_BULLETS);
    if bullets.is_empty() {
        bullets = key_sentences(&page.text, PAGE_SUMMARY_SENTENCES);
    }

    let mut out = format!("Summary of page {}:\n\n", page.page_number);
    for bullet in bullets {
        out.push_str(&format!("• {bullet}\n"));
    }
    out.trim().to_string()
}

/// Renders a bounded excerpt of one page.
pub fn render_page_excerpt(page: &PageText) -> String {
    let snippet = page_snippet(&page.text, EXCERPT_CHARS);
    let snippet = if snippet.is_empty() {
        "(No extractable text found on this page.)".to_string()
    } else {
        snippet
    };
    format!("Page {} (excerpt):\n\n{}", page.page_number, snippet)
}

/// Renders the whole-document overview from the first few pages.
pub fn render_document_summary(pages: &[PageText]) -> String {
    let mut out = String::from("Document overview (quick summary):\n\n");

    let mut found_any = false;
    for page in pages.iter().take(OVERVIEW_PAGES) {
        let bullets = bullet_like_lines(&page.text, OVERVIEW_BULLETS);
        if bullets.is_empty() {
            continue;
        }
        found_any = true;
        out.push_str(&format!("Page {}:\n", page.page_number));
        for bullet in bullets {
            out.push_str(&format!("• {bullet}\n"));
        }
        out.push('\n');
    }

    if !found_any {
        out.push_str(
            "I couldn't detect clean headings/bullets. Ask: \"summary page 1\" or use \"find: <keyword>\".\n",
        );
    }
    out.push_str("Tell me your angle (scope, risks, timeline, cost) and I'll summarize that.");
    out.trim().to_string()
}

pub fn general_no_hits() -> String {
    "I couldn't find anything relevant.\nTry \"find: <keyword>\" or \"summary page X\".".to_string()
}

/// Renders the extractive general answer: key sentences from the first two
/// productive evidence pages, the evidence page list, and follow-up hints.
///
/// The corrected query is surfaced only when it differs from the raw
/// question (case-insensitively). Callers guarantee `hits` is non-empty.
pub fn render_general(
    question: &str,
    corrected: &str,
    hits: &[SearchHit],
    pages: &[PageText],
) -> String {
    let mut evidence: Vec<u32> = Vec::new();
    for hit in hits {
        if !evidence.contains(&hit.page_number) {
            evidence.push(hit.page_number);
        }
    }
    evidence.sort_unstable();

    let mut out = String::new();
    if corrected.to_lowercase() != question.to_lowercase() {
        out.push_str(&format!("I searched for: {corrected}\n\n"));
    }
    out.push_str("Answer (based on closest matches):\n\n");

    let mut used = 0usize;
    for &page_number in &evidence {
        if used >= GENERAL_PAGES {
            break;
        }
        let Some(page) = pages.iter().find(|p| p.page_number == page_number) else {
            continue;
        };
        let sentences = key_sentences(&page.text, GENERAL_SENTENCES);
        if sentences.is_empty() {
            continue;
        }
        for sentence in &sentences {
            out.push_str(&format!("• {sentence}\n"));
        }
        out.push('\n');
        used += 1;
    }

    out.push_str("Evidence pages: ");
    for (i, page_number) in evidence.iter().take(GENERAL_PAGE_LIST).enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&page_number.to_string());
    }

    out.push_str("\n\nTry: find: <keyword>  |  summary  |  summary page 5  |  page 5");
    out.trim().to_string()
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

    fn hit(n: u32, score: u32) -> SearchHit {
        SearchHit {
            page_number: n,
            score,
            snippet: format!("snippet {n}"),
        }
    }

    #[test]
    fn find_lists_hits_and_suggests_best_page() {
        let out = render_find("refund policy", &[hit(4, 2), hit(1, 1)]);
        assert!(out.starts_with("Top matches for: refund policy"));
        assert!(out.contains("Page 4\nsnippet 4"));
        assert!(out.ends_with("Try: summary page 4"));
    }

    #[test]
    fn page_summary_falls_back_to_sentences() {
        let p = page(
            2,
            "This page has no bullets at all. It is plain prose about payment schedules and delivery windows.",
        );
        let out = render_page_summary(&p);
        assert!(out.starts_with("Summary of page 2:"));
        assert!(out.contains("• This page has no bullets at all."));
    }

    #[test]
    fn document_summary_hints_when_nothing_bullet_like() {
        let pages = vec![page(1, "plain. prose. only. here and there.")];
        let out = render_document_summary(&pages);
        assert!(out.contains("I couldn't detect clean headings/bullets."));
        assert!(out.ends_with("Tell me your angle (scope, risks, timeline, cost) and I'll summarize that."));
    }

    #[test]
    fn general_prefixes_corrected_query_only_when_different() {
        let pages = vec![page(
            1,
            "The refund policy allows returns within thirty days of purchase for any reason.",
        )];
        let hits = vec![hit(1, 1)];

        let changed = render_general("refnd policy", "refund policy", &hits, &pages);
        assert!(changed.starts_with("I searched for: refund policy"));

        let same = render_general("Refund Policy", "refund policy", &hits, &pages);
        assert!(same.starts_with("Answer (based on closest matches):"));
    }

    #[test]
    fn general_lists_evidence_pages_ascending() {
        let pages: Vec<PageText> = (1..=9)
            .map(|n| {
                page(
                    n,
                    "A reasonably long sentence about contract terms lives on this page.",
                )
            })
            .collect();
        let hits: Vec<SearchHit> = [9, 3, 7, 1, 5, 2].iter().map(|&n| hit(n, 1)).collect();
        let out = render_general("contract", "contract", &hits, &pages);
        assert!(out.contains("Evidence pages: 1, 2, 3, 5, 7"));
    }

    #[test]
    fn excerpt_handles_empty_pages() {
        let out = render_page_excerpt(&page(3, "   "));
        assert!(out.contains("(No extractable text found on this page.)"));
    }
}
