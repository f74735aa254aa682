//! Boundary-aware text chunking shared by every content source.
//!
//! The same split policy is applied to PDF, DOCX, and web text so retrieval
//! behaves identically regardless of origin. Budgets are measured in
//! characters, not bytes, so multi-byte input cannot split a code point.

use tracing::debug;

use crate::models::PageText;

/// Default chunk budget in characters.
pub const DEFAULT_MAX_CHARS: usize = 2_500;

/// A newline inside the window is only honored as a cut point past this many
/// characters, so short trailing paragraphs do not produce tiny chunks.
const MIN_CUT_OFFSET: usize = 400;

/// Splits `text` into ordered chunks numbered from 1.
///
/// Each step takes up to `max_chars` characters from the current offset. If
/// the window contains a newline at an offset greater than
/// [`MIN_CUT_OFFSET`], the chunk is cut there instead and trimmed, which
/// avoids splitting mid-paragraph. The offset always advances by at least one
/// character, so the loop terminates even for degenerate input.
pub fn chunk_pages(text: &str, max_chars: usize) -> Vec<PageText> {
    let normalized = text.replace('\r', "");
    let clean: Vec<char> = normalized.trim().chars().collect();
    if clean.is_empty() {
        return Vec::new();
    }

    let mut pages = Vec::new();
    let mut page_number = 1u32;
    let mut offset = 0usize;

    while offset < clean.len() {
        let take = max_chars.min(clean.len() - offset);
        let window = &clean[offset..offset + take];

        let cut = window.iter().rposition(|&c| c == '\n');
        let (consumed, chunk) = match cut {
            Some(pos) if pos > MIN_CUT_OFFSET => {
                let body: String = window[..pos].iter().collect();
                (pos, body.trim().to_string())
            }
            _ => (take, window.iter().collect::<String>()),
        };

        // Whitespace-only windows can collapse to nothing after the boundary
        // trim; they consume input but never emit a chunk.
        if !chunk.is_empty() {
            pages.push(PageText {
                page_number,
                text: chunk,
            });
            page_number += 1;
        }

        offset += consumed.max(1);
    }

    debug!(
        target: "doc_index::chunker",
        chunks = pages.len(),
        max_chars,
        "chunking finished"
    );

    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(chunk_pages("", DEFAULT_MAX_CHARS).is_empty());
        assert!(chunk_pages("   \n\n  ", DEFAULT_MAX_CHARS).is_empty());
    }

    #[test]
    fn short_input_is_a_single_chunk() {
        let pages = chunk_pages("hello world", DEFAULT_MAX_CHARS);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[0].text, "hello world");
    }

    #[test]
    fn page_numbers_are_sequential_from_one() {
        let line = "x".repeat(120);
        let text = std::iter::repeat(line)
            .take(50)
            .collect::<Vec<_>>()
            .join("\n");
        let pages = chunk_pages(&text, 1_000);
        assert!(pages.len() > 1);
        for (i, p) in pages.iter().enumerate() {
            assert_eq!(p.page_number, (i + 1) as u32);
        }
    }

    #[test]
    fn cuts_on_newline_past_min_offset() {
        // One newline at char 500, inside a 1000-char window.
        let text = format!("{}\n{}", "a".repeat(500), "b".repeat(700));
        let pages = chunk_pages(&text, 1_000);
        assert_eq!(pages[0].text, "a".repeat(500));
        // The cut leaves the newline itself for the next window.
        assert!(pages[1].text.trim_start().starts_with('b'));
    }

    #[test]
    fn ignores_newline_before_min_offset() {
        let text = format!("{}\n{}", "a".repeat(100), "b".repeat(100));
        let pages = chunk_pages(&text, 1_000);
        // Window fits entirely; the early newline is not a cut point.
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn concatenation_reconstructs_text_modulo_boundary_trims() {
        let text = format!("{}\n{}\n{}", "a".repeat(600), "b".repeat(600), "c".repeat(600));
        let pages = chunk_pages(&text, 700);
        let rebuilt: String = pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("");
        let original_stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let rebuilt_stripped: String = rebuilt.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(original_stripped, rebuilt_stripped);
    }

    #[test]
    fn terminates_on_degenerate_input() {
        let pages = chunk_pages("\n", DEFAULT_MAX_CHARS);
        assert!(pages.is_empty());
        let pages = chunk_pages("x", 0);
        // Zero budget still advances one character at a time.
        assert!(pages.len() <= 1);
    }

    #[test]
    fn multibyte_text_is_not_split_inside_a_code_point() {
        let text = "é".repeat(3_000);
        let pages = chunk_pages(&text, DEFAULT_MAX_CHARS);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].text.chars().count(), DEFAULT_MAX_CHARS);
    }
}
