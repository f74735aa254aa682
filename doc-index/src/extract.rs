//! Extractive helpers used by the answer composer: bullet-like lines, key
//! sentences, and bounded page snippets.

/// Minimum line length considered meaningful for bullet extraction.
const MIN_BULLET_LEN: usize = 6;
/// Sentences shorter than this are treated as noise.
const MIN_SENTENCE_LEN: usize = 25;
/// Long sentences are clipped at this many characters.
const MAX_SENTENCE_LEN: usize = 220;

/// Collects up to `max` lines that read like bullets or headings.
///
/// A line qualifies when it starts with a bullet marker (`•`, `-`, `*`) or
/// looks like a heading: 10..=70 characters without a period.
pub fn bullet_like_lines(text: &str, max: usize) -> Vec<String> {
    let mut result = Vec::new();
    if max == 0 {
        return result;
    }

    for raw in text.split(['\r', '\n']) {
        let line = raw.trim();
        if line.chars().count() < MIN_BULLET_LEN {
            continue;
        }
        if line.starts_with('•')
            || line.starts_with('-')
            || line.starts_with('*')
            || looks_like_heading(line)
        {
            result.push(clean_line(line));
            if result.len() >= max {
                break;
            }
        }
    }
    result
}

fn looks_like_heading(line: &str) -> bool {
    let len = line.chars().count();
    if len > 70 {
        return false;
    }
    len >= 10 && !line.contains('.')
}

fn clean_line(line: &str) -> String {
    line.replace('\t', " ").replace("  ", " ").trim().to_string()
}

/// Collects up to `max` sentences of reasonable length, clipped at
/// [`MAX_SENTENCE_LEN`] characters and re-terminated with a period.
pub fn key_sentences(text: &str, max: usize) -> Vec<String> {
    let mut result = Vec::new();
    if max == 0 {
        return result;
    }

    let flat = text.replace(['\r', '\n'], " ");
    for part in flat.split(['.', '?', '!']) {
        let sentence = part.trim();
        if sentence.chars().count() < MIN_SENTENCE_LEN {
            continue;
        }
        let clipped: String = sentence.chars().take(MAX_SENTENCE_LEN).collect();
        result.push(format!("{}.", clipped.trim()));
        if result.len() >= max {
            break;
        }
    }
    result
}

/// Flattens line breaks and truncates to `max_chars` characters, appending an
/// ellipsis when text was dropped. Empty input yields an empty string.
pub fn page_snippet(text: &str, max_chars: usize) -> String {
    let flat = text.replace(['\r', '\n'], " ");
    let flat = flat.trim();
    if flat.is_empty() {
        return String::new();
    }
    if flat.chars().count() <= max_chars {
        return flat.to_string();
    }
    let clipped: String = flat.chars().take(max_chars).collect();
    format!("{} ...", clipped.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullets_pick_marked_lines_and_headings() {
        let text = "Payment Terms Overview\n- net 30 days\nshort\n* supplier invoices only\nThis sentence is long enough. It has periods.";
        let bullets = bullet_like_lines(text, 10);
        assert_eq!(
            bullets,
            vec![
                "Payment Terms Overview",
                "- net 30 days",
                "* supplier invoices only",
            ]
        );
    }

    #[test]
    fn bullets_respect_the_cap() {
        let text = "- one item here\n- two item here\n- three item here";
        assert_eq!(bullet_like_lines(text, 2).len(), 2);
    }

    #[test]
    fn key_sentences_skip_short_and_clip_long() {
        let long_tail = "y".repeat(400);
        let text = format!(
            "Too short. The refund policy allows returns within thirty days of purchase. {long_tail}."
        );
        let sentences = key_sentences(&text, 5);
        assert_eq!(sentences.len(), 2);
        assert!(sentences[0].starts_with("The refund policy"));
        assert!(sentences[0].ends_with('.'));
        assert_eq!(sentences[1].chars().count(), MAX_SENTENCE_LEN + 1);
    }

    #[test]
    fn page_snippet_truncates_with_ellipsis() {
        let text = "word ".repeat(300);
        let snippet = page_snippet(&text, 900);
        assert!(snippet.ends_with(" ..."));
        assert!(snippet.chars().count() <= 904);
        assert_eq!(page_snippet("", 900), "");
        assert_eq!(page_snippet("short text", 900), "short text");
    }
}
