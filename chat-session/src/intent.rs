//! Intent classification: substring heuristics behind a pure function.

/// What the user wants from this turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryIntent {
    Help,
    SummarizeDocument,
    SummarizePage(u32),
    ExtractPage(u32),
    Find(String),
    General,
}

/// Classifies `text` into exactly one intent.
///
/// Rule order matters: help aliases, then the `find:` prefix, then
/// summary keywords (page-scoped when a page number is present), then
/// page-extraction phrasings, else general retrieval.
pub fn classify_intent(text: &str) -> QueryIntent {
    let lower = text.trim().to_lowercase();

    if matches!(lower.as_str(), "help" | "/help" | "?" | "commands") {
        return QueryIntent::Help;
    }

    if lower.starts_with("find:") {
        // The prefix is ASCII, so the byte offset is safe on the original.
        let keyword = text.trim()[5..].trim().to_string();
        return QueryIntent::Find(keyword);
    }

    let page = page_number_in(&lower);

    if ["summary", "summarize", "gist", "overview"]
        .iter()
        .any(|kw| lower.contains(kw))
    {
        return match page {
            Some(n) => QueryIntent::SummarizePage(n),
            None => QueryIntent::SummarizeDocument,
        };
    }

    if let Some(n) = page {
        let wants_page = lower.starts_with("page ")
            || lower.contains("show page")
            || lower.contains("open page")
            || lower.contains("what is on page");
        if wants_page {
            return QueryIntent::ExtractPage(n);
        }
    }

    QueryIntent::General
}

/// Extracts the digit run following the first `"page "` occurrence, if any.
fn page_number_in(lower: &str) -> Option<u32> {
    let start = lower.find("page ")? + 5;
    let digits: String = lower[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Phrases that continue the previous question instead of starting a new one.
pub fn is_follow_up(lower: &str) -> bool {
    lower == "explain more"
        || lower == "tell me more"
        || lower == "more"
        || lower.contains("explain that")
        || lower.contains("what about that")
        || lower.contains("what do you mean")
        || lower.contains("elaborate")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_aliases() {
        for input in ["help", "/help", "?", "commands", "  HELP  "] {
            assert_eq!(classify_intent(input), QueryIntent::Help, "input: {input}");
        }
    }

    #[test]
    fn find_prefix_keeps_original_casing() {
        assert_eq!(
            classify_intent("find: refund policy"),
            QueryIntent::Find("refund policy".to_string())
        );
        assert_eq!(
            classify_intent("FIND: Refund Policy"),
            QueryIntent::Find("Refund Policy".to_string())
        );
        assert_eq!(classify_intent("find:"), QueryIntent::Find(String::new()));
    }

    #[test]
    fn summary_routes_by_page_presence() {
        assert_eq!(
            classify_intent("summary page 3"),
            QueryIntent::SummarizePage(3)
        );
        assert_eq!(classify_intent("summary"), QueryIntent::SummarizeDocument);
        assert_eq!(
            classify_intent("give me an overview"),
            QueryIntent::SummarizeDocument
        );
        assert_eq!(
            classify_intent("what is the gist of page 2"),
            QueryIntent::SummarizePage(2)
        );
    }

    #[test]
    fn page_extraction_phrasings() {
        assert_eq!(classify_intent("page 5"), QueryIntent::ExtractPage(5));
        assert_eq!(classify_intent("show page 12"), QueryIntent::ExtractPage(12));
        assert_eq!(
            classify_intent("what is on page 7"),
            QueryIntent::ExtractPage(7)
        );
        // A page mention alone is not an extraction request.
        assert_eq!(
            classify_intent("does page 7 mention refunds"),
            QueryIntent::General
        );
    }

    #[test]
    fn everything_else_is_general() {
        assert_eq!(
            classify_intent("what is the termination clause"),
            QueryIntent::General
        );
    }

    #[test]
    fn page_number_parsing_stops_at_non_digits() {
        assert_eq!(page_number_in("page 42b"), Some(42));
        assert_eq!(page_number_in("page  7"), None);
        assert_eq!(page_number_in("no pages here"), None);
    }

    #[test]
    fn follow_up_phrases() {
        assert!(is_follow_up("more"));
        assert!(is_follow_up("tell me more"));
        assert!(is_follow_up("could you elaborate on this"));
        assert!(!is_follow_up("more details about page 3?"));
    }
}
