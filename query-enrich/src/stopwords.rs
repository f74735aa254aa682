//! Fixed stop-word list used to keep synonym expansion away from function
//! words.

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "to", "of", "in", "on", "for", "with", "by", "as", "at",
    "is", "are", "was", "were", "be", "been", "being", "this", "that", "these", "those", "it",
    "its", "from", "into", "about",
];

/// Case-insensitive membership test against the fixed stop-word list.
pub fn is_stop_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    STOP_WORDS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_function_words() {
        assert!(is_stop_word("the"));
        assert!(is_stop_word("The"));
        assert!(is_stop_word("about"));
        assert!(!is_stop_word("refund"));
    }
}
