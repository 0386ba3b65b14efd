// Shared naive text processing used by the quiz generator and summarizer

/// Split text into sentences on `.`, `!` and `?`, trimming whitespace and
/// dropping empty fragments. No abbreviation handling; the inputs here are
/// short search snippets and user-pasted prose.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split_inclusive(['.', '!', '?'])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && s.chars().any(|c| c.is_alphanumeric()))
        .map(|s| s.to_string())
        .collect()
}

/// Lowercased word tokens of length > 3 (crude stopword cut-off)
pub fn tokenize_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 3)
        .map(|w| w.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences_basic() {
        let sentences = split_sentences("First one. Second one! Third one? Tail");
        assert_eq!(
            sentences,
            vec!["First one.", "Second one!", "Third one?", "Tail"]
        );
    }

    #[test]
    fn test_split_sentences_drops_noise() {
        let sentences = split_sentences("One.. . ?? Two.");
        assert_eq!(sentences, vec!["One.", "Two."]);
    }

    #[test]
    fn test_split_sentences_empty() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("  .  ").is_empty());
    }

    #[test]
    fn test_tokenize_words() {
        let words = tokenize_words("The Octopus has three hearts, and blue blood!");
        assert_eq!(
            words,
            vec!["octopus", "three", "hearts", "blue", "blood"]
        );
    }
}
