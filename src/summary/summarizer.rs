//! Naive extractive summarizer
//!
//! Sentences are scored by the frequency of their words across the whole
//! input; the top three survive, in original order. An empty outcome is a
//! typed error, not a placeholder string, so callers can tell "no content"
//! from a processing failure upstream.

use std::collections::HashMap;
use thiserror::Error;

use crate::common::text::{split_sentences, tokenize_words};

/// Sentences kept in a summary
pub const SUMMARY_SENTENCES: usize = 3;

/// Inputs shorter than this are treated as a topic to look up rather than
/// text to summarize
pub const MIN_DIRECT_SUMMARY_LEN: usize = 400;

#[derive(Debug, Error, PartialEq)]
pub enum SummaryError {
    #[error("nothing to summarize")]
    NoContent,
}

/// Summarize `text` down to at most [`SUMMARY_SENTENCES`] sentences.
pub fn summarize(text: &str) -> Result<String, SummaryError> {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return Err(SummaryError::NoContent);
    }

    if sentences.len() <= SUMMARY_SENTENCES {
        return Ok(sentences.join(" "));
    }

    let mut frequencies: HashMap<String, usize> = HashMap::new();
    for word in tokenize_words(text) {
        *frequencies.entry(word).or_insert(0) += 1;
    }

    let mut scored: Vec<(usize, usize)> = sentences
        .iter()
        .enumerate()
        .map(|(idx, sentence)| {
            let score = tokenize_words(sentence)
                .iter()
                .map(|w| frequencies.get(w).copied().unwrap_or(0))
                .sum();
            (idx, score)
        })
        .collect();

    // Highest score wins; earlier sentence breaks ties
    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut selected: Vec<usize> = scored
        .into_iter()
        .take(SUMMARY_SENTENCES)
        .map(|(idx, _)| idx)
        .collect();
    selected.sort_unstable();

    Ok(selected
        .into_iter()
        .map(|idx| sentences[idx].as_str())
        .collect::<Vec<_>>()
        .join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_returned_whole() {
        let text = "One sentence. Another sentence.";
        assert_eq!(summarize(text).unwrap(), "One sentence. Another sentence.");
    }

    #[test]
    fn test_empty_input_is_typed_error() {
        assert_eq!(summarize(""), Err(SummaryError::NoContent));
        assert_eq!(summarize("   ...   "), Err(SummaryError::NoContent));
    }

    #[test]
    fn test_selects_three_sentences_in_original_order() {
        let text = "Coral reefs support coral polyps and coral fish everywhere. \
                    The weather was mild on Tuesday. \
                    Coral bleaching threatens coral reefs when oceans warm. \
                    Someone parked a bicycle outside. \
                    Scientists study coral reefs to protect coral diversity.";

        let summary = summarize(text).unwrap();
        let sentences = split_sentences(&summary);
        assert_eq!(sentences.len(), SUMMARY_SENTENCES);

        // The coral-heavy sentences outscore the filler, original order kept
        assert!(summary.contains("Coral reefs support"));
        assert!(summary.contains("Coral bleaching"));
        assert!(summary.contains("Scientists study"));
        let first = summary.find("Coral reefs support").unwrap();
        let second = summary.find("Coral bleaching").unwrap();
        let third = summary.find("Scientists study").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_summary_never_exceeds_three_sentences() {
        let text = "Alpha beta gamma delta one. ".repeat(20);
        let summary = summarize(&text).unwrap();
        assert_eq!(split_sentences(&summary).len(), SUMMARY_SENTENCES);
    }
}
