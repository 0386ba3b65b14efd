//! Quiz generation from search snippets
//!
//! A quiz is built from the sentences of the provider's snippets: every
//! usable sentence (at least 40 characters, mentioning the topic) becomes a
//! fill-in-the-blank question whose correct answer is the searched topic.

use rand::seq::SliceRandom;
use rand::Rng;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

use crate::common::text::split_sentences;
use crate::services::SearchItem;

/// Upper bound on questions per quiz
pub const MAX_QUESTIONS: usize = 5;

/// Sentences shorter than this carry too little context to blank out
pub const MIN_SENTENCE_LEN: usize = 40;

/// Number of answer options per question
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Wrong-answer candidates; the topic itself is excluded when drawing
const DISTRACTOR_POOL: &[&str] = &[
    "gravity",
    "photosynthesis",
    "volcano",
    "neuron",
    "algorithm",
    "ecosystem",
    "molecule",
    "galaxy",
    "glacier",
    "antibody",
    "pendulum",
    "tectonics",
];

/// One generated question. The correct answer travels with the payload, as
/// the quiz form embeds it; grading is a pure comparison on submit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: usize,
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: String,
}

/// One submitted answer, echoing the embedded correct answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub id: usize,
    pub selected: String,
    pub answer: String,
}

/// Per-question grading outcome
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResult {
    pub id: usize,
    pub correct: bool,
}

/// Build `min(MAX_QUESTIONS, usable_sentences)` questions for `topic` from
/// the given search results.
pub fn generate_quiz<R: Rng>(
    topic: &str,
    items: &[SearchItem],
    rng: &mut R,
) -> Vec<QuizQuestion> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Vec::new();
    }

    let blanker = RegexBuilder::new(&regex::escape(topic))
        .case_insensitive(true)
        .build()
        .expect("escaped topic is a valid pattern");

    // A sentence is only usable if it actually mentions the topic; blanking
    // anything else would produce a question with no blank
    let sentences: Vec<String> = items
        .iter()
        .flat_map(|item| split_sentences(&item.snippet))
        .filter(|s| s.len() >= MIN_SENTENCE_LEN && blanker.is_match(s))
        .collect();

    sentences
        .into_iter()
        .take(MAX_QUESTIONS)
        .enumerate()
        .map(|(idx, sentence)| {
            let prompt = blanker.replace_all(&sentence, "_____").into_owned();
            let options = build_options(topic, rng);
            QuizQuestion {
                id: idx + 1,
                prompt,
                options,
                answer: topic.to_string(),
            }
        })
        .collect()
}

/// Four shuffled options: the topic plus three distinct distractors
fn build_options<R: Rng>(topic: &str, rng: &mut R) -> Vec<String> {
    let topic_lower = topic.to_lowercase();
    let mut options: Vec<String> = DISTRACTOR_POOL
        .iter()
        .filter(|d| **d != topic_lower)
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .choose_multiple(rng, OPTIONS_PER_QUESTION - 1)
        .cloned()
        .collect();

    options.push(topic.to_string());
    options.shuffle(rng);
    options
}

/// Grade submitted answers against their embedded correct answers
pub fn grade(answers: &[SubmittedAnswer]) -> (usize, Vec<AnswerResult>) {
    let results: Vec<AnswerResult> = answers
        .iter()
        .map(|a| AnswerResult {
            id: a.id,
            correct: a.selected.trim().eq_ignore_ascii_case(a.answer.trim()),
        })
        .collect();

    let score = results.iter().filter(|r| r.correct).count();
    (score, results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn item(snippet: &str) -> SearchItem {
        SearchItem {
            title: "result".to_string(),
            snippet: snippet.to_string(),
            link: "https://example.com".to_string(),
        }
    }

    #[test]
    fn test_octopus_quiz_question_count_and_shape() {
        let items = vec![
            item("The octopus is a soft-bodied mollusc found in every ocean."),
            item("An octopus has three hearts and pumps blue copper-rich blood."),
            item("When threatened, the octopus releases a dark cloud of ink to escape."),
        ];
        let mut rng = StdRng::seed_from_u64(7);

        let quiz = generate_quiz("octopus", &items, &mut rng);

        // 3 results, one usable sentence each -> min(5, 3) questions
        assert_eq!(quiz.len(), 3);
        for (idx, q) in quiz.iter().enumerate() {
            assert_eq!(q.id, idx + 1);
            assert_eq!(q.options.len(), OPTIONS_PER_QUESTION);
            assert!(q.options.contains(&"octopus".to_string()));
            assert_eq!(q.answer, "octopus");
            assert!(q.prompt.contains("_____"), "topic must be blanked out");
            assert!(!q.prompt.to_lowercase().contains("octopus"));

            let unique: std::collections::HashSet<&String> = q.options.iter().collect();
            assert_eq!(unique.len(), OPTIONS_PER_QUESTION, "options must be distinct");
        }
    }

    #[test]
    fn test_question_count_caps_at_five() {
        let long = "The octopus is one of the most intelligent of all invertebrates alive today. ";
        let items = vec![item(&long.repeat(7))];
        let mut rng = StdRng::seed_from_u64(1);

        let quiz = generate_quiz("octopus", &items, &mut rng);
        assert_eq!(quiz.len(), MAX_QUESTIONS);
    }

    #[test]
    fn test_short_sentences_are_skipped() {
        let items = vec![item("Too short. Also tiny. Octopuses are small.")];
        let mut rng = StdRng::seed_from_u64(1);

        let quiz = generate_quiz("octopus", &items, &mut rng);
        assert!(quiz.is_empty());
    }

    #[test]
    fn test_blanking_is_case_insensitive() {
        let items = vec![item(
            "Octopus arms can taste what they touch, and an OCTOPUS never forgets.",
        )];
        let mut rng = StdRng::seed_from_u64(3);

        let quiz = generate_quiz("octopus", &items, &mut rng);
        assert_eq!(quiz.len(), 1);
        assert!(!quiz[0].prompt.to_lowercase().contains("octopus"));
    }

    #[test]
    fn test_sentences_without_the_topic_are_skipped() {
        let items = vec![item(
            "This sentence is plenty long but never mentions the animal in question.",
        )];
        let mut rng = StdRng::seed_from_u64(5);
        assert!(generate_quiz("octopus", &items, &mut rng).is_empty());
    }

    #[test]
    fn test_empty_topic_yields_no_questions() {
        let items = vec![item(
            "A perfectly reasonable sentence that is long enough to be used.",
        )];
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_quiz("  ", &items, &mut rng).is_empty());
    }

    #[test]
    fn test_distractors_never_duplicate_topic() {
        let items = vec![item(
            "Gravity is the weakest of the four fundamental forces of nature.",
        )];
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let quiz = generate_quiz("gravity", &items, &mut rng);
            let count = quiz[0]
                .options
                .iter()
                .filter(|o| o.eq_ignore_ascii_case("gravity"))
                .count();
            assert_eq!(count, 1);
        }
    }

    #[test]
    fn test_grading() {
        let answers = vec![
            SubmittedAnswer {
                id: 1,
                selected: "Octopus".to_string(),
                answer: "octopus".to_string(),
            },
            SubmittedAnswer {
                id: 2,
                selected: "volcano".to_string(),
                answer: "octopus".to_string(),
            },
        ];

        let (score, results) = grade(&answers);
        assert_eq!(score, 1);
        assert!(results[0].correct);
        assert!(!results[1].correct);
    }
}
