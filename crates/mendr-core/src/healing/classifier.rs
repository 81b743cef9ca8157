//! Heuristic response quality check.
//!
//! An answer is unclear when it is blank, shorter than [`MIN_TOKENS`]
//! whitespace-separated tokens, or contains any refusal/uncertainty phrase
//! (case-insensitive substring match). This is a heuristic: a legitimate
//! answer mentioning "I am not" will be rejected too.

use std::sync::LazyLock;

/// Answers with fewer whitespace-separated tokens are unclear.
pub const MIN_TOKENS: usize = 3;

/// Built-in refusal and uncertainty phrases, lowercase.
pub const DEFAULT_FAILURE_PHRASES: &[&str] = &[
    "i can't",
    "i'm not able",
    "i don't know",
    "i am not programmed",
    "as an ai",
    "i do not have access",
    "i cannot answer",
    "i am unable",
    "i cannot provide",
    "i am not sure",
    "i do not know",
    "i cannot say",
    "i am not capable",
    "i cannot help",
    "i cannot assist",
    "i am not designed",
    "i am not trained",
    "i am not equipped",
    "i am not able to assist",
    "i cannot",
    "i don't",
    "i am not",
    "i cannot answer this question",
    "i am unable to answer this question",
    "i cannot provide an answer",
    "i am not able to answer this question",
    "i am not sure about that",
    "i do not have enough information",
    "i cannot provide a definitive answer",
    "i am not programmed to answer that",
    "i do not have the capability to answer that",
    "i am not designed to answer that",
    "i am not trained to answer that",
    "i won't be able to",
];

static DEFAULT_CLASSIFIER: LazyLock<ResponseClassifier> = LazyLock::new(ResponseClassifier::new);

/// Check `text` against the built-in phrase set.
pub fn is_unclear(text: &str) -> bool {
    DEFAULT_CLASSIFIER.is_unclear(text)
}

/// Stateless quality predicate over a configurable phrase set.
#[derive(Debug, Clone)]
pub struct ResponseClassifier {
    phrases: Vec<String>,
}

impl Default for ResponseClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseClassifier {
    /// Classifier using only [`DEFAULT_FAILURE_PHRASES`].
    pub fn new() -> Self {
        Self {
            phrases: DEFAULT_FAILURE_PHRASES.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Classifier using the defaults plus `extra`.
    ///
    /// Extra phrases are normalized like answers are; blank ones are ignored.
    pub fn with_extra_phrases<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut classifier = Self::new();
        for phrase in extra {
            let phrase = normalize(phrase.as_ref());
            let phrase = phrase.trim();
            if !phrase.is_empty() && !classifier.phrases.iter().any(|p| p == phrase) {
                classifier.phrases.push(phrase.to_string());
            }
        }
        classifier
    }

    /// Whether `text` should be treated as a failed answer.
    pub fn is_unclear(&self, text: &str) -> bool {
        let normalized = normalize(text);
        let normalized = normalized.trim();

        if normalized.split_whitespace().count() < MIN_TOKENS {
            return true;
        }
        self.phrases
            .iter()
            .any(|phrase| normalized.contains(phrase.as_str()))
    }
}

/// Lowercase and fold typographic apostrophes so "I don\u{2019}t" matches "i don't".
fn normalize(text: &str) -> String {
    text.to_lowercase().replace('\u{2019}', "'")
}
