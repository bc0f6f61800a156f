// crates/core/src/validate.rs
//! Normalization of raw model output into a [`Sentiment`].

use crate::sentiment::Sentiment;

/// Map raw completion text onto the label vocabulary.
///
/// Surrounding whitespace is trimmed and the text uppercased. Anything that
/// is not exactly one of the vocabulary words becomes [`Sentiment::Invalid`].
/// This never fails: an off-vocabulary answer is a recorded outcome.
pub fn validate(raw: &str) -> Sentiment {
    let normalized = raw.trim().to_uppercase();
    Sentiment::VOCABULARY
        .iter()
        .copied()
        .find(|s| s.as_str() == normalized)
        .unwrap_or(Sentiment::Invalid)
}
