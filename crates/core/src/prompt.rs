// crates/core/src/prompt.rs
//! Prompt templates for sentiment labeling.
//!
//! Templates are pure: the same fields always render the same text, and
//! every template ends with the fixed answer-vocabulary instruction.

use serde::{Deserialize, Serialize};

use crate::sentiment::PostFields;

/// Closing instruction shared by every template.
pub const ANSWER_INSTRUCTION: &str =
    "Return ONLY ONE WORD: POSITIVE, NEUTRAL, or NEGATIVE.";

/// Prompt layout used by a model descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptTemplate {
    /// Numbered field block plus a hint to weigh emotional tone.
    #[default]
    Detailed,
    /// Single-paragraph variant for models with small context windows.
    Brief,
}

impl PromptTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detailed => "detailed",
            Self::Brief => "brief",
        }
    }

    /// Render the prompt for one post.
    pub fn render(&self, fields: &PostFields) -> String {
        let title = field(&fields.title);
        let body = field(&fields.body);
        let source = field(&fields.source);

        match self {
            Self::Detailed => format!(
                "Analyze the sentiment of this social media post using ALL available information:\n\
                 1. Title: '{title}'\n\
                 2. Content: '{body}'\n\
                 3. Source: '{source}'\n\n\
                 Consider the emotional tone.\n\
                 {ANSWER_INSTRUCTION}"
            ),
            Self::Brief => format!(
                "Determine the sentiment of this post. Title: '{title}'. \
                 Content: '{body}'. Source: '{source}'. {ANSWER_INSTRUCTION}"
            ),
        }
    }
}

/// Build the labeling prompt with the default template.
pub fn build_prompt(fields: &PostFields) -> String {
    PromptTemplate::default().render(fields)
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or("")
}
