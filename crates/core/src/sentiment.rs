// crates/core/src/sentiment.rs
//! Sentiment labels and the record shapes the pipeline reads and writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label stored on a post once the pipeline has processed it.
///
/// A post with no label (`NULL` in storage) is pending. Every variant,
/// including `Invalid`, is terminal: the pipeline never revisits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Invalid,
}

impl Sentiment {
    /// Labels a model is allowed to answer with.
    pub const VOCABULARY: [Sentiment; 3] =
        [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Neutral => "NEUTRAL",
            Self::Negative => "NEGATIVE",
            Self::Invalid => "INVALID",
        }
    }

    /// Parse a stored label. Exact match only; normalization of model
    /// output lives in [`crate::validate`].
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "POSITIVE" => Some(Self::Positive),
            "NEUTRAL" => Some(Self::Neutral),
            "NEGATIVE" => Some(Self::Negative),
            "INVALID" => Some(Self::Invalid),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The text fields of a post that feed the prompt.
///
/// Any of them may be missing in storage (e.g. link posts have no body).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFields {
    pub title: Option<String>,
    pub body: Option<String>,
    pub source: Option<String>,
}

/// A freshly ingested post, inserted with no sentiment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub post_id: String,
    pub created_at: DateTime<Utc>,
    pub source: String,
    pub title: String,
    pub body: String,
}
