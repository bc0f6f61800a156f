// crates/core/src/llm/types.rs
//! Wire types and the classified error for chat-completion calls.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One chat message in a completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of an OpenAI-compatible `/chat/completions` request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Subset of the completion response the pipeline reads.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Error object some gateways embed in an HTTP 200 body.
///
/// `code` arrives as a number or a string depending on the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// HTTP-style status carried in `code`, if it reads as one.
    pub fn status(&self) -> Option<u16> {
        match self.code.as_ref()? {
            serde_json::Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl ChatResponse {
    /// Text of the first choice, unmodified.
    pub fn first_text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
    }
}

/// Classified failure of a single completion call.
///
/// Callers branch on the variant; transport details stay in the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Model unavailable: {0}")]
    Unavailable(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl InvocationError {
    /// Classify an HTTP status code returned by the endpoint.
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        match status {
            401 | 402 | 403 => Self::Unauthorized(format!("HTTP {status}: {detail}")),
            429 => Self::RateLimited(format!("HTTP {status}: {detail}")),
            _ => Self::Unavailable(format!("HTTP {status}: {detail}")),
        }
    }

    /// Whether this failure must stop the rest of a labeling run.
    pub fn aborts_run(&self) -> bool {
        !matches!(self, Self::Malformed(_))
    }

    /// Whether a health check failing this way disqualifies the model.
    pub fn disqualifies_model(&self) -> bool {
        matches!(self, Self::Unauthorized(_) | Self::Unavailable(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::Unavailable(_) => "unavailable",
            Self::RateLimited(_) => "rate_limited",
            Self::Malformed(_) => "malformed",
        }
    }
}
