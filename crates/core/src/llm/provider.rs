// crates/core/src/llm/provider.rs
//! CompletionProvider trait defining the interface to a completion endpoint.

use async_trait::async_trait;

use super::types::InvocationError;
use crate::model::ModelDescriptor;

/// A remote endpoint that turns a prompt into text for a given model.
///
/// Implementations include:
/// - `OpenRouterProvider`: OpenAI-compatible HTTP API
/// - scripted fakes in tests
///
/// One call is exactly one outbound request. Retry policy belongs to callers.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send `prompt` as a single user message using `model`'s identifier,
    /// temperature and token limit. Returns the first choice's text as-is.
    async fn complete(
        &self,
        model: &ModelDescriptor,
        prompt: &str,
    ) -> Result<String, InvocationError>;

    /// Provider name for logging (e.g. "openrouter").
    fn name(&self) -> &str;
}
