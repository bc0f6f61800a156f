// crates/core/src/llm/openrouter.rs
//! OpenRouter provider: OpenAI-compatible `/chat/completions` over HTTPS.

use std::time::Duration;

use async_trait::async_trait;

use super::config::EndpointConfig;
use super::provider::CompletionProvider;
use super::types::{ChatMessage, ChatRequest, ChatResponse, InvocationError};
use crate::error::ConfigError;
use crate::model::ModelDescriptor;

/// Completion provider backed by an OpenAI-compatible HTTP endpoint.
pub struct OpenRouterProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout_secs: u64,
}

impl OpenRouterProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ConfigError::Invalid(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout_secs,
        })
    }

    /// Build from endpoint config, reading the API key from the environment.
    pub fn from_config(config: &EndpointConfig) -> Result<Self, ConfigError> {
        Self::new(&config.base_url, config.api_key()?, config.timeout_secs)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn classify_transport(&self, e: reqwest::Error) -> InvocationError {
        if e.is_timeout() {
            InvocationError::Unavailable(format!("timed out after {}s", self.timeout_secs))
        } else {
            InvocationError::Unavailable(format!("request failed: {e}"))
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterProvider {
    async fn complete(
        &self,
        model: &ModelDescriptor,
        prompt: &str,
    ) -> Result<String, InvocationError> {
        let body = ChatRequest {
            model: model.identifier().to_string(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: model.temperature(),
            max_tokens: model.max_tokens(),
        };

        let t0 = std::time::Instant::now();
        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .header("X-Title", "sentiment-pulse")
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.classify_transport(e))?;
        let elapsed_ms = t0.elapsed().as_millis() as u64;

        if !status.is_success() {
            tracing::debug!(
                model = %model.identifier(),
                status = status.as_u16(),
                elapsed_ms,
                "openrouter: non-success status"
            );
            let detail: String = text.chars().take(300).collect();
            return Err(InvocationError::from_status(status.as_u16(), detail));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| InvocationError::Malformed(format!("invalid JSON: {e}")))?;

        // Gateways sometimes report upstream failures inside a 200 body.
        if let Some(err) = &parsed.error {
            let code = err.status().unwrap_or(502);
            let message = err.message.clone().unwrap_or_default();
            return Err(InvocationError::from_status(code, message));
        }

        tracing::debug!(model = %model.identifier(), elapsed_ms, "openrouter: completion received");
        parsed
            .first_text()
            .ok_or_else(|| InvocationError::Malformed("response has no choice text".into()))
    }

    fn name(&self) -> &str {
        "openrouter"
    }
}
