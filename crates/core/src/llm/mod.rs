// crates/core/src/llm/mod.rs
//! Completion endpoint integration for sentiment labeling.
//!
//! Provides the `CompletionProvider` trait, the OpenRouter HTTP
//! implementation, and the classified `InvocationError`.

pub mod config;
pub mod openrouter;
pub mod provider;
pub mod types;

pub use config::EndpointConfig;
pub use openrouter::OpenRouterProvider;
pub use provider::CompletionProvider;
pub use types::{ChatMessage, ChatRequest, ChatResponse, InvocationError};
