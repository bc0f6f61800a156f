// crates/core/src/lib.rs
pub mod config;
pub mod error;
pub mod llm;
pub mod model;
pub mod paths;
pub mod prompt;
pub mod selector;
pub mod sentiment;
pub mod store;
pub mod validate;

pub use config::*;
pub use error::*;
pub use llm::{CompletionProvider, EndpointConfig, InvocationError, OpenRouterProvider};
pub use model::{ModelDescriptor, ModelDescriptorConfig};
pub use prompt::{build_prompt, PromptTemplate};
pub use selector::{select, ModelSelector};
pub use sentiment::*;
pub use store::{PostStore, StoreError, StoreResult};
pub use validate::validate;
