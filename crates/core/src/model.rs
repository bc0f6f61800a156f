// crates/core/src/model.rs
//! Immutable description of one candidate labeling model.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::prompt::PromptTemplate;
use crate::sentiment::PostFields;

/// Configuration for one model the pipeline may label with.
///
/// Fields are private so a descriptor can only exist in a validated state.
/// Build with [`ModelDescriptor::new`] or deserialize through
/// [`ModelDescriptorConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    identifier: String,
    temperature: f32,
    max_tokens: u32,
    template: PromptTemplate,
}

impl ModelDescriptor {
    pub fn new(
        identifier: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
        template: PromptTemplate,
    ) -> Result<Self, ConfigError> {
        let identifier = identifier.into();
        if identifier.trim().is_empty() {
            return Err(ConfigError::invalid_model(identifier, "identifier is empty"));
        }
        if !(0.0..=1.0).contains(&temperature) {
            return Err(ConfigError::invalid_model(
                identifier,
                format!("temperature {temperature} outside [0, 1]"),
            ));
        }
        if max_tokens == 0 {
            return Err(ConfigError::invalid_model(identifier, "max_tokens must be positive"));
        }
        Ok(Self {
            identifier,
            temperature,
            max_tokens,
            template,
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn template(&self) -> PromptTemplate {
        self.template
    }

    /// Render this model's prompt for a post.
    pub fn prompt(&self, fields: &PostFields) -> String {
        self.template.render(fields)
    }
}

/// Raw descriptor as written in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelDescriptorConfig {
    pub identifier: String,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub template: PromptTemplate,
}

fn default_max_tokens() -> u32 {
    3
}

impl TryFrom<ModelDescriptorConfig> for ModelDescriptor {
    type Error = ConfigError;

    fn try_from(cfg: ModelDescriptorConfig) -> Result<Self, Self::Error> {
        ModelDescriptor::new(cfg.identifier, cfg.temperature, cfg.max_tokens, cfg.template)
    }
}

/// Models shipped as defaults, in fallback order.
pub fn default_candidates() -> Vec<ModelDescriptorConfig> {
    ["meta-llama/llama-4-scout:free", "mistralai/mistral-nemo:free"]
        .into_iter()
        .map(|identifier| ModelDescriptorConfig {
            identifier: identifier.to_string(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            template: PromptTemplate::Detailed,
        })
        .collect()
}
