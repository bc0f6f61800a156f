// crates/core/src/llm/config.rs
//! Completion endpoint configuration.

use serde::Deserialize;

use crate::error::ConfigError;

/// Configuration for the OpenAI-compatible completion endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".into(),
            api_key_env: "OPENROUTER_API_KEY".into(),
            timeout_secs: 30,
        }
    }
}

impl EndpointConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::MissingEnv {
                name: self.api_key_env.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = EndpointConfig::default();
        assert_eq!(cfg.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let cfg = EndpointConfig {
            api_key_env: "SENTIMENT_PULSE_TEST_UNSET_KEY_7F3A".into(),
            ..Default::default()
        };
        assert!(matches!(cfg.api_key(), Err(ConfigError::MissingEnv { .. })));
    }
}
