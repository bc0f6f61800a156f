// crates/core/src/config.rs
//! Application configuration, loaded once at startup from YAML.
//!
//! The resulting [`AppConfig`] is passed by reference to every component;
//! nothing reads configuration from globals after startup. Secrets stay in
//! the environment (see [`EndpointConfig::api_key`]).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::llm::EndpointConfig;
use crate::model::{default_candidates, ModelDescriptor, ModelDescriptorConfig};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub openrouter: EndpointConfig,
    /// Candidate models in fallback order, first preferred.
    pub models: Vec<ModelDescriptorConfig>,
    pub pipeline: PipelineConfig,
    pub ingest: IngestConfig,
    pub schedule: ScheduleConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            openrouter: EndpointConfig::default(),
            models: default_candidates(),
            pipeline: PipelineConfig::default(),
            ingest: IngestConfig::default(),
            schedule: ScheduleConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file; defaults to the app cache directory.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Pause after each committed label, to stay under upstream rate limits.
    pub item_delay_ms: u64,
    /// Probe candidates before each run. When off, the first candidate is used.
    pub health_check: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            item_delay_ms: 5_000,
            health_check: true,
        }
    }
}

impl PipelineConfig {
    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub base_url: String,
    pub user_agent: String,
    pub subreddits: Vec<String>,
    /// Maximum posts examined per subreddit per pass.
    pub post_limit: u32,
    pub page_size: u32,
    /// Pause between listing pages.
    pub request_delay_ms: u64,
    /// Pause after each newly stored post.
    pub insert_delay_ms: u64,
    pub timeout_secs: u64,
}

impl IngestConfig {
    pub fn insert_delay(&self) -> Duration {
        Duration::from_millis(self.insert_delay_ms)
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.reddit.com".into(),
            user_agent: concat!("sentiment-pulse/", env!("CARGO_PKG_VERSION")).into(),
            subreddits: vec!["bitcoin".into()],
            post_limit: 25,
            page_size: 25,
            request_delay_ms: 1_000,
            insert_delay_ms: 1_000,
            timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub ingest_every_secs: u64,
    pub label_every_secs: u64,
    /// Delay before the first labeling run, so it trails ingestion.
    pub label_offset_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            ingest_every_secs: 30 * 60,
            label_every_secs: 30 * 60,
            label_offset_secs: 15 * 60,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// When set, logs are also written to a daily-rolling file here.
    pub directory: Option<PathBuf>,
}

impl AppConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_yaml(&text).map_err(|e| match e {
            ConfigError::Malformed { message, .. } => ConfigError::Malformed {
                path: path.to_owned(),
                message,
            },
            other => other,
        })
    }

    /// Parse and validate YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(text).map_err(|e| ConfigError::Malformed {
            path: PathBuf::new(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.candidates()?;
        if self.schedule.ingest_every_secs == 0 || self.schedule.label_every_secs == 0 {
            return Err(ConfigError::Invalid("schedule periods must be positive".into()));
        }
        if self.ingest.page_size == 0 || self.ingest.page_size > 100 {
            return Err(ConfigError::Invalid("ingest.page_size must be in 1..=100".into()));
        }
        if self.openrouter.timeout_secs == 0 || self.ingest.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeouts must be positive".into()));
        }
        Ok(())
    }

    /// Validated candidate descriptors in priority order.
    pub fn candidates(&self) -> Result<Vec<ModelDescriptor>, ConfigError> {
        if self.models.is_empty() {
            return Err(ConfigError::Invalid("at least one model must be configured".into()));
        }
        self.models
            .iter()
            .cloned()
            .map(ModelDescriptor::try_from)
            .collect()
    }

    /// Resolved database path.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.database.path {
            Some(p) => Ok(p.clone()),
            None => crate::paths::db_path().ok_or(ConfigError::NoCacheDir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptTemplate;

    const SAMPLE: &str = r#"
database:
  path: /tmp/pulse.db
models:
  - identifier: meta-llama/llama-4-scout:free
    temperature: 0
    max_tokens: 3
  - identifier: mistralai/mistral-nemo:free
    template: brief
pipeline:
  item_delay_ms: 250
  health_check: false
ingest:
  subreddits: [bitcoin, ethereum]
  post_limit: 10
  insert_delay_ms: 0
schedule:
  ingest_every_secs: 1800
  label_every_secs: 1800
  label_offset_secs: 900
logging:
  format: json
"#;

    #[test]
    fn test_parse_sample() {
        let cfg = AppConfig::from_yaml(SAMPLE).unwrap();
        let candidates = cfg.candidates().unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].identifier(), "meta-llama/llama-4-scout:free");
        assert_eq!(candidates[1].template(), PromptTemplate::Brief);
        assert_eq!(cfg.pipeline.item_delay(), Duration::from_millis(250));
        assert!(!cfg.pipeline.health_check);
        assert_eq!(cfg.ingest.subreddits, vec!["bitcoin", "ethereum"]);
        assert_eq!(cfg.ingest.page_size, 25);
        assert_eq!(cfg.ingest.request_delay_ms, 1_000);
        assert!(cfg.ingest.insert_delay().is_zero());
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.database_path().unwrap(), PathBuf::from("/tmp/pulse.db"));
    }

    #[test]
    fn test_shipped_config_parses() {
        let cfg = AppConfig::from_yaml(include_str!("../../../config/config.yaml")).unwrap();
        assert_eq!(cfg.candidates().unwrap().len(), 2);
        assert!(cfg.database.path.is_none());
        assert_eq!(cfg.openrouter.api_key_env, "OPENROUTER_API_KEY");
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let cfg = AppConfig::from_yaml("{}").unwrap();
        assert_eq!(cfg.models.len(), 2);
        assert!(cfg.pipeline.health_check);
        assert_eq!(cfg.pipeline.item_delay_ms, 5_000);
        assert_eq!(cfg.schedule.label_offset_secs, 900);
    }

    #[test]
    fn test_rejects_bad_model() {
        let err = AppConfig::from_yaml("models:\n  - identifier: m\n    temperature: 3\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidModel { .. }));
    }

    #[test]
    fn test_rejects_empty_model_list() {
        let err = AppConfig::from_yaml("models: []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_zero_schedule() {
        let err = AppConfig::from_yaml("schedule:\n  label_every_secs: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = AppConfig::from_yaml("models: [[[").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, SAMPLE).unwrap();
        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.models.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }
}
