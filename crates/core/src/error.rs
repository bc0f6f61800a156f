use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("IO error reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("Invalid model descriptor '{identifier}': {reason}")]
    InvalidModel { identifier: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Environment variable {name} is not set")]
    MissingEnv { name: String },

    #[error("Cache directory could not be determined")]
    NoCacheDir,
}

impl ConfigError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    pub fn invalid_model(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidModel {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_classification() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = ConfigError::io("/etc/config.yaml", io_err);
        assert!(matches!(err, ConfigError::NotFound { .. }));

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::io("/etc/config.yaml", io_err);
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_display() {
        let err = ConfigError::invalid_model("m", "temperature out of range");
        assert_eq!(
            err.to_string(),
            "Invalid model descriptor 'm': temperature out of range"
        );
        let err = ConfigError::MissingEnv { name: "OPENROUTER_API_KEY".into() };
        assert!(err.to_string().contains("OPENROUTER_API_KEY"));
    }
}
