//! Centralized path functions for app storage locations.

use std::path::PathBuf;

/// App cache root: `~/Library/Caches/sentiment-pulse/` (macOS) or `~/.cache/sentiment-pulse/` (Linux).
pub fn app_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("sentiment-pulse"))
}

/// SQLite database file: `<app_cache_dir>/sentiment-pulse.db`.
pub fn db_path() -> Option<PathBuf> {
    app_cache_dir().map(|d| d.join("sentiment-pulse.db"))
}

/// Default config file location, relative to the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config").join("config.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_path() {
        let path = db_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("sentiment-pulse"));
        assert!(path.to_string_lossy().ends_with("sentiment-pulse.db"));
    }

    #[test]
    fn test_default_config_path() {
        assert!(default_config_path().ends_with("config/config.yaml"));
    }
}
