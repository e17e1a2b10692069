//! Configuration file handling.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// The name of the configuration file.
const FILE_NAME: &str = "config.yaml";

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Represents the configuration structure expected from the `config.yaml`
/// file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend connection settings.
    pub api: ApiConfig,
    /// Durable credential storage settings.
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the docsearch backend.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides the platform-default credentials file location.
    pub credentials_path: Option<PathBuf>,
}

/// Reads the configuration file and returns the parsed configuration.
///
/// A missing file yields the defaults; a present but unreadable or
/// malformed file panics, since running against the wrong backend is worse
/// than not running.
pub fn read(path: Option<&Path>) -> Config {
    let path = path.unwrap_or_else(|| Path::new(FILE_NAME));

    if !path.exists() {
        return Config::default();
    }

    serde_yaml::from_reader(
        File::open(path).expect("failed to open configuration file"),
    )
    .expect("failed to deserialize configuration file")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = read(Some(Path::new("/nonexistent/config.yaml")));
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert!(config.storage.credentials_path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        std::fs::write(&path, "api:\n  base_url: \"http://backend:9000\"\n")
            .unwrap();

        let config = read(Some(&path));
        assert_eq!(config.api.base_url, "http://backend:9000");
        assert!(config.storage.credentials_path.is_none());
    }
}
