//! Store client configuration

use doc_annotator_core::config::config_dir;
use doc_annotator_core::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// GraphQL endpoint used when nothing else is configured
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/graphql/";

/// Settings for the remote annotation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// GraphQL endpoint URL
    pub endpoint: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 10,
        }
    }
}

impl StoreConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `store.toml` next to the layer config
    pub fn default_path() -> PathBuf {
        config_dir().join("store.toml")
    }

    /// Loads configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DOC_ANNOTATOR_ENDPOINT`: GraphQL endpoint URL
    /// - `DOC_ANNOTATOR_TIMEOUT_SECS`: request timeout (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the default file if present, then applies env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            tracing::debug!(path = %path.display(), "loading store config");
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(endpoint) = std::env::var("DOC_ANNOTATOR_ENDPOINT") {
            self.endpoint = endpoint.trim().to_string();
        }
        if let Ok(val) = std::env::var("DOC_ANNOTATOR_TIMEOUT_SECS") {
            self.timeout_secs = val
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DOC_ANNOTATOR_TIMEOUT_SECS".to_string()))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidValue("endpoint".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("timeout_secs".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    fn test_default_endpoint() {
        let config = StoreConfig::default();
        assert_eq!(config.endpoint, "http://localhost:8000/api/graphql/");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "endpoint = \"https://docs.example.com/graphql\"").unwrap();
        let config = StoreConfig::from_file(file.path()).unwrap();
        assert_eq!(config.endpoint, "https://docs.example.com/graphql");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let err = StoreConfig::from_toml("endpoint = \"ftp://nope\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(key) if key == "endpoint"));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var("DOC_ANNOTATOR_ENDPOINT", "http://127.0.0.1:9000/graphql");
        std::env::set_var("DOC_ANNOTATOR_TIMEOUT_SECS", "3");
        let config = StoreConfig::from_env();
        std::env::remove_var("DOC_ANNOTATOR_ENDPOINT");
        std::env::remove_var("DOC_ANNOTATOR_TIMEOUT_SECS");
        let config = config.unwrap();
        assert_eq!(config.endpoint, "http://127.0.0.1:9000/graphql");
        assert_eq!(config.timeout_secs, 3);
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_timeout() {
        std::env::set_var("DOC_ANNOTATOR_TIMEOUT_SECS", "soon");
        let result = StoreConfig::from_env();
        std::env::remove_var("DOC_ANNOTATOR_TIMEOUT_SECS");
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }
}
