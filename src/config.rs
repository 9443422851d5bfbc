//! Combined configuration for ingestion and analysis
//!
//! With the `config-file` feature the configuration can be read from TOML.
//! Keys are camelCase and every key is optional:
//!
//! ```toml
//! [ingest]
//! maxFileSize = 10485760
//! nullTokens = ["", "NA", "-"]
//!
//! [analysis]
//! maxRows = 50000
//! quantileMethod = "linear"
//!
//! [analysis.quality]
//! good = 98.0
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ingest::IngestConfig;
use crate::profiling::AnalysisConfig;

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("Cannot read configuration {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML syntax or type error
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> String {
        match self {
            ConfigError::Io { path, .. } => {
                format!(
                    "{self}\n\n\
                    Hint: Check that {path} exists, or omit --config to use the defaults."
                )
            }
            ConfigError::Invalid(_) => {
                format!(
                    "{self}\n\n\
                    Hint: Keys are camelCase, e.g. maxRows under [analysis]."
                )
            }
        }
    }
}

/// Configuration for a full ingest-and-profile run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfilerConfig {
    pub ingest: IngestConfig,
    pub analysis: AnalysisConfig,
}

impl ProfilerConfig {
    pub fn new(ingest: IngestConfig, analysis: AnalysisConfig) -> Self {
        Self { ingest, analysis }
    }

    /// Parse a TOML document
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Load from a TOML file, or fall back to defaults when no path is given
    #[cfg(feature = "config-file")]
    pub fn load(path: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;

        tracing::debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }
}

#[cfg(all(test, feature = "config-file"))]
mod tests {
    use super::*;
    use crate::profiling::QuantileMethod;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ProfilerConfig::from_toml_str(
            r#"
            [ingest]
            maxFileSize = 1024

            [analysis]
            quantileMethod = "linear"

            [analysis.quality]
            good = 98.0
            "#,
        )
        .unwrap();

        assert_eq!(config.ingest.max_file_size, 1024);
        assert_eq!(config.ingest.sample_size, IngestConfig::default().sample_size);
        assert_eq!(config.analysis.quantile_method, QuantileMethod::Linear);
        assert_eq!(config.analysis.quality.good, 98.0);
        assert_eq!(config.analysis.quality.warning, 80.0);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(ProfilerConfig::from_toml_str("").unwrap(), ProfilerConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = ProfilerConfig::from_toml_str("[analysis]\nmaxRows = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.user_message().contains("Hint:"));
    }

    #[test]
    fn test_load_without_path() {
        assert_eq!(ProfilerConfig::load(None).unwrap(), ProfilerConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = ProfilerConfig::load(Some(std::path::Path::new("/nonexistent/profiler.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
