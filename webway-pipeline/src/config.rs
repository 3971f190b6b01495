//! Run and pipeline configuration.
//!
//! Loaded from TOML with every field optional:
//!
//! ```toml
//! [producer]
//! bootstrap_servers = "localhost:19092"
//! compression = "lz4"
//!
//! [run]
//! messages = 10
//! topic = "automation-data"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use webway_producer::ProducerConfig;

/// Settings for one orchestrated run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Message key shared by every record of the run.
    pub message_key: i32,
    /// Number of records to generate and publish.
    pub messages: u32,
    /// Destination topic.
    pub topic: String,
    /// Pause after each record in milliseconds.
    pub pace_ms: u64,
    /// How long the final flush may wait in milliseconds.
    pub flush_timeout_ms: u64,
    /// Fixed generator seed; seeded from the clock when absent.
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            message_key: 12345,
            messages: 10,
            topic: "automation-data".to_string(),
            pace_ms: 100,
            flush_timeout_ms: 5_000,
            seed: None,
        }
    }
}

impl RunConfig {
    /// Pause between records.
    #[must_use]
    pub const fn pace(&self) -> Duration {
        Duration::from_millis(self.pace_ms)
    }

    /// Deadline for the final flush.
    #[must_use]
    pub const fn flush_timeout(&self) -> Duration {
        Duration::from_millis(self.flush_timeout_ms)
    }
}

/// Complete configuration for the `webway` binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Broker producer settings.
    pub producer: ProducerConfig,
    /// Run loop settings.
    pub run: RunConfig,
}

impl PipelineConfig {
    /// Load a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Serialize the configuration to a TOML string.
    #[must_use]
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading the configuration file.
    #[error("failed to read config from {path}: {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Parse error in TOML.
    #[error("failed to parse config: {message}")]
    Parse {
        /// Error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use webway_producer::Compression;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.run.message_key, 12345);
        assert_eq!(config.run.messages, 10);
        assert_eq!(config.run.topic, "automation-data");
        assert_eq!(config.run.pace(), Duration::from_millis(100));
        assert_eq!(config.run.flush_timeout(), Duration::from_secs(5));
        assert_eq!(config.producer.bootstrap_servers, "localhost:19092");
    }

    #[test]
    fn test_partial_toml() {
        let config = PipelineConfig::from_toml(
            r#"
            [producer]
            bootstrap_servers = "kafka:9092"
            compression = "none"

            [run]
            messages = 3
            seed = 42
            "#,
        )
        .unwrap();

        assert_eq!(config.producer.bootstrap_servers, "kafka:9092");
        assert_eq!(config.producer.compression, Compression::None);
        assert_eq!(config.run.messages, 3);
        assert_eq!(config.run.seed, Some(42));
        assert_eq!(config.run.topic, "automation-data");
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = PipelineConfig::default();
        config.run.seed = Some(7);
        config.run.pace_ms = 0;

        let parsed = PipelineConfig::from_toml(&config.to_toml()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_parse_error() {
        let result = PipelineConfig::from_toml("[run]\nmessages = \"ten\"");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = PipelineConfig::from_file("/nonexistent/webway.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
