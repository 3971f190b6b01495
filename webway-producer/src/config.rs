//! Producer configuration.

use std::fmt;

use rdkafka::config::ClientConfig;
use serde::{Deserialize, Serialize};
use webway_record::ENCODED_LEN;

use crate::error::ProducerError;

/// Default message size ceiling (10 MiB), large enough for one record.
pub const DEFAULT_MESSAGE_MAX_BYTES: usize = 10 * 1024 * 1024;

/// Compression codec applied by the client to message batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// No compression.
    None,
    /// gzip.
    Gzip,
    /// Snappy.
    Snappy,
    /// LZ4.
    #[default]
    Lz4,
}

impl Compression {
    /// Returns the client's name for this codec.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Snappy => "snappy",
            Self::Lz4 => "lz4",
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for a [`BrokerProducer`](crate::BrokerProducer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProducerConfig {
    /// Comma-separated `host:port` list (bootstrap.servers).
    pub bootstrap_servers: String,
    /// Largest message the client will accept (message.max.bytes).
    pub message_max_bytes: usize,
    /// Compression codec (compression.type).
    pub compression: Compression,
    /// Client-side batch size in bytes (batch.size).
    pub batch_size: usize,
    /// Batching window in milliseconds (linger.ms).
    pub linger_ms: u64,
    /// Required acks (-1 = all, 0 = none, 1 = leader).
    pub acks: i32,
    /// Local delivery deadline in milliseconds (message.timeout.ms).
    pub message_timeout_ms: u64,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            bootstrap_servers: "localhost:19092".to_string(),
            message_max_bytes: DEFAULT_MESSAGE_MAX_BYTES,
            compression: Compression::Lz4,
            batch_size: 1_048_576, // 1MB
            linger_ms: 10,
            acks: -1,
            message_timeout_ms: 30_000,
        }
    }
}

impl ProducerConfig {
    /// Creates a configuration for the given bootstrap servers.
    #[must_use]
    pub fn new(bootstrap_servers: impl Into<String>) -> Self {
        Self {
            bootstrap_servers: bootstrap_servers.into(),
            ..Self::default()
        }
    }

    /// Sets the message size ceiling.
    #[must_use]
    pub const fn with_message_max_bytes(mut self, bytes: usize) -> Self {
        self.message_max_bytes = bytes;
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the batch size threshold.
    #[must_use]
    pub const fn with_batch_size(mut self, bytes: usize) -> Self {
        self.batch_size = bytes;
        self
    }

    /// Sets the linger window.
    #[must_use]
    pub const fn with_linger_ms(mut self, linger_ms: u64) -> Self {
        self.linger_ms = linger_ms;
        self
    }

    /// Sets the local delivery deadline.
    #[must_use]
    pub const fn with_message_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.message_timeout_ms = timeout_ms;
        self
    }

    /// Checks settings the client cannot check for us.
    ///
    /// # Errors
    ///
    /// Returns [`ProducerError::InvalidConfig`] if the bootstrap list is empty
    /// or the size ceiling cannot hold one encoded record.
    pub fn validate(&self) -> Result<(), ProducerError> {
        if self.bootstrap_servers.trim().is_empty() {
            return Err(ProducerError::InvalidConfig(
                "bootstrap_servers must not be empty".to_string(),
            ));
        }
        if self.message_max_bytes < ENCODED_LEN {
            return Err(ProducerError::InvalidConfig(format!(
                "message_max_bytes {} is smaller than one record ({ENCODED_LEN} bytes)",
                self.message_max_bytes
            )));
        }
        Ok(())
    }

    /// Builds the client configuration.
    ///
    /// Values are passed through as strings; the client rejects out-of-range
    /// values when the producer is created.
    #[must_use]
    pub fn to_client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &self.bootstrap_servers)
            .set("message.max.bytes", self.message_max_bytes.to_string())
            .set("compression.type", self.compression.as_str())
            .set("batch.size", self.batch_size.to_string())
            .set("linger.ms", self.linger_ms.to_string())
            .set("acks", self.acks.to_string())
            .set("message.timeout.ms", self.message_timeout_ms.to_string());
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProducerConfig::default();
        assert_eq!(config.bootstrap_servers, "localhost:19092");
        assert_eq!(config.message_max_bytes, 10_485_760);
        assert_eq!(config.compression, Compression::Lz4);
        assert_eq!(config.batch_size, 1_048_576);
        assert_eq!(config.linger_ms, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_client_config_keys() {
        let config = ProducerConfig::new("broker-1:9092,broker-2:9092")
            .with_compression(Compression::Snappy)
            .with_linger_ms(25);
        let client = config.to_client_config();

        assert_eq!(
            client.get("bootstrap.servers"),
            Some("broker-1:9092,broker-2:9092")
        );
        assert_eq!(client.get("message.max.bytes"), Some("10485760"));
        assert_eq!(client.get("compression.type"), Some("snappy"));
        assert_eq!(client.get("batch.size"), Some("1048576"));
        assert_eq!(client.get("linger.ms"), Some("25"));
        assert_eq!(client.get("acks"), Some("-1"));
    }

    #[test]
    fn test_ceiling_below_record_rejected() {
        let config = ProducerConfig::default().with_message_max_bytes(ENCODED_LEN - 1);
        assert!(matches!(
            config.validate(),
            Err(ProducerError::InvalidConfig(_))
        ));

        let config = ProducerConfig::default().with_message_max_bytes(ENCODED_LEN);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_bootstrap_rejected() {
        let config = ProducerConfig::new("  ");
        assert!(matches!(
            config.validate(),
            Err(ProducerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_toml_partial() {
        let config: ProducerConfig = toml::from_str(
            r#"
            bootstrap_servers = "10.0.0.5:9092"
            compression = "snappy"
            "#,
        )
        .unwrap();

        assert_eq!(config.bootstrap_servers, "10.0.0.5:9092");
        assert_eq!(config.compression, Compression::Snappy);
        assert_eq!(config.message_max_bytes, DEFAULT_MESSAGE_MAX_BYTES);
    }

    #[test]
    fn test_unsupported_codec_rejected() {
        for codec in ["brotli", "zstd"] {
            let result: Result<ProducerConfig, _> =
                toml::from_str(&format!("compression = \"{codec}\""));
            assert!(result.is_err(), "{codec}");
        }
    }
}
