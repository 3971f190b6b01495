//! Error types for the producer.

use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use thiserror::Error;
use webway_record::SerializationError;

/// Errors returned synchronously by the producer.
///
/// Broker-side failures after a successful enqueue are not errors here; they
/// arrive as [`DeliveryOutcome::Failed`](crate::DeliveryOutcome::Failed).
#[derive(Debug, Error)]
pub enum ProducerError {
    /// The client rejected the configuration.
    #[error("configuration rejected: {0}")]
    Configuration(#[source] KafkaError),

    /// The configuration failed local validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The record could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(#[from] SerializationError),

    /// The client's send queue is full.
    #[error("send queue full")]
    QueueFull,

    /// The encoded record exceeds the configured size ceiling.
    #[error("message of {size} bytes exceeds ceiling of {max} bytes")]
    MessageTooLarge {
        /// Encoded size.
        size: usize,
        /// Configured ceiling.
        max: usize,
    },

    /// The client refused to enqueue the record.
    #[error("enqueue failed: {message}")]
    Enqueue {
        /// Client error code.
        code: i32,
        /// Error message.
        message: String,
    },

    /// The producer has been closed.
    #[error("producer is closed")]
    Closed,
}

impl ProducerError {
    /// Returns a Kafka-style numeric code for the error.
    #[must_use]
    pub const fn error_code(&self) -> i32 {
        match self {
            Self::Configuration(_) | Self::InvalidConfig(_) => -6,
            Self::Serialization(_) => -2,
            Self::QueueFull => RDKafkaErrorCode::QueueFull as i32,
            Self::MessageTooLarge { .. } => RDKafkaErrorCode::MessageSizeTooLarge as i32,
            Self::Enqueue { code, .. } => *code,
            Self::Closed => -7,
        }
    }

    /// Returns true if the caller may retry the same publish later.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::QueueFull)
    }

    /// Maps an enqueue failure from the client.
    pub(crate) fn from_enqueue(err: &KafkaError, size: usize, max: usize) -> Self {
        match err.rdkafka_error_code() {
            Some(RDKafkaErrorCode::QueueFull) => Self::QueueFull,
            Some(RDKafkaErrorCode::MessageSizeTooLarge) => Self::MessageTooLarge { size, max },
            code => Self::Enqueue {
                code: code.map_or(-1, |c| c as i32),
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enqueue_mapping() {
        let err = KafkaError::MessageProduction(RDKafkaErrorCode::QueueFull);
        let mapped = ProducerError::from_enqueue(&err, 10, 20);
        assert!(matches!(mapped, ProducerError::QueueFull));
        assert!(mapped.is_transient());

        let err = KafkaError::MessageProduction(RDKafkaErrorCode::MessageSizeTooLarge);
        let mapped = ProducerError::from_enqueue(&err, 30, 20);
        assert!(matches!(
            mapped,
            ProducerError::MessageTooLarge { size: 30, max: 20 }
        ));

        let err = KafkaError::MessageProduction(RDKafkaErrorCode::UnknownTopic);
        let mapped = ProducerError::from_enqueue(&err, 10, 20);
        assert_eq!(mapped.error_code(), RDKafkaErrorCode::UnknownTopic as i32);
        assert!(!mapped.is_transient());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ProducerError::Closed.error_code(), -7);
        assert_eq!(
            ProducerError::InvalidConfig("x".to_string()).error_code(),
            -6
        );
        assert_eq!(
            ProducerError::QueueFull.error_code(),
            RDKafkaErrorCode::QueueFull as i32
        );
    }
}
