//! Error types for record construction and serialization.

use thiserror::Error;

/// Errors that can occur when building a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A sample buffer could not be allocated.
    #[error("failed to allocate {bytes} bytes for {buffer}")]
    Allocation {
        /// Which buffer was being allocated.
        buffer: &'static str,
        /// Requested size in bytes.
        bytes: usize,
    },

    /// A sample sequence does not have the fixed element count.
    #[error("{field} has {actual} samples, expected {expected}")]
    SampleCount {
        /// Which sample sequence is wrong.
        field: &'static str,
        /// Required element count.
        expected: usize,
        /// Supplied element count.
        actual: usize,
    },
}

/// Errors that can occur when encoding or decoding a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializationError {
    /// Input is shorter than one encoded record.
    #[error("buffer too short: {actual} bytes, need {required}")]
    TooShort {
        /// Bytes supplied.
        actual: usize,
        /// Bytes required.
        required: usize,
    },

    /// The output or sample buffer could not be allocated.
    #[error("failed to allocate {bytes} bytes")]
    Allocation {
        /// Requested size in bytes.
        bytes: usize,
    },

    /// Decoded fields did not form a valid record.
    #[error(transparent)]
    Record(#[from] RecordError),
}
