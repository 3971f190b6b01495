//! The telemetry record type.

use std::fmt;
use std::ops::Range;

use crate::codec::ENCODED_LEN;
use crate::error::RecordError;

/// Number of samples in each of the two sample sequences.
pub const SAMPLE_COUNT: usize = 780_000;

/// Range every normalized sample is drawn from.
pub const NORMALIZED_RANGE: Range<f32> = 0.0..1.0;

/// Range every unnormalized sample is drawn from.
pub const UNNORMALIZED_RANGE: Range<f32> = -1000.0..1000.0;

/// One unit of generated telemetry.
///
/// Both sample sequences are separately heap-allocated and always hold exactly
/// [`SAMPLE_COUNT`] elements. A record is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRecord {
    message_key: i32,
    sequence_number: i32,
    timestamp: u64,
    normalized_samples: Vec<f32>,
    unnormalized_samples: Vec<f32>,
}

impl TelemetryRecord {
    /// Builds a record from its parts.
    ///
    /// Value ranges are not checked here; only the sample counts are.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::SampleCount`] if either sequence does not hold
    /// exactly [`SAMPLE_COUNT`] samples.
    pub fn new(
        message_key: i32,
        sequence_number: i32,
        timestamp: u64,
        normalized_samples: Vec<f32>,
        unnormalized_samples: Vec<f32>,
    ) -> Result<Self, RecordError> {
        check_count("normalized_samples", &normalized_samples)?;
        check_count("unnormalized_samples", &unnormalized_samples)?;

        Ok(Self {
            message_key,
            sequence_number,
            timestamp,
            normalized_samples,
            unnormalized_samples,
        })
    }

    /// Identifier shared by every record of a run.
    #[must_use]
    pub const fn message_key(&self) -> i32 {
        self.message_key
    }

    /// Per-record sequence number.
    #[must_use]
    pub const fn sequence_number(&self) -> i32 {
        self.sequence_number
    }

    /// Creation time in Unix seconds.
    #[must_use]
    pub const fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Samples in [`NORMALIZED_RANGE`].
    #[must_use]
    pub fn normalized_samples(&self) -> &[f32] {
        &self.normalized_samples
    }

    /// Samples in [`UNNORMALIZED_RANGE`].
    #[must_use]
    pub fn unnormalized_samples(&self) -> &[f32] {
        &self.unnormalized_samples
    }

    /// Size of the encoded record in bytes.
    #[must_use]
    pub const fn raw_size(&self) -> usize {
        ENCODED_LEN
    }

    /// Returns true if every sample lies in its declared range.
    #[must_use]
    pub fn samples_in_range(&self) -> bool {
        self.first_out_of_range().is_none()
    }

    /// Returns the first sample outside its declared range, normalized
    /// samples first.
    #[must_use]
    pub fn first_out_of_range(&self) -> Option<OutOfRange> {
        let sequences = [
            (
                "normalized_samples",
                self.normalized_samples.as_slice(),
                NORMALIZED_RANGE,
            ),
            (
                "unnormalized_samples",
                self.unnormalized_samples.as_slice(),
                UNNORMALIZED_RANGE,
            ),
        ];

        sequences.into_iter().find_map(|(field, samples, range)| {
            samples
                .iter()
                .copied()
                .enumerate()
                .find(|(_, s)| !range.contains(s))
                .map(|(index, value)| OutOfRange {
                    field,
                    index,
                    value,
                })
        })
    }

    /// Returns a lightweight description of the record for logging.
    #[must_use]
    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            message_key: self.message_key,
            sequence_number: self.sequence_number,
            timestamp: self.timestamp,
            normalized_count: self.normalized_samples.len(),
            unnormalized_count: self.unnormalized_samples.len(),
            raw_size: self.raw_size(),
        }
    }
}

fn check_count(field: &'static str, samples: &[f32]) -> Result<(), RecordError> {
    if samples.len() == SAMPLE_COUNT {
        Ok(())
    } else {
        Err(RecordError::SampleCount {
            field,
            expected: SAMPLE_COUNT,
            actual: samples.len(),
        })
    }
}

/// A sample found outside its declared range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutOfRange {
    /// Name of the sample sequence.
    pub field: &'static str,
    /// Position within the sequence.
    pub index: usize,
    /// The offending sample.
    pub value: f32,
}

/// Header fields and sizes of a record, without the samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSummary {
    /// Message key.
    pub message_key: i32,
    /// Sequence number.
    pub sequence_number: i32,
    /// Timestamp in Unix seconds.
    pub timestamp: u64,
    /// Number of normalized samples.
    pub normalized_count: usize,
    /// Number of unnormalized samples.
    pub unnormalized_count: usize,
    /// Encoded size in bytes.
    pub raw_size: usize,
}

impl fmt::Display for RecordSummary {
    #[allow(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "key={} seq={} ts={} normalized={} unnormalized={} size={} bytes ({:.2} MB)",
            self.message_key,
            self.sequence_number,
            self.timestamp,
            self.normalized_count,
            self.unnormalized_count,
            self.raw_size,
            self.raw_size as f64 / (1024.0 * 1024.0),
        )
    }
}
