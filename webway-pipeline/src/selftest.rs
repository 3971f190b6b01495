//! Offline self-checks run by `webway --test`.
//!
//! Generates one record and verifies its header, its sample ranges, and that
//! it survives the wire codec unchanged. No broker is contacted.

use thiserror::Error;
use tracing::info;
use webway_record::{
    decode, encode, OutOfRange, RecordError, RecordGenerator, SerializationError,
    TelemetryRecord, ENCODED_LEN,
};

const MESSAGE_KEY: i32 = 12345;
const SEQUENCE_NUMBER: i32 = 1;

/// A failed self-check.
#[derive(Debug, Error)]
pub enum SelfTestError {
    /// The record could not be generated.
    #[error("record creation failed: {0}")]
    Generate(#[from] RecordError),

    /// The record could not be encoded or decoded.
    #[error("serialization failed: {0}")]
    Serialization(#[from] SerializationError),

    /// A field does not hold the expected value.
    #[error("{field} mismatch: expected {expected}, got {actual}")]
    FieldMismatch {
        /// Field name.
        field: &'static str,
        /// Expected value.
        expected: String,
        /// Observed value.
        actual: String,
    },

    /// A sample lies outside its declared range.
    #[error("{field}[{index}] = {value} out of range")]
    OutOfRange {
        /// Sample sequence name.
        field: &'static str,
        /// Position of the first bad sample.
        index: usize,
        /// The sample.
        value: f32,
    },
}

/// Runs every check with a clock-seeded generator.
///
/// # Errors
///
/// Returns the first failed check.
pub fn run() -> Result<(), SelfTestError> {
    run_with(&mut RecordGenerator::new())
}

/// Runs every check with the supplied generator.
///
/// # Errors
///
/// Returns the first failed check.
pub fn run_with(generator: &mut RecordGenerator) -> Result<(), SelfTestError> {
    info!("Check 1: record creation");
    let record = generator.generate(MESSAGE_KEY, SEQUENCE_NUMBER)?;
    expect_eq("message_key", MESSAGE_KEY, record.message_key())?;
    expect_eq("sequence_number", SEQUENCE_NUMBER, record.sequence_number())?;

    info!("Check 2: sample ranges");
    check_ranges(&record)?;

    info!("Check 3: serialization");
    let bytes = encode(&record)?;
    expect_eq("encoded length", ENCODED_LEN, bytes.len())?;
    let decoded = decode(&bytes)?;
    expect_eq("message_key", record.message_key(), decoded.message_key())?;
    expect_eq(
        "sequence_number",
        record.sequence_number(),
        decoded.sequence_number(),
    )?;
    expect_eq("timestamp", record.timestamp(), decoded.timestamp())?;
    if decoded != record {
        return Err(SelfTestError::FieldMismatch {
            field: "samples",
            expected: "identical after decode".to_string(),
            actual: "different".to_string(),
        });
    }

    info!("All self-checks passed");
    Ok(())
}

/// Checks that every sample lies in its declared range.
///
/// # Errors
///
/// Returns [`SelfTestError::OutOfRange`] for the first offending sample.
pub fn check_ranges(record: &TelemetryRecord) -> Result<(), SelfTestError> {
    match record.first_out_of_range() {
        Some(OutOfRange {
            field,
            index,
            value,
        }) => Err(SelfTestError::OutOfRange {
            field,
            index,
            value,
        }),
        None => Ok(()),
    }
}

fn expect_eq<T>(field: &'static str, expected: T, actual: T) -> Result<(), SelfTestError>
where
    T: PartialEq + ToString,
{
    if expected == actual {
        Ok(())
    } else {
        Err(SelfTestError::FieldMismatch {
            field,
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}
