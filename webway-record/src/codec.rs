//! Fixed-layout binary encoding of telemetry records.

use bytes::{Buf, BufMut, Bytes};

use crate::error::SerializationError;
use crate::record::{TelemetryRecord, SAMPLE_COUNT};

/// Header size in bytes (`message_key` + `sequence_number` + `timestamp`).
const HEADER_LEN: usize = 4 + 4 + 8;

/// Size of one encoded record in bytes.
pub const ENCODED_LEN: usize = HEADER_LEN + 2 * SAMPLE_COUNT * SAMPLE_WIDTH;

const SAMPLE_WIDTH: usize = std::mem::size_of::<f32>();

/// Encodes a record into exactly [`ENCODED_LEN`] little-endian bytes.
///
/// # Errors
///
/// Returns [`SerializationError::Allocation`] if the output buffer cannot be
/// allocated.
pub fn encode(record: &TelemetryRecord) -> Result<Bytes, SerializationError> {
    let mut buf: Vec<u8> = Vec::new();
    buf.try_reserve_exact(ENCODED_LEN)
        .map_err(|_| SerializationError::Allocation { bytes: ENCODED_LEN })?;

    buf.put_i32_le(record.message_key());
    buf.put_i32_le(record.sequence_number());
    buf.put_u64_le(record.timestamp());
    for sample in record.normalized_samples() {
        buf.put_f32_le(*sample);
    }
    for sample in record.unnormalized_samples() {
        buf.put_f32_le(*sample);
    }

    debug_assert_eq!(buf.len(), ENCODED_LEN);
    Ok(Bytes::from(buf))
}

/// Decodes a record from the first [`ENCODED_LEN`] bytes of `bytes`.
///
/// Bytes past the record are ignored.
///
/// # Errors
///
/// Returns [`SerializationError::TooShort`] if fewer than [`ENCODED_LEN`]
/// bytes are supplied, or [`SerializationError::Allocation`] if the sample
/// buffers cannot be allocated.
pub fn decode(bytes: &[u8]) -> Result<TelemetryRecord, SerializationError> {
    if bytes.len() < ENCODED_LEN {
        return Err(SerializationError::TooShort {
            actual: bytes.len(),
            required: ENCODED_LEN,
        });
    }

    let mut cursor = &bytes[..ENCODED_LEN];

    let message_key = cursor.get_i32_le();
    let sequence_number = cursor.get_i32_le();
    let timestamp = cursor.get_u64_le();
    let normalized = read_samples(&mut cursor)?;
    let unnormalized = read_samples(&mut cursor)?;

    Ok(TelemetryRecord::new(
        message_key,
        sequence_number,
        timestamp,
        normalized,
        unnormalized,
    )?)
}

fn read_samples(cursor: &mut &[u8]) -> Result<Vec<f32>, SerializationError> {
    let mut samples = Vec::new();
    samples
        .try_reserve_exact(SAMPLE_COUNT)
        .map_err(|_| SerializationError::Allocation {
            bytes: SAMPLE_COUNT * SAMPLE_WIDTH,
        })?;
    for _ in 0..SAMPLE_COUNT {
        samples.push(cursor.get_f32_le());
    }
    Ok(samples)
}
