//! Webway Record: the fixed-shape telemetry record and its wire form.
//!
//! A [`TelemetryRecord`] carries two blocks of [`SAMPLE_COUNT`] samples plus a
//! small header. Records are produced by a [`RecordGenerator`] and packed into
//! exactly [`ENCODED_LEN`] bytes by [`encode`]; [`decode`] reverses it.
//!
//! # Wire layout
//!
//! All fields are little-endian, with no framing, version tag, or checksum:
//!
//! ```text
//! [0..4]     message_key: i32
//! [4..8]     sequence_number: i32
//! [8..16]    timestamp: u64              - Unix seconds
//! [16..]     normalized_samples: [f32; N]
//! [16+4N..]  unnormalized_samples: [f32; N]
//! ```
//!
//! # Example
//!
//! ```ignore
//! use webway_record::{decode, encode, RecordGenerator};
//!
//! let mut generator = RecordGenerator::with_seed(7);
//! let record = generator.generate_at(12345, 1, 1_700_000_000)?;
//! let bytes = encode(&record)?;
//! assert_eq!(decode(&bytes)?, record);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod codec;
mod error;
mod generator;
mod record;

pub use codec::{decode, encode, ENCODED_LEN};
pub use error::{RecordError, SerializationError};
pub use generator::RecordGenerator;
pub use record::{
    OutOfRange, RecordSummary, TelemetryRecord, NORMALIZED_RANGE, SAMPLE_COUNT,
    UNNORMALIZED_RANGE,
};
