//! Random record generation.
//!
//! The generator owns its random source. Production code seeds it from the
//! clock once at construction; tests use [`RecordGenerator::with_seed`] and
//! [`RecordGenerator::generate_at`] for reproducible output.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::error::RecordError;
use crate::record::{TelemetryRecord, NORMALIZED_RANGE, SAMPLE_COUNT, UNNORMALIZED_RANGE};

/// Produces telemetry records with bounded random samples.
#[derive(Debug, Clone)]
pub struct RecordGenerator {
    rng: ChaCha8Rng,
}

impl RecordGenerator {
    /// Creates a generator seeded from the current time.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Low 64 bits of the nanosecond clock are enough.
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as u64);
        debug!(seed, "Seeding record generator from clock");
        Self::with_seed(seed)
    }

    /// Creates a generator with a fixed seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generates a record stamped with the current wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Allocation`] if a sample buffer cannot be allocated.
    pub fn generate(
        &mut self,
        message_key: i32,
        sequence_number: i32,
    ) -> Result<TelemetryRecord, RecordError> {
        self.generate_at(message_key, sequence_number, unix_seconds())
    }

    /// Generates a record with an explicit timestamp.
    ///
    /// Normalized samples are drawn first, then unnormalized samples, so two
    /// generators with the same seed produce identical records.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Allocation`] if a sample buffer cannot be allocated.
    pub fn generate_at(
        &mut self,
        message_key: i32,
        sequence_number: i32,
        timestamp: u64,
    ) -> Result<TelemetryRecord, RecordError> {
        let mut normalized = alloc_samples("normalized_samples")?;
        normalized.extend((0..SAMPLE_COUNT).map(|_| self.rng.gen_range(NORMALIZED_RANGE)));

        let mut unnormalized = alloc_samples("unnormalized_samples")?;
        unnormalized.extend((0..SAMPLE_COUNT).map(|_| self.rng.gen_range(UNNORMALIZED_RANGE)));

        TelemetryRecord::new(
            message_key,
            sequence_number,
            timestamp,
            normalized,
            unnormalized,
        )
    }
}

impl Default for RecordGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn alloc_samples(buffer: &'static str) -> Result<Vec<f32>, RecordError> {
    let mut samples = Vec::new();
    samples
        .try_reserve_exact(SAMPLE_COUNT)
        .map_err(|_| RecordError::Allocation {
            buffer,
            bytes: SAMPLE_COUNT * std::mem::size_of::<f32>(),
        })?;
    Ok(samples)
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}
