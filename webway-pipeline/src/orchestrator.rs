//! The bounded generate → serialize → publish → pace loop.

use std::time::{Duration, Instant};

use hdrhistogram::Histogram;
use thiserror::Error;
use tracing::{debug, info, warn};
use webway_producer::{ProducerError, Publisher};
use webway_record::{encode, RecordGenerator};

use crate::config::RunConfig;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Errors that abort a run.
///
/// Failures of individual records are counted in [`RunStats`] instead.
#[derive(Debug, Error)]
pub enum RunError {
    /// The configured message count does not fit the sequence number type.
    #[error("message count {0} exceeds the sequence number range")]
    TooManyMessages(u32),

    /// The latency histogram could not be created.
    #[error("failed to create latency histogram: {0}")]
    Histogram(#[from] hdrhistogram::CreationError),

    /// The final flush could not run.
    #[error("flush failed: {0}")]
    Flush(#[source] ProducerError),
}

/// Aggregate results of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    /// Records the loop tried to produce.
    pub messages_attempted: u64,
    /// Records that were generated and serialized.
    pub messages_encoded: u64,
    /// Records accepted onto the send queue.
    pub messages_enqueued: u64,
    /// Records dropped by generation, serialization, or enqueue failures.
    pub messages_failed: u64,
    /// Serialized bytes of every record that was encoded.
    pub total_bytes: u64,
    /// Wall time from the first record through the final flush.
    pub elapsed: Duration,
    /// Records still unacknowledged when the flush returned.
    pub unacknowledged: usize,
    /// Publish call latency p50 (ms).
    pub publish_latency_p50: f64,
    /// Publish call latency p99 (ms).
    pub publish_latency_p99: f64,
    /// Publish call latency max (ms).
    pub publish_latency_max: f64,
}

impl RunStats {
    /// Mean encoded size of the records that were counted.
    #[must_use]
    pub fn average_message_bytes(&self) -> u64 {
        if self.messages_encoded == 0 {
            0
        } else {
            self.total_bytes / self.messages_encoded
        }
    }

    /// Serialized megabytes per second over the whole run.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn throughput_mb_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total_bytes as f64 / BYTES_PER_MB / secs
        } else {
            0.0
        }
    }

    /// Emits the run summary.
    #[allow(clippy::cast_precision_loss)]
    pub fn log(&self) {
        info!(
            messages_attempted = self.messages_attempted,
            messages_enqueued = self.messages_enqueued,
            messages_failed = self.messages_failed,
            total_bytes = self.total_bytes,
            total_mb = self.total_bytes as f64 / BYTES_PER_MB,
            average_message_bytes = self.average_message_bytes(),
            elapsed_secs = self.elapsed.as_secs_f64(),
            throughput_mb_s = self.throughput_mb_per_sec(),
            publish_p50_ms = self.publish_latency_p50,
            publish_p99_ms = self.publish_latency_p99,
            publish_max_ms = self.publish_latency_max,
            unacknowledged = self.unacknowledged,
            "Run summary"
        );
    }
}

/// Drives a bounded run of record generation and publication.
pub struct Orchestrator {
    config: RunConfig,
    generator: RecordGenerator,
}

impl Orchestrator {
    /// Creates an orchestrator; the generator is seeded from `config.seed`
    /// when set.
    #[must_use]
    pub fn new(config: RunConfig) -> Self {
        let generator = config
            .seed
            .map_or_else(RecordGenerator::new, RecordGenerator::with_seed);
        Self { config, generator }
    }

    /// Returns the run configuration.
    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs the loop against a publisher, then flushes it.
    ///
    /// A record that fails to generate, encode, or enqueue is logged, counted,
    /// and dropped; the loop moves on to the next sequence number.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is unusable or the final flush
    /// cannot run.
    #[allow(clippy::cast_precision_loss)]
    #[allow(clippy::cast_possible_truncation)] // Per-call latency in µs fits u64.
    pub fn run<P: Publisher>(&mut self, publisher: &mut P) -> Result<RunStats, RunError> {
        let messages = i32::try_from(self.config.messages)
            .map_err(|_| RunError::TooManyMessages(self.config.messages))?;
        let mut publish_latencies = Histogram::<u64>::new(3)?;

        let topic = self.config.topic.as_str();
        let message_key = self.config.message_key;
        let pace = self.config.pace();

        info!(
            topic,
            message_key,
            messages,
            pace_ms = self.config.pace_ms,
            "Starting run"
        );

        let start = Instant::now();
        let mut encoded = 0u64;
        let mut enqueued = 0u64;
        let mut failed = 0u64;
        let mut total_bytes = 0u64;

        for sequence_number in 0..messages {
            let record = match self.generator.generate(message_key, sequence_number) {
                Ok(record) => record,
                Err(e) => {
                    warn!(sequence_number, error = %e, "Failed to generate record");
                    failed += 1;
                    continue;
                }
            };

            match encode(&record) {
                Ok(bytes) => {
                    encoded += 1;
                    total_bytes += bytes.len() as u64;
                }
                Err(e) => {
                    warn!(sequence_number, error = %e, "Failed to serialize record");
                    failed += 1;
                    continue;
                }
            }
            debug!(summary = %record.summary(), "Generated record");

            let publish_start = Instant::now();
            let result = publisher.publish(&record, topic);
            publish_latencies.saturating_record(publish_start.elapsed().as_micros() as u64);

            match result {
                Ok(()) => enqueued += 1,
                Err(e) => {
                    warn!(
                        sequence_number,
                        error = %e,
                        code = e.error_code(),
                        transient = e.is_transient(),
                        "Failed to publish record"
                    );
                    failed += 1;
                }
            }

            if !pace.is_zero() {
                std::thread::sleep(pace);
            }
        }

        info!(
            timeout_ms = self.config.flush_timeout_ms,
            "Flushing pending records"
        );
        let outcome = publisher
            .flush(self.config.flush_timeout())
            .map_err(RunError::Flush)?;
        let elapsed = start.elapsed();

        Ok(RunStats {
            messages_attempted: u64::from(self.config.messages),
            messages_encoded: encoded,
            messages_enqueued: enqueued,
            messages_failed: failed,
            total_bytes,
            elapsed,
            unacknowledged: outcome.unacknowledged,
            publish_latency_p50: publish_latencies.value_at_percentile(50.0) as f64 / 1000.0,
            publish_latency_p99: publish_latencies.value_at_percentile(99.0) as f64 / 1000.0,
            publish_latency_max: publish_latencies.max() as f64 / 1000.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use webway_record::ENCODED_LEN;

    #[test]
    fn test_orchestrator_uses_config() {
        let config = RunConfig {
            topic: "t".to_string(),
            seed: Some(1),
            ..RunConfig::default()
        };
        let orchestrator = Orchestrator::new(config.clone());
        assert_eq!(orchestrator.config(), &config);
    }

    #[test]
    fn test_stats_derived_values() {
        let stats = RunStats {
            messages_attempted: 4,
            messages_encoded: 4,
            messages_enqueued: 4,
            messages_failed: 0,
            total_bytes: 4 * ENCODED_LEN as u64,
            elapsed: Duration::from_secs(2),
            unacknowledged: 0,
            publish_latency_p50: 0.0,
            publish_latency_p99: 0.0,
            publish_latency_max: 0.0,
        };

        assert_eq!(stats.average_message_bytes(), ENCODED_LEN as u64);
        let expected = 4.0 * ENCODED_LEN as f64 / BYTES_PER_MB / 2.0;
        assert!((stats.throughput_mb_per_sec() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_stats_empty_run() {
        let stats = RunStats {
            messages_attempted: 0,
            messages_encoded: 0,
            messages_enqueued: 0,
            messages_failed: 0,
            total_bytes: 0,
            elapsed: Duration::ZERO,
            unacknowledged: 0,
            publish_latency_p50: 0.0,
            publish_latency_p99: 0.0,
            publish_latency_max: 0.0,
        };

        assert_eq!(stats.average_message_bytes(), 0);
        assert!(stats.throughput_mb_per_sec().abs() < f64::EPSILON);
    }
}
