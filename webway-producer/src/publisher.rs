//! The publishing seam between the run loop and a broker client.

use std::time::Duration;

use webway_record::TelemetryRecord;

use crate::error::ProducerError;

/// What [`Publisher::flush`] observed at its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushOutcome {
    /// Records still waiting for an acknowledgment.
    pub unacknowledged: usize,
}

impl FlushOutcome {
    /// Returns true if every enqueued record was acknowledged.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.unacknowledged == 0
    }
}

/// Trait for publishing records.
///
/// This abstraction allows the same run loop to drive:
/// - A real broker through [`BrokerProducer`](crate::BrokerProducer)
/// - An in-memory sink in tests
pub trait Publisher {
    /// Serializes and enqueues a record without waiting for the broker.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized or enqueued.
    fn publish(&self, record: &TelemetryRecord, topic: &str) -> Result<(), ProducerError>;

    /// Waits up to `timeout` for all enqueued records to be acknowledged.
    ///
    /// # Errors
    ///
    /// Returns an error only if the publisher can no longer flush.
    fn flush(&mut self, timeout: Duration) -> Result<FlushOutcome, ProducerError>;
}
