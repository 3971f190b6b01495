//! Broker producer backed by librdkafka.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use rdkafka::producer::{BaseRecord, DeliveryResult, Producer, ProducerContext, ThreadedProducer};
use rdkafka::{ClientContext, Message};
use tracing::{debug, info, warn};
use webway_record::{encode, TelemetryRecord};

use crate::config::ProducerConfig;
use crate::delivery::{
    delivery_channel, DeliveryOutcome, DeliveryReceiver, DeliveryReport, DeliverySender,
};
use crate::error::ProducerError;
use crate::publisher::{FlushOutcome, Publisher};

/// Lifecycle of a [`BrokerProducer`].
///
/// Construction is atomic, so a producer is never observed unconfigured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerState {
    /// Accepting records.
    Running,
    /// Inside [`Publisher::flush`].
    Flushing,
    /// Client released; terminal.
    Closed,
}

const FLUSH_RECHECK_INTERVAL: Duration = Duration::from_millis(1);

/// Returns the message key for a record: its sequence number in decimal.
#[must_use]
pub fn message_key(sequence_number: i32) -> String {
    sequence_number.to_string()
}

/// Client context that forwards delivery callbacks onto the report channel.
///
/// `pending` counts records enqueued but not yet reported. Unlike the
/// client's queue length, it excludes internal events.
struct DeliveryContext {
    reports: DeliverySender,
    pending: Arc<AtomicUsize>,
}

impl ClientContext for DeliveryContext {}

impl ProducerContext for DeliveryContext {
    type DeliveryOpaque = Box<i32>;

    fn delivery(&self, result: &DeliveryResult<'_>, sequence_number: Self::DeliveryOpaque) {
        let report = match result {
            Ok(message) => DeliveryReport {
                sequence_number: *sequence_number,
                topic: message.topic().to_string(),
                outcome: DeliveryOutcome::Delivered {
                    partition: message.partition(),
                    offset: message.offset(),
                },
            },
            Err((err, message)) => DeliveryReport {
                sequence_number: *sequence_number,
                topic: message.topic().to_string(),
                outcome: DeliveryOutcome::Failed {
                    code: err.rdkafka_error_code().map_or(-1, |c| c as i32),
                    message: err.to_string(),
                },
            },
        };
        debug!(%report, "Delivery report");
        self.reports.send(report);
        self.pending.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Publishes telemetry records to a Kafka-protocol broker.
///
/// The client connects lazily and runs its own I/O and polling threads.
/// Acknowledgments are delivered through the [`DeliveryReceiver`] returned by
/// [`BrokerProducer::new`].
pub struct BrokerProducer {
    producer: Option<ThreadedProducer<DeliveryContext>>,
    state: ProducerState,
    message_max_bytes: usize,
    pending: Arc<AtomicUsize>,
}

impl BrokerProducer {
    /// Creates a producer and the channel its delivery reports arrive on.
    ///
    /// # Errors
    ///
    /// Returns [`ProducerError::InvalidConfig`] if local validation fails, or
    /// [`ProducerError::Configuration`] if the client rejects a setting. No
    /// producer exists in either case.
    pub fn new(config: &ProducerConfig) -> Result<(Self, DeliveryReceiver), ProducerError> {
        config.validate()?;

        let (reports, receiver) = delivery_channel();
        let pending = Arc::new(AtomicUsize::new(0));
        let producer: ThreadedProducer<DeliveryContext> = config
            .to_client_config()
            .create_with_context(DeliveryContext {
                reports,
                pending: Arc::clone(&pending),
            })
            .map_err(ProducerError::Configuration)?;

        info!(
            bootstrap_servers = %config.bootstrap_servers,
            compression = %config.compression,
            message_max_bytes = config.message_max_bytes,
            batch_size = config.batch_size,
            linger_ms = config.linger_ms,
            "Producer created"
        );

        Ok((
            Self {
                producer: Some(producer),
                state: ProducerState::Running,
                message_max_bytes: config.message_max_bytes,
                pending,
            },
            receiver,
        ))
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ProducerState {
        self.state
    }

    /// Returns how many records are still waiting for a delivery report.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        if self.producer.is_some() {
            self.pending.load(Ordering::Acquire)
        } else {
            0
        }
    }

    /// Releases the client. Later calls are no-ops.
    ///
    /// Records still in flight are abandoned; call [`Publisher::flush`] first
    /// to wait for them. The delivery channel closes once the client is gone.
    pub fn close(&mut self) {
        if let Some(producer) = self.producer.take() {
            let abandoned = self.pending.load(Ordering::Acquire);
            if abandoned > 0 {
                warn!(abandoned, "Closing producer with unacknowledged records");
            }
            drop(producer);
            info!("Producer closed");
        }
        self.state = ProducerState::Closed;
    }
}

impl Publisher for BrokerProducer {
    fn publish(&self, record: &TelemetryRecord, topic: &str) -> Result<(), ProducerError> {
        let producer = self.producer.as_ref().ok_or(ProducerError::Closed)?;

        let payload = encode(record)?;
        let size = payload.len();

        let sequence_number = record.sequence_number();
        let key = message_key(sequence_number);
        let message: BaseRecord<'_, str, [u8], Box<i32>> =
            BaseRecord::with_opaque_to(topic, Box::new(sequence_number))
                .key(key.as_str())
                .payload(payload.as_ref());

        // The callback may run before `send` returns.
        self.pending.fetch_add(1, Ordering::AcqRel);
        producer.send(message).map_err(|(err, _message)| {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            warn!(sequence_number, topic, error = %err, "Failed to enqueue record");
            ProducerError::from_enqueue(&err, size, self.message_max_bytes)
        })?;

        debug!(sequence_number, topic, bytes = size, "Record queued for delivery");
        Ok(())
    }

    fn flush(&mut self, timeout: Duration) -> Result<FlushOutcome, ProducerError> {
        let Some(producer) = self.producer.as_ref() else {
            return Err(ProducerError::Closed);
        };

        self.state = ProducerState::Flushing;
        let deadline = Instant::now() + timeout;
        let unacknowledged = loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if let Err(err) = producer.flush(remaining) {
                debug!(error = %err, ?timeout, "Flush deadline reached");
            }
            // The poll thread may still be running the last callbacks.
            let pending = self.pending.load(Ordering::Acquire);
            if pending == 0 || remaining.is_zero() {
                break pending;
            }
            thread::sleep(remaining.min(FLUSH_RECHECK_INTERVAL));
        };
        self.state = ProducerState::Running;

        if unacknowledged > 0 {
            warn!(unacknowledged, ?timeout, "Flush returned with records unacknowledged");
        } else {
            debug!("All records acknowledged");
        }
        Ok(FlushOutcome { unacknowledged })
    }
}

impl Drop for BrokerProducer {
    fn drop(&mut self) {
        self.close();
    }
}
