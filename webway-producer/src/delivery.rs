//! Delivery reports.
//!
//! The client acknowledges each record from its own background thread. Reports
//! are forwarded over an unbounded channel so the hook never blocks and never
//! re-enters the producer.

use std::fmt;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

/// Result of one record's delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The broker appended the record.
    Delivered {
        /// Partition the record landed in.
        partition: i32,
        /// Offset assigned by the broker.
        offset: i64,
    },
    /// The broker rejected the record or it timed out locally.
    Failed {
        /// Client error code.
        code: i32,
        /// Error message.
        message: String,
    },
}

/// One asynchronous acknowledgment from the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Sequence number of the record.
    pub sequence_number: i32,
    /// Topic the record was sent to.
    pub topic: String,
    /// What happened to it.
    pub outcome: DeliveryOutcome,
}

impl DeliveryReport {
    /// Returns true if the record was appended.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self.outcome, DeliveryOutcome::Delivered { .. })
    }
}

impl fmt::Display for DeliveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            DeliveryOutcome::Delivered { partition, offset } => write!(
                f,
                "record {} delivered to {}[{partition}] at offset {offset}",
                self.sequence_number, self.topic
            ),
            DeliveryOutcome::Failed { code, message } => write!(
                f,
                "record {} to {} failed ({code}): {message}",
                self.sequence_number, self.topic
            ),
        }
    }
}

/// Creates a connected sender/receiver pair for delivery reports.
#[must_use]
pub fn delivery_channel() -> (DeliverySender, DeliveryReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (DeliverySender { tx }, DeliveryReceiver { rx })
}

/// Sending half, held by whoever receives acknowledgments from the broker.
#[derive(Debug, Clone)]
pub struct DeliverySender {
    tx: mpsc::UnboundedSender<DeliveryReport>,
}

impl DeliverySender {
    /// Forwards a report without blocking.
    ///
    /// Reports are dropped once the receiver is gone.
    pub fn send(&self, report: DeliveryReport) {
        let _ = self.tx.send(report);
    }
}

/// Receiving half handed to the producer's owner.
///
/// The channel closes when the producer is dropped or closed.
#[derive(Debug)]
pub struct DeliveryReceiver {
    rx: mpsc::UnboundedReceiver<DeliveryReport>,
}

impl DeliveryReceiver {
    /// Returns the next report if one is ready.
    pub fn try_recv(&mut self) -> Option<DeliveryReport> {
        match self.rx.try_recv() {
            Ok(report) => Some(report),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Blocks the current thread until the next report arrives.
    ///
    /// Must not be called from inside an async runtime.
    pub fn blocking_recv(&mut self) -> Option<DeliveryReport> {
        self.rx.blocking_recv()
    }

    /// Takes every report that is ready now.
    pub fn drain(&mut self) -> Vec<DeliveryReport> {
        let mut reports = Vec::new();
        while let Some(report) = self.try_recv() {
            reports.push(report);
        }
        reports
    }
}
