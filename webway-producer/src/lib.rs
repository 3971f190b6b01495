//! Webway Producer: publishes telemetry records to a Kafka-protocol broker.
//!
//! [`BrokerProducer`] serializes each record, enqueues it on the client's
//! send queue without waiting, and reports the broker's acknowledgment later
//! through a [`DeliveryReceiver`]. [`BrokerProducer::flush`] is the only
//! blocking call and always returns by its deadline.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use webway_producer::{BrokerProducer, ProducerConfig, Publisher};
//! use webway_record::RecordGenerator;
//!
//! let config = ProducerConfig::default();
//! let (mut producer, mut reports) = BrokerProducer::new(&config)?;
//!
//! let record = RecordGenerator::new().generate(12345, 0)?;
//! producer.publish(&record, "automation-data")?;
//!
//! let outcome = producer.flush(Duration::from_secs(5))?;
//! assert!(outcome.is_complete());
//! for report in reports.drain() {
//!     println!("{report}");
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod delivery;
mod error;
mod producer;
mod publisher;

pub use config::{Compression, ProducerConfig, DEFAULT_MESSAGE_MAX_BYTES};
pub use delivery::{
    delivery_channel, DeliveryOutcome, DeliveryReceiver, DeliveryReport, DeliverySender,
};
pub use error::ProducerError;
pub use producer::{message_key, BrokerProducer, ProducerState};
pub use publisher::{FlushOutcome, Publisher};
