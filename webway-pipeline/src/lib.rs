//! Webway Pipeline: drives generate → serialize → publish runs.
//!
//! The [`Orchestrator`] generates a bounded number of records, publishes each
//! through any [`Publisher`](webway_producer::Publisher), paces itself, then
//! flushes and returns [`RunStats`]. [`selftest`] holds the offline checks the
//! `webway --test` mode runs.
//!
//! # Example
//!
//! ```ignore
//! use webway_pipeline::{Orchestrator, PipelineConfig};
//! use webway_producer::BrokerProducer;
//!
//! let config = PipelineConfig::from_file("webway.toml")?;
//! let (mut producer, _reports) = BrokerProducer::new(&config.producer)?;
//!
//! let stats = Orchestrator::new(config.run).run(&mut producer)?;
//! stats.log();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod orchestrator;

pub mod selftest;

pub use config::{ConfigError, PipelineConfig, RunConfig};
pub use orchestrator::{Orchestrator, RunError, RunStats};
