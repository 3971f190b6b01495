//! Webway telemetry producer binary.
//!
//! Streams generated telemetry records to a Kafka-protocol broker, or runs the
//! offline self-checks.
//!
//! # Streaming mode
//!
//! ```bash
//! webway --bootstrap-servers localhost:19092 --topic automation-data --messages 10
//! ```
//!
//! # Self-test mode
//!
//! ```bash
//! webway --test
//! ```
//!
//! Settings can also come from a TOML file (`--config webway.toml`); flags
//! override file values.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use std::path::PathBuf;
use std::thread;

use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use webway_pipeline::{selftest, Orchestrator, PipelineConfig};
use webway_producer::{BrokerProducer, DeliveryReceiver};

/// Webway telemetry producer.
#[derive(Parser, Debug)]
#[command(name = "webway")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run the offline self-checks instead of streaming.
    #[arg(long)]
    test: bool,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Broker bootstrap servers (comma-separated `host:port`).
    #[arg(long)]
    bootstrap_servers: Option<String>,

    /// Destination topic.
    #[arg(long)]
    topic: Option<String>,

    /// Number of records to publish.
    #[arg(long)]
    messages: Option<u32>,

    /// Fixed generator seed for reproducible payloads.
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: Level,
}

impl Args {
    fn pipeline_config(&self) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(servers) = &self.bootstrap_servers {
            config.producer.bootstrap_servers.clone_from(servers);
        }
        if let Some(topic) = &self.topic {
            config.run.topic.clone_from(topic);
        }
        if let Some(messages) = self.messages {
            config.run.messages = messages;
        }
        if self.seed.is_some() {
            config.run.seed = self.seed;
        }
        Ok(config)
    }
}

/// Logs every delivery report until the producer goes away.
///
/// Returns the number of delivered and failed records.
fn spawn_report_logger(mut reports: DeliveryReceiver) -> thread::JoinHandle<(u64, u64)> {
    thread::spawn(move || {
        let mut delivered = 0u64;
        let mut failed = 0u64;
        while let Some(report) = reports.blocking_recv() {
            if report.is_delivered() {
                delivered += 1;
                info!(%report, "Record delivered");
            } else {
                failed += 1;
                warn!(%report, "Record delivery failed");
            }
        }
        (delivered, failed)
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Log to stderr so stdout stays free for callers.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if args.test {
        info!("Running self-checks");
        selftest::run()?;
        return Ok(());
    }

    let config = args.pipeline_config()?;
    info!(
        bootstrap_servers = %config.producer.bootstrap_servers,
        topic = %config.run.topic,
        messages = config.run.messages,
        "Starting webway producer"
    );
    info!(topic = %config.run.topic, "Topic assumed to exist or be auto-created");

    let (mut producer, reports) = BrokerProducer::new(&config.producer)?;
    let logger = spawn_report_logger(reports);

    let mut orchestrator = Orchestrator::new(config.run);
    let result = orchestrator.run(&mut producer);

    // Closing drops the report channel, which ends the logger thread.
    producer.close();
    let (delivered, failed) = logger
        .join()
        .map_err(|_| "delivery report thread panicked")?;

    let stats = result?;
    stats.log();
    info!(delivered, failed, "Delivery summary");

    if stats.unacknowledged > 0 {
        warn!(
            unacknowledged = stats.unacknowledged,
            "Some records were not acknowledged before the flush deadline"
        );
    }
    Ok(())
}
