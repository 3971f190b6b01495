//! End-to-end run against a live broker.
//!
//! Ignored by default. Start a broker (Redpanda or Kafka) with topic
//! auto-creation and run:
//!
//! ```bash
//! WEBWAY_BOOTSTRAP_SERVERS=localhost:19092 cargo test -p webway-pipeline --test broker -- --ignored
//! ```

use webway_pipeline::{Orchestrator, RunConfig};
use webway_producer::{BrokerProducer, ProducerConfig};
use webway_record::ENCODED_LEN;

fn bootstrap_servers() -> String {
    std::env::var("WEBWAY_BOOTSTRAP_SERVERS").unwrap_or_else(|_| "localhost:19092".to_string())
}

#[test]
#[ignore = "requires a running broker"]
fn test_ten_records_delivered_by_broker() {
    let config = ProducerConfig::new(bootstrap_servers());
    let (mut producer, mut reports) = BrokerProducer::new(&config).expect("create producer");

    let mut orchestrator = Orchestrator::new(RunConfig {
        messages: 10,
        topic: "automation-data".to_string(),
        pace_ms: 0,
        flush_timeout_ms: 5_000,
        seed: Some(42),
        ..RunConfig::default()
    });
    let stats = orchestrator.run(&mut producer).expect("run");

    assert_eq!(stats.messages_enqueued, 10);
    assert_eq!(stats.total_bytes, 10 * ENCODED_LEN as u64);
    assert_eq!(stats.unacknowledged, 0);

    let reports = reports.drain();
    assert_eq!(reports.len(), 10);
    for report in &reports {
        assert!(report.is_delivered(), "{report}");
    }

    let mut sequence_numbers: Vec<i32> = reports.iter().map(|r| r.sequence_number).collect();
    sequence_numbers.sort_unstable();
    assert_eq!(sequence_numbers, (0..10).collect::<Vec<_>>());

    producer.close();
}
