//! Loading pipeline configuration from disk.

use std::io::Write;

use webway_pipeline::{ConfigError, PipelineConfig};
use webway_producer::Compression;

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"
[producer]
bootstrap_servers = "broker-a:9092,broker-b:9092"
compression = "gzip"
linger_ms = 50

[run]
message_key = 7
messages = 25
topic = "lab-telemetry"
pace_ms = 0
"#
    )
    .expect("write config");

    let config = PipelineConfig::from_file(file.path()).expect("load config");

    assert_eq!(
        config.producer.bootstrap_servers,
        "broker-a:9092,broker-b:9092"
    );
    assert_eq!(config.producer.compression, Compression::Gzip);
    assert_eq!(config.producer.linger_ms, 50);
    assert_eq!(config.producer.batch_size, 1_048_576);
    assert_eq!(config.run.message_key, 7);
    assert_eq!(config.run.messages, 25);
    assert_eq!(config.run.topic, "lab-telemetry");
    assert_eq!(config.run.pace_ms, 0);
    assert_eq!(config.run.flush_timeout_ms, 5_000);
}

#[test]
fn test_written_config_loads_back() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("webway.toml");

    let mut config = PipelineConfig::default();
    config.run.seed = Some(99);
    std::fs::write(&path, config.to_toml()).expect("write config");

    let loaded = PipelineConfig::from_file(&path).expect("load config");
    assert_eq!(loaded, config);
}

#[test]
fn test_invalid_file_reports_parse_error() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "[producer]\ncompression = \"zstd\"").expect("write config");

    let result = PipelineConfig::from_file(file.path());
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}
