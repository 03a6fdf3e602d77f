//! Tests for builder modules

use std::sync::Arc;

use chrono::NaiveDate;
use prometheus_dialer_pool::builders::EngineBuilder;
use prometheus_dialer_pool::config::EngineConfig;
use prometheus_dialer_pool::core::DialerError;
use prometheus_dialer_pool::infra::InMemoryStore;
use prometheus_dialer_pool::util::FixedClock;

#[test]
fn test_engine_builder_defaults() {
    let builder = EngineBuilder::new(Arc::new(InMemoryStore::new()));
    assert_eq!(builder.config(), &EngineConfig::default());
}

#[test]
fn test_engine_builder_applies_config_and_clock() {
    let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let config = EngineConfig {
        page_size: 250,
        ..EngineConfig::default()
    };
    let engine = EngineBuilder::new(Arc::new(InMemoryStore::new()))
        .with_config(config)
        .with_clock(FixedClock(today))
        .build()
        .unwrap();

    assert_eq!(engine.config().page_size, 250);
    assert_eq!(engine.today(), today);
}

#[test]
fn test_engine_builder_rejects_invalid_config() {
    let config = EngineConfig {
        chunk_size: 0,
        ..EngineConfig::default()
    };
    let result = EngineBuilder::new(Arc::new(InMemoryStore::new()))
        .with_config(config)
        .build();
    assert!(matches!(result, Err(DialerError::InvalidConfig(_))));
}
