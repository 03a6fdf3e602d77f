//! Tests for configuration validation

use prometheus_dialer_pool::config::{CapacitySettings, CapacitySettingsPatch, EngineConfig};

#[test]
fn test_engine_config_validation() {
    assert!(EngineConfig::default().validate().is_ok());
}

#[test]
fn test_engine_config_invalid_page_size() {
    let invalid = EngineConfig {
        page_size: 0,
        ..EngineConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_engine_config_chunk_size_bounds() {
    let too_big = EngineConfig {
        chunk_size: 51,
        ..EngineConfig::default()
    };
    assert!(too_big.validate().is_err());

    let zero = EngineConfig {
        chunk_size: 0,
        ..EngineConfig::default()
    };
    assert!(zero.validate().is_err());
}

#[test]
fn test_engine_config_from_json() {
    let json = r#"{
        "page_size": 500,
        "max_window_extensions": 4
    }"#;

    let config = EngineConfig::from_json_str(json).unwrap();
    assert_eq!(config.page_size, 500);
    assert_eq!(config.max_window_extensions, 4);
    assert_eq!(config.chunk_size, 50);
}

#[test]
fn test_engine_config_from_json_rejects_invalid() {
    assert!(EngineConfig::from_json_str(r#"{ "extension_step_days": 0 }"#).is_err());
    assert!(EngineConfig::from_json_str("not json").is_err());
}

#[test]
fn test_capacity_settings_window_bounds() {
    let zero = CapacitySettings {
        schedule_window_days: 0,
        ..CapacitySettings::default()
    };
    assert!(zero.validate().is_err());

    let max = CapacitySettings {
        schedule_window_days: 260,
        ..CapacitySettings::default()
    };
    assert!(max.validate().is_ok());
}

#[test]
fn test_capacity_settings_patch_from_partial_json() {
    let patch: CapacitySettingsPatch =
        serde_json::from_str(r#"{ "bloat_threshold": 900 }"#).unwrap();
    let merged = CapacitySettings::default().merge(&patch);
    assert_eq!(merged.bloat_threshold, 900);
    assert_eq!(merged.target_per_day, 600);
}
