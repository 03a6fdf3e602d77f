//! Tests for error types

use prometheus_dialer_pool::core::DialerError;

#[test]
fn test_store_error() {
    let err = DialerError::Store("connection reset".to_string());
    assert_eq!(format!("{}", err), "store error: connection reset");
}

#[test]
fn test_invalid_settings_error() {
    let err = DialerError::InvalidSettings("target_per_day must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid capacity settings: target_per_day must be greater than 0"
    );
}

#[test]
fn test_invalid_config_error() {
    let err = DialerError::InvalidConfig("page_size must be greater than 0".to_string());
    assert_eq!(format!("{}", err), "invalid configuration: page_size must be greater than 0");
}

#[test]
fn test_contact_not_found_error() {
    let err = DialerError::ContactNotFound("c42".to_string());
    assert_eq!(format!("{}", err), "contact not found: c42");
}

#[test]
fn test_converts_into_anyhow() {
    let err: anyhow::Error = DialerError::Store("boom".to_string()).into();
    assert!(err.downcast_ref::<DialerError>().is_some());
}
