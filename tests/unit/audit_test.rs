//! Tests for pool-event records

use prometheus_dialer_pool::core::{build_pause_event, InMemoryPoolEventLog, PoolEventAction};

#[test]
fn test_in_memory_event_log() {
    let mut log = InMemoryPoolEventLog::new(10);

    let event = build_pause_event(
        "user1",
        "contact1",
        "bloat_do_not_contact",
        12,
        serde_json::json!({ "id": "contact1" }),
    );

    log.record(event.clone());
    assert_eq!(log.events().len(), 1);

    let events = log.events();
    assert_eq!(events[0].event_id, event.event_id);
    assert_eq!(events[0].entity_id, "contact1");
    assert_eq!(events[0].action, PoolEventAction::Pause);
}

#[test]
fn test_event_log_overflow() {
    let mut log = InMemoryPoolEventLog::new(2);

    for id in ["c1", "c2", "c3"] {
        log.record(build_pause_event("user1", id, "bloat_not_interested", 6, serde_json::Value::Null));
    }

    let events = log.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].entity_id, "c2"); // First one popped
    assert_eq!(events[1].entity_id, "c3");
}

#[test]
fn test_zero_capacity_log_keeps_nothing() {
    let mut log = InMemoryPoolEventLog::new(0);
    log.record(build_pause_event("user1", "c1", "bloat_do_not_contact", 12, serde_json::Value::Null));
    assert!(log.events().is_empty());
}

#[test]
fn test_build_pause_event() {
    let a = build_pause_event(
        "user1",
        "contact1",
        "bloat_not_interested",
        6,
        serde_json::json!({ "total_calls": 3 }),
    );
    let b = build_pause_event("user1", "contact1", "bloat_not_interested", 6, serde_json::Value::Null);

    assert_eq!(a.user_id, "user1");
    assert_eq!(a.entity_type, "contact");
    assert_eq!(a.reason_code, "bloat_not_interested");
    assert_eq!(a.duration_months, 6);
    assert_eq!(a.snapshot["total_calls"], 3);
    assert!(a.created_at_ms > 0);
    assert_ne!(a.event_id, b.event_id);
}

#[test]
fn test_event_action_serializes_snake_case() {
    let event = build_pause_event("user1", "c1", "bloat_do_not_contact", 12, serde_json::Value::Null);
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["action"], "pause");
}
