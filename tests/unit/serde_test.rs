//! Tests for the serialized shape of result types

use chrono::NaiveDate;
use prometheus_dialer_pool::core::{
    BloatReport, RemovalCandidate, RemovalTier, ScheduleResult, SuggestedAction,
};

#[test]
fn test_bloat_report_is_camel_case() {
    let report = BloatReport {
        due_today: 800,
        target: 600,
        overage: 200,
        is_bloated: true,
        bloat_threshold: 800,
        new_count: 100,
        follow_up_count: 700,
        overdue_count: 50,
    };
    let json = serde_json::to_value(report).unwrap();
    assert_eq!(json["dueToday"], 800);
    assert_eq!(json["isBloated"], true);
    assert_eq!(json["followUpCount"], 700);
}

#[test]
fn test_candidate_tier_and_action_wire_values() {
    let candidate = RemovalCandidate {
        contact_id: "c1".into(),
        tier: RemovalTier::Unreachable,
        reason: "Unreachable: score 60 after 6 calls".into(),
        suggested_action: SuggestedAction::Throttle14Days,
        unreachable_score: Some(60),
        total_calls: 6,
    };
    let json = serde_json::to_value(&candidate).unwrap();
    assert_eq!(json["tier"], 2);
    assert_eq!(json["suggestedAction"], "throttle_14d");
    assert_eq!(json["contactId"], "c1");

    let back: RemovalCandidate = serde_json::from_value(json).unwrap();
    assert_eq!(back, candidate);
}

#[test]
fn test_unknown_tier_rejected() {
    let json = serde_json::json!({
        "contactId": "c1",
        "tier": 7,
        "reason": "",
        "suggestedAction": "pause_12mo",
        "unreachableScore": null,
        "totalCalls": 1
    });
    assert!(serde_json::from_value::<RemovalCandidate>(json).is_err());
}

#[test]
fn test_schedule_result_dates_are_iso() {
    let result = ScheduleResult {
        scheduled: 1,
        distribution: vec![prometheus_dialer_pool::core::DayCount {
            date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            count: 1,
        }],
        ..ScheduleResult::default()
    };
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["distribution"][0]["date"], "2026-10-20");
    assert_eq!(json["failedWrites"], 0);
}
