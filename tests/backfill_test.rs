//! Integration tests for unscheduled counts, backfill preview and backfill

mod common;

use std::sync::Arc;

use common::*;
use prometheus_dialer_pool::core::{DayCount, UnscheduledCounts};
use prometheus_dialer_pool::infra::InMemoryStore;

fn seed(store: &InMemoryStore) {
    for id in ids("n", 3) {
        store.insert_contact(contact(&id, 0));
    }
    store.insert_contact(contact("f000", 1));
    let mut no_phone = contact("np", 1);
    no_phone.phone = None;
    store.insert_contact(no_phone);
    store.insert_contact(scheduled("s", 1, today()));
}

fn expected_distribution() -> Vec<DayCount> {
    [19, 20, 21, 22]
        .into_iter()
        .map(|d| DayCount { date: ymd(10, d), count: 1 })
        .collect()
}

#[tokio::test]
async fn test_unscheduled_counts_skip_ineligible() {
    let store = Arc::new(InMemoryStore::new());
    seed(&store);
    let engine = engine(&store);

    let counts = engine.get_unscheduled_counts(USER).await.unwrap();
    assert_eq!(counts, UnscheduledCounts { total: 4, new: 3, follow_up: 1 });
}

#[tokio::test]
async fn test_preview_writes_nothing() {
    let store = Arc::new(InMemoryStore::new());
    set_capacity(&store, capacity(2, 1, 2)).await;
    seed(&store);
    let engine = engine(&store);

    let preview = engine.get_backfill_preview(USER).await.unwrap();

    assert_eq!(preview.unscheduled.total, 4);
    assert_eq!(preview.distribution, expected_distribution());
    assert_eq!(preview.unplaced, 0);
    assert_eq!(preview.last_date, Some(ymd(11, 3)));
    assert!(ids("n", 3)
        .iter()
        .all(|id| store.contact(id).unwrap().next_call_date.is_none()));
}

#[tokio::test]
async fn test_preview_with_nothing_unscheduled() {
    let store = Arc::new(InMemoryStore::new());
    store.insert_contact(scheduled("s", 1, today()));
    let engine = engine(&store);

    let preview = engine.get_backfill_preview(USER).await.unwrap();
    assert_eq!(preview.unscheduled.total, 0);
    assert!(preview.distribution.is_empty());
    assert_eq!(preview.last_date, None);
}

#[tokio::test]
async fn test_backfill_matches_preview() {
    let store = Arc::new(InMemoryStore::new());
    set_capacity(&store, capacity(2, 1, 2)).await;
    seed(&store);
    let engine = engine(&store);

    let preview = engine.get_backfill_preview(USER).await.unwrap();
    let result = engine.backfill_unscheduled(USER).await.unwrap();

    assert_eq!(result.scheduled, 4);
    assert_eq!(result.distribution, preview.distribution);
    assert_eq!(store.contact("n000").unwrap().next_call_date, Some(ymd(10, 20)));
    assert_eq!(store.contact("np").unwrap().next_call_date, None);
    assert_eq!(
        engine.get_unscheduled_counts(USER).await.unwrap(),
        UnscheduledCounts::default()
    );
}
