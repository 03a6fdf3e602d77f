//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use parking_lot::Mutex;
use prometheus_dialer_pool::builders::EngineBuilder;
use prometheus_dialer_pool::config::{CapacitySettings, EngineConfig};
use prometheus_dialer_pool::core::{
    CallDisposition, CallOutcome, CallRecord, CapacityBucket, CompanyRecord, ContactFilter,
    ContactId, ContactPatch, ContactRecord, DialerEngine, DialerError, DialerStore, PageRequest,
    PoolEvent,
};
use prometheus_dialer_pool::infra::InMemoryStore;
use prometheus_dialer_pool::util::FixedClock;

pub const USER: &str = "user-1";

/// Monday 2026-10-19.
pub fn today() -> NaiveDate {
    ymd(10, 19)
}

pub fn ymd(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).unwrap()
}

pub fn engine(store: &Arc<InMemoryStore>) -> DialerEngine<InMemoryStore> {
    engine_with(store, EngineConfig::default())
}

pub fn engine_with(store: &Arc<InMemoryStore>, config: EngineConfig) -> DialerEngine<InMemoryStore> {
    EngineBuilder::new(Arc::clone(store))
        .with_config(config)
        .with_clock(FixedClock(today()))
        .build()
        .unwrap()
}

/// A callable contact owned by [`USER`].
pub fn contact(id: &str, total_calls: u32) -> ContactRecord {
    let mut c = ContactRecord::new(id, USER).with_phone("+15550100");
    c.total_calls = total_calls;
    c
}

pub fn scheduled(id: &str, total_calls: u32, date: NaiveDate) -> ContactRecord {
    let mut c = contact(id, total_calls);
    c.next_call_date = Some(date);
    c
}

pub fn ids(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}{i:03}")).collect()
}

/// Store `settings` for [`USER`].
pub async fn set_capacity(store: &InMemoryStore, settings: CapacitySettings) {
    store.upsert_capacity_settings(USER, &settings).await.unwrap();
}

pub fn capacity(target: u32, new_quota: u32, window: u32) -> CapacitySettings {
    CapacitySettings {
        target_per_day: target,
        new_quota_per_day: new_quota,
        schedule_window_days: window,
        ..CapacitySettings::default()
    }
}

/// Record a call `minutes_ago` minutes before noon of today.
pub fn call(
    store: &InMemoryStore,
    contact_id: &str,
    outcome: CallOutcome,
    disposition: Option<CallDisposition>,
    minutes_ago: i64,
) {
    let noon = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
    store.insert_call(CallRecord {
        id: format!("{contact_id}-{minutes_ago}"),
        contact_id: contact_id.to_string(),
        outcome,
        disposition,
        started_at: noon - Duration::minutes(minutes_ago),
    });
}

pub fn assert_within_limits(buckets: &[CapacityBucket], settings: &CapacitySettings) {
    for b in buckets {
        assert!(
            b.total_due <= settings.target_per_day,
            "{} over target: {}",
            b.date,
            b.total_due
        );
        assert!(
            b.new_due <= settings.new_quota_per_day,
            "{} over new quota: {}",
            b.date,
            b.new_due
        );
    }
}

/// [`InMemoryStore`] behind a store that yields to the runtime before every
/// call, so concurrent passes interleave at each await point. Ids marked
/// with [`InterleavingStore::vanish_on_update`] are dropped from updates as
/// if deleted between read and write.
pub struct InterleavingStore {
    pub inner: Arc<InMemoryStore>,
    vanished: Mutex<HashSet<ContactId>>,
}

impl InterleavingStore {
    pub fn new(inner: Arc<InMemoryStore>) -> Self {
        Self {
            inner,
            vanished: Mutex::new(HashSet::new()),
        }
    }

    pub fn vanish_on_update(&self, id: &str) {
        self.vanished.lock().insert(id.to_string());
    }
}

#[async_trait]
impl DialerStore for InterleavingStore {
    async fn contacts_page(
        &self,
        user_id: &str,
        filter: &ContactFilter,
        page: PageRequest,
    ) -> Result<Vec<ContactRecord>, DialerError> {
        tokio::task::yield_now().await;
        self.inner.contacts_page(user_id, filter, page).await
    }

    async fn contacts_by_ids(
        &self,
        user_id: &str,
        ids: &[ContactId],
    ) -> Result<Vec<ContactRecord>, DialerError> {
        tokio::task::yield_now().await;
        self.inner.contacts_by_ids(user_id, ids).await
    }

    async fn paused_companies(&self, user_id: &str) -> Result<Vec<CompanyRecord>, DialerError> {
        tokio::task::yield_now().await;
        self.inner.paused_companies(user_id).await
    }

    async fn recent_calls(
        &self,
        contact_ids: &[ContactId],
        per_contact: usize,
    ) -> Result<Vec<CallRecord>, DialerError> {
        tokio::task::yield_now().await;
        self.inner.recent_calls(contact_ids, per_contact).await
    }

    async fn update_contacts(
        &self,
        user_id: &str,
        ids: &[ContactId],
        patch: &ContactPatch,
    ) -> Result<usize, DialerError> {
        tokio::task::yield_now().await;
        let kept: Vec<ContactId> = {
            let vanished = self.vanished.lock();
            ids.iter().filter(|id| !vanished.contains(*id)).cloned().collect()
        };
        self.inner.update_contacts(user_id, &kept, patch).await
    }

    async fn capacity_settings(
        &self,
        user_id: &str,
    ) -> Result<Option<CapacitySettings>, DialerError> {
        tokio::task::yield_now().await;
        self.inner.capacity_settings(user_id).await
    }

    async fn upsert_capacity_settings(
        &self,
        user_id: &str,
        settings: &CapacitySettings,
    ) -> Result<(), DialerError> {
        tokio::task::yield_now().await;
        self.inner.upsert_capacity_settings(user_id, settings).await
    }

    async fn append_pool_event(&self, event: PoolEvent) -> Result<(), DialerError> {
        tokio::task::yield_now().await;
        self.inner.append_pool_event(event).await
    }
}

pub fn interleaving_engine(store: &Arc<InterleavingStore>) -> DialerEngine<InterleavingStore> {
    EngineBuilder::new(Arc::clone(store))
        .with_clock(FixedClock(today()))
        .build()
        .unwrap()
}
