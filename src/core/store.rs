//! Storage contract the engine is written against.
//!
//! The engine never assumes a particular database. A backend only needs
//! filtered, paginated contact reads, a company pause lookup, a per-contact
//! recent-call read, chunked conditional updates, a settings upsert and an
//! append-only event insert.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::CapacitySettings;
use crate::core::{
    CallRecord, CompanyRecord, ContactId, ContactRecord, DialerError, DialerStatus, PoolEvent,
};

/// Maximum ids per `id in (...)` predicate accepted by backends.
pub const MAX_ID_CHUNK: usize = 50;

/// Which contacts a paginated read should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactFilter {
    /// `next_call_date` is one of these dates.
    ScheduledOn(Vec<NaiveDate>),
    /// `next_call_date` is null or on/before the date.
    DueBy(NaiveDate),
    /// `next_call_date` is null.
    Unscheduled,
}

impl ContactFilter {
    /// Evaluate the filter against a record; backends may use this directly.
    pub fn matches(&self, contact: &ContactRecord) -> bool {
        match (self, contact.next_call_date) {
            (Self::ScheduledOn(dates), Some(d)) => dates.contains(&d),
            (Self::ScheduledOn(_), None) => false,
            (Self::DueBy(_), None) | (Self::Unscheduled, None) => true,
            (Self::DueBy(by), Some(d)) => d <= *by,
            (Self::Unscheduled, Some(_)) => false,
        }
    }
}

/// Offset/limit page of a stable (id-ordered) result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Rows to skip.
    pub offset: usize,
    /// Maximum rows to return.
    pub limit: usize,
}

/// Scheduling fields to set on a batch of contacts. `None` leaves a field
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPatch {
    /// New next call date.
    pub next_call_date: Option<NaiveDate>,
    /// New dialer status.
    pub dialer_status: Option<DialerStatus>,
    /// New cadence override.
    pub cadence_days: Option<u32>,
    /// New pause window end.
    pub paused_until: Option<NaiveDate>,
    /// New pause reason code.
    pub pause_reason: Option<String>,
}

impl ContactPatch {
    /// Patch that only moves the next call date.
    pub fn reschedule(date: NaiveDate) -> Self {
        Self {
            next_call_date: Some(date),
            ..Self::default()
        }
    }

    /// Apply the patch to an in-memory record.
    pub fn apply_to(&self, contact: &mut ContactRecord) {
        if let Some(d) = self.next_call_date {
            contact.next_call_date = Some(d);
        }
        if let Some(s) = self.dialer_status {
            contact.dialer_status = Some(s);
        }
        if let Some(c) = self.cadence_days {
            contact.cadence_days = Some(c);
        }
        if let Some(p) = self.paused_until {
            contact.paused_until = Some(p);
        }
        if let Some(r) = &self.pause_reason {
            contact.pause_reason = Some(r.clone());
        }
    }
}

/// Row store backing the engine.
#[async_trait]
pub trait DialerStore: Send + Sync + 'static {
    /// One page of a user's contacts matching `filter`, ordered by id.
    async fn contacts_page(
        &self,
        user_id: &str,
        filter: &ContactFilter,
        page: PageRequest,
    ) -> Result<Vec<ContactRecord>, DialerError>;

    /// A user's contacts with the given ids (at most [`MAX_ID_CHUNK`]).
    async fn contacts_by_ids(
        &self,
        user_id: &str,
        ids: &[ContactId],
    ) -> Result<Vec<ContactRecord>, DialerError>;

    /// A user's companies that have `dialer_paused_until` set.
    async fn paused_companies(&self, user_id: &str) -> Result<Vec<CompanyRecord>, DialerError>;

    /// Up to `per_contact` most recent calls for each contact, most recent
    /// first within a contact.
    async fn recent_calls(
        &self,
        contact_ids: &[ContactId],
        per_contact: usize,
    ) -> Result<Vec<CallRecord>, DialerError>;

    /// Apply `patch` to the user's contacts in `ids` (at most
    /// [`MAX_ID_CHUNK`]); returns the number of rows updated.
    async fn update_contacts(
        &self,
        user_id: &str,
        ids: &[ContactId],
        patch: &ContactPatch,
    ) -> Result<usize, DialerError>;

    /// Stored capacity settings row, if any.
    async fn capacity_settings(&self, user_id: &str)
        -> Result<Option<CapacitySettings>, DialerError>;

    /// Insert or replace the capacity settings row keyed by user.
    async fn upsert_capacity_settings(
        &self,
        user_id: &str,
        settings: &CapacitySettings,
    ) -> Result<(), DialerError>;

    /// Append an audit record to the pool-event log.
    async fn append_pool_event(&self, event: PoolEvent) -> Result<(), DialerError>;
}
