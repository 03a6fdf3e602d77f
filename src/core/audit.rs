//! Pool-event audit records.
//!
//! Every pause applied to a contact appends one [`PoolEvent`] carrying the
//! pre-change snapshot, so a pause can be explained and reverted later.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::util::clock::now_ms;

/// What happened to the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolEventAction {
    /// Entity removed from rotation for a fixed window.
    Pause,
}

/// Audit record appended to the pool-event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolEvent {
    /// Event identifier.
    pub event_id: String,
    /// Owning user.
    pub user_id: String,
    /// Kind of entity acted on.
    pub entity_type: String,
    /// Entity identifier.
    pub entity_id: String,
    /// Action taken.
    pub action: PoolEventAction,
    /// Reason code, e.g. `bloat_do_not_contact`.
    pub reason_code: String,
    /// Pause length in months.
    pub duration_months: u32,
    /// Entity state before the action.
    pub snapshot: serde_json::Value,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
}

/// Build a pause event for a contact with a fresh id and timestamp.
pub fn build_pause_event(
    user_id: impl Into<String>,
    contact_id: impl Into<String>,
    reason_code: impl Into<String>,
    duration_months: u32,
    snapshot: serde_json::Value,
) -> PoolEvent {
    PoolEvent {
        event_id: Uuid::new_v4().to_string(),
        user_id: user_id.into(),
        entity_type: "contact".into(),
        entity_id: contact_id.into(),
        action: PoolEventAction::Pause,
        reason_code: reason_code.into(),
        duration_months,
        snapshot,
        created_at_ms: now_ms(),
    }
}

/// Bounded in-memory event log for testing and dev.
#[derive(Debug)]
pub struct InMemoryPoolEventLog {
    events: VecDeque<PoolEvent>,
    max_events: usize,
}

impl InMemoryPoolEventLog {
    /// Create a log that keeps the most recent `max_events` entries.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events.min(1024)),
            max_events,
        }
    }

    /// Append an event, dropping the oldest when full.
    pub fn record(&mut self, event: PoolEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Retrieve a snapshot of stored events, oldest first.
    pub fn events(&self) -> Vec<PoolEvent> {
        self.events.iter().cloned().collect()
    }
}
