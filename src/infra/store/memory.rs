//! In-memory store backend for development and tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::config::CapacitySettings;
use crate::core::{
    CallRecord, CompanyRecord, ContactFilter, ContactId, ContactPatch, ContactRecord,
    DialerError, DialerStore, InMemoryPoolEventLog, PageRequest, PoolEvent, MAX_ID_CHUNK,
};

const EVENT_LOG_CAPACITY: usize = 10_000;

#[derive(Debug)]
struct State {
    contacts: BTreeMap<ContactId, ContactRecord>,
    companies: Vec<CompanyRecord>,
    calls: Vec<CallRecord>,
    settings: HashMap<String, CapacitySettings>,
    events: InMemoryPoolEventLog,
    failing_updates: HashSet<ContactId>,
}

/// Simple in-memory [`DialerStore`]. Contacts are kept ordered by id so
/// pages are stable.
///
/// Failures can be injected: reads fail while `set_fail_reads(true)` is in
/// effect, and any update batch touching an id registered with
/// `fail_updates_for` fails as a whole.
#[derive(Debug)]
pub struct InMemoryStore {
    state: Mutex<State>,
    fail_reads: AtomicBool,
    page_reads: AtomicUsize,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                contacts: BTreeMap::new(),
                companies: Vec::new(),
                calls: Vec::new(),
                settings: HashMap::new(),
                events: InMemoryPoolEventLog::new(EVENT_LOG_CAPACITY),
                failing_updates: HashSet::new(),
            }),
            fail_reads: AtomicBool::new(false),
            page_reads: AtomicUsize::new(0),
        }
    }

    /// Insert or replace a contact.
    pub fn insert_contact(&self, contact: ContactRecord) {
        self.state
            .lock()
            .contacts
            .insert(contact.id.clone(), contact);
    }

    /// Insert a company.
    pub fn insert_company(&self, company: CompanyRecord) {
        self.state.lock().companies.push(company);
    }

    /// Record a call.
    pub fn insert_call(&self, call: CallRecord) {
        self.state.lock().calls.push(call);
    }

    /// Current copy of a contact.
    pub fn contact(&self, id: &str) -> Option<ContactRecord> {
        self.state.lock().contacts.get(id).cloned()
    }

    /// All contacts, ordered by id.
    pub fn contacts(&self) -> Vec<ContactRecord> {
        self.state.lock().contacts.values().cloned().collect()
    }

    /// Pool events appended so far, oldest first.
    pub fn pool_events(&self) -> Vec<PoolEvent> {
        self.state.lock().events.events()
    }

    /// Make every update batch containing `id` fail.
    pub fn fail_updates_for(&self, id: impl Into<ContactId>) {
        self.state.lock().failing_updates.insert(id.into());
    }

    /// Toggle failure of every contact read.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of `contacts_page` calls served.
    pub fn page_reads(&self) -> usize {
        self.page_reads.load(Ordering::SeqCst)
    }

    fn check_reads(&self) -> Result<(), DialerError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DialerError::Store("injected read failure".into()));
        }
        Ok(())
    }
}

fn check_chunk(ids: &[ContactId]) -> Result<(), DialerError> {
    if ids.len() > MAX_ID_CHUNK {
        return Err(DialerError::Store(format!(
            "{} ids exceeds the {MAX_ID_CHUNK} id limit",
            ids.len()
        )));
    }
    Ok(())
}

#[async_trait]
impl DialerStore for InMemoryStore {
    async fn contacts_page(
        &self,
        user_id: &str,
        filter: &ContactFilter,
        page: PageRequest,
    ) -> Result<Vec<ContactRecord>, DialerError> {
        self.check_reads()?;
        self.page_reads.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock();
        Ok(state
            .contacts
            .values()
            .filter(|c| c.user_id == user_id && filter.matches(c))
            .skip(page.offset)
            .take(page.limit)
            .cloned()
            .collect())
    }

    async fn contacts_by_ids(
        &self,
        user_id: &str,
        ids: &[ContactId],
    ) -> Result<Vec<ContactRecord>, DialerError> {
        self.check_reads()?;
        check_chunk(ids)?;
        let state = self.state.lock();
        Ok(ids
            .iter()
            .filter_map(|id| state.contacts.get(id))
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn paused_companies(&self, user_id: &str) -> Result<Vec<CompanyRecord>, DialerError> {
        let state = self.state.lock();
        Ok(state
            .companies
            .iter()
            .filter(|c| c.user_id == user_id && c.dialer_paused_until.is_some())
            .cloned()
            .collect())
    }

    async fn recent_calls(
        &self,
        contact_ids: &[ContactId],
        per_contact: usize,
    ) -> Result<Vec<CallRecord>, DialerError> {
        check_chunk(contact_ids)?;
        let state = self.state.lock();
        let mut out = Vec::new();
        for id in contact_ids {
            let mut calls: Vec<&CallRecord> =
                state.calls.iter().filter(|c| &c.contact_id == id).collect();
            calls.sort_by(|a, b| b.started_at.cmp(&a.started_at));
            out.extend(calls.into_iter().take(per_contact).cloned());
        }
        Ok(out)
    }

    async fn update_contacts(
        &self,
        user_id: &str,
        ids: &[ContactId],
        patch: &ContactPatch,
    ) -> Result<usize, DialerError> {
        check_chunk(ids)?;
        let mut state = self.state.lock();
        if let Some(id) = ids.iter().find(|id| state.failing_updates.contains(*id)) {
            return Err(DialerError::Store(format!("injected update failure for {id}")));
        }
        let mut updated = 0;
        for id in ids {
            if let Some(contact) = state.contacts.get_mut(id) {
                if contact.user_id == user_id {
                    patch.apply_to(contact);
                    updated += 1;
                }
            }
        }
        Ok(updated)
    }

    async fn capacity_settings(
        &self,
        user_id: &str,
    ) -> Result<Option<CapacitySettings>, DialerError> {
        Ok(self.state.lock().settings.get(user_id).copied())
    }

    async fn upsert_capacity_settings(
        &self,
        user_id: &str,
        settings: &CapacitySettings,
    ) -> Result<(), DialerError> {
        self.state
            .lock()
            .settings
            .insert(user_id.to_string(), *settings);
        Ok(())
    }

    async fn append_pool_event(&self, event: PoolEvent) -> Result<(), DialerError> {
        self.state.lock().events.record(event);
        Ok(())
    }
}
