//! The engine facade: shared store access, configuration, clock and the
//! per-user lock that serializes mutating passes.
//!
//! Operations are grouped by concern in sibling modules (`capacity`,
//! `scheduler`, `scoring`, `removal`, `bloat`, `backfill`), each adding an
//! `impl` block to [`DialerEngine`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::config::{CapacitySettings, CapacitySettingsPatch, EngineConfig};
use crate::core::{
    paused_company_ids, CompanyId, ContactFilter, ContactId, ContactRecord, DialerError,
    DialerStore, PageRequest,
};
use crate::util::clock::Clock;

/// Capacity scheduler and pool-health engine over a [`DialerStore`].
///
/// Reads are lock-free. Passes that mutate scheduling fields
/// (`schedule_contacts`, `backfill_unscheduled`, `apply_bloat_fix`,
/// `auto_fix_bloat`) hold a per-user async lock for their whole duration, so
/// two passes for the same user never read the same bucket snapshot.
pub struct DialerEngine<S> {
    pub(crate) store: Arc<S>,
    pub(crate) config: EngineConfig,
    clock: Arc<dyn Clock>,
    /// Lazily created per-user locks; idle entries are pruned on acquire.
    user_locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl<S> DialerEngine<S>
where
    S: DialerStore,
{
    /// Create an engine from components. Prefer
    /// [`EngineBuilder`](crate::builders::EngineBuilder), which validates the
    /// configuration.
    pub fn new(store: Arc<S>, config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            config,
            clock,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    /// The backing store.
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Engine configuration.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Today's date according to the engine clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Acquire the user's pass lock.
    pub(crate) async fn lock_user(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.user_locks.lock();
            locks.retain(|_, l| Arc::strong_count(l) > 1);
            Arc::clone(
                locks
                    .entry(user_id.to_string())
                    .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
            )
        };
        lock.lock_owned().await
    }

    /// Every contact matching `filter`, read page by page until a short page.
    pub(crate) async fn scan_contacts(
        &self,
        user_id: &str,
        filter: &ContactFilter,
    ) -> Result<Vec<ContactRecord>, DialerError> {
        let page_size = self.config.page_size;
        let mut contacts = Vec::new();
        let mut offset = 0;
        loop {
            let page = self
                .store
                .contacts_page(user_id, filter, PageRequest { offset, limit: page_size })
                .await?;
            let n = page.len();
            contacts.extend(page);
            if n < page_size {
                break;
            }
            offset += n;
        }
        tracing::debug!(user_id, rows = contacts.len(), "contact scan complete");
        Ok(contacts)
    }

    /// Ids of the user's companies paused past today.
    pub(crate) async fn paused_company_set(
        &self,
        user_id: &str,
    ) -> Result<HashSet<CompanyId>, DialerError> {
        let companies = self.store.paused_companies(user_id).await?;
        Ok(paused_company_ids(&companies, self.today()))
    }

    /// Fetch contacts by id in store-sized chunks. Failed chunks are logged
    /// and their ids returned as missing along with ids the store did not
    /// return.
    pub(crate) async fn fetch_contacts_by_ids(
        &self,
        user_id: &str,
        ids: &[ContactId],
    ) -> (Vec<ContactRecord>, Vec<ContactId>) {
        let mut seen = HashSet::new();
        let unique: Vec<ContactId> = ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();

        let mut found = Vec::with_capacity(unique.len());
        let mut missing = Vec::new();
        for chunk in unique.chunks(self.config.chunk_size) {
            match self.store.contacts_by_ids(user_id, chunk).await {
                Ok(rows) => {
                    let returned: HashSet<&str> = rows.iter().map(|c| c.id.as_str()).collect();
                    missing.extend(
                        chunk
                            .iter()
                            .filter(|id| !returned.contains(id.as_str()))
                            .cloned(),
                    );
                    found.extend(rows);
                }
                Err(e) => {
                    tracing::warn!(user_id, ids = chunk.len(), error = %e, "contact chunk fetch failed");
                    missing.extend(chunk.iter().cloned());
                }
            }
        }
        (found, missing)
    }

    /// The user's capacity settings, or the defaults when no row exists.
    pub async fn get_capacity_settings(
        &self,
        user_id: &str,
    ) -> Result<CapacitySettings, DialerError> {
        Ok(self
            .store
            .capacity_settings(user_id)
            .await?
            .unwrap_or_default())
    }

    /// Merge `patch` over the current settings, validate, and upsert.
    pub async fn update_capacity_settings(
        &self,
        user_id: &str,
        patch: &CapacitySettingsPatch,
    ) -> Result<CapacitySettings, DialerError> {
        let merged = self.get_capacity_settings(user_id).await?.merge(patch);
        merged.validate().map_err(DialerError::InvalidSettings)?;
        self.store.upsert_capacity_settings(user_id, &merged).await?;
        tracing::info!(
            user_id,
            target_per_day = merged.target_per_day,
            new_quota_per_day = merged.new_quota_per_day,
            schedule_window_days = merged.schedule_window_days,
            bloat_threshold = merged.bloat_threshold,
            "capacity settings updated"
        );
        Ok(merged)
    }
}
