//! Capacity-constrained assignment of contacts to business days.
//!
//! A pass snapshots the per-day buckets, orders the batch (AAA first, then
//! fewest attempts), and places contacts one at a time on the least-loaded
//! day with room, updating the in-memory counters after every placement.
//! Placement is inherently sequential: each decision reads the load left by
//! the previous one.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{CapacitySettings, MAX_SCHEDULE_WINDOW_DAYS};
use crate::core::{
    find_best_day, is_eligible, CapacityBucket, CompanyId, ContactId, ContactPatch,
    ContactRecord, DailyLimits, DialerEngine, DialerError, DialerStore,
};
use crate::util::calendar::{business_days_after, business_days_from};

/// Per-call overrides of the user's capacity settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleOptions {
    /// Window length in business days.
    pub window_days: Option<u32>,
    /// Daily total ceiling.
    pub target_per_day: Option<u32>,
    /// Daily ceiling for never-called contacts.
    pub new_quota_per_day: Option<u32>,
}

impl ScheduleOptions {
    /// Limits after applying overrides.
    pub fn limits(&self, settings: &CapacitySettings) -> DailyLimits {
        let base = DailyLimits::from_settings(settings);
        DailyLimits {
            target_per_day: self.target_per_day.unwrap_or(base.target_per_day),
            new_quota_per_day: self.new_quota_per_day.unwrap_or(base.new_quota_per_day),
        }
    }

    /// Window length after applying overrides, clamped to a sane range.
    pub fn window_days(&self, settings: &CapacitySettings) -> u32 {
        self.window_days
            .unwrap_or(settings.schedule_window_days)
            .clamp(1, MAX_SCHEDULE_WINDOW_DAYS)
    }
}

/// One contact placed on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Contact placed.
    pub contact_id: ContactId,
    /// Day it was placed on.
    pub date: NaiveDate,
}

/// Contacts assigned to a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCount {
    /// The day.
    pub date: NaiveDate,
    /// How many contacts were put on it.
    pub count: usize,
}

/// Outcome of a scheduling pass. Counts are best-effort: failed chunks are
/// reported, not retried.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    /// Contacts whose new date was written.
    pub scheduled: usize,
    /// Written contacts per day, in date order.
    pub distribution: Vec<DayCount>,
    /// Contacts that fit nowhere, even after extending the window.
    pub unplaced: Vec<ContactId>,
    /// Requested ids that could not be read.
    pub missing: Vec<ContactId>,
    /// Requested contacts that are not callable today. They are left
    /// untouched and take no capacity.
    pub ineligible: Vec<ContactId>,
    /// Contacts placed but not written: failed chunks plus rows the store
    /// reported as not updated.
    pub failed_writes: usize,
}

/// Placement decisions of one pass, before anything is written.
#[derive(Debug, Clone, Default)]
pub(crate) struct Placement {
    pub assignments: Vec<Assignment>,
    pub unplaced: Vec<ContactId>,
    pub buckets: Vec<CapacityBucket>,
}

/// Order a batch for placement: AAA first, then ascending attempts. Stable,
/// so input order breaks remaining ties.
pub fn scheduling_order(contacts: &mut [ContactRecord]) {
    contacts.sort_by_key(|c| (!c.is_aaa, c.total_calls));
}

/// Place one contact on the best bucket and count it there.
pub fn place_in(
    buckets: &mut [CapacityBucket],
    is_new: bool,
    limits: &DailyLimits,
) -> Option<NaiveDate> {
    let i = find_best_day(buckets, is_new, limits)?;
    buckets[i].add(is_new);
    Some(buckets[i].date)
}

/// Uncount contacts of the batch that already sit in a window bucket, so a
/// reschedule does not count them twice.
pub fn release_existing(
    buckets: &mut [CapacityBucket],
    contacts: &[ContactRecord],
    paused: &HashSet<CompanyId>,
    today: NaiveDate,
) {
    for contact in contacts {
        let Some(date) = contact.next_call_date else {
            continue;
        };
        if !is_eligible(contact, paused, today) {
            continue;
        }
        if let Some(bucket) = buckets.iter_mut().find(|b| b.date == date) {
            bucket.remove(contact.is_new());
        }
    }
}

/// Per-day counts of a set of assignments, in date order.
pub fn distribution_of<'a>(assignments: impl IntoIterator<Item = &'a Assignment>) -> Vec<DayCount> {
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for a in assignments {
        *per_day.entry(a.date).or_default() += 1;
    }
    per_day
        .into_iter()
        .map(|(date, count)| DayCount { date, count })
        .collect()
}

impl<S> DialerEngine<S>
where
    S: DialerStore,
{
    /// Give each of `contact_ids` a `next_call_date` within capacity.
    ///
    /// Runs under the user's lock. Contacts that cannot be read are listed
    /// in `missing`, contacts that are not callable in `ineligible`, and
    /// contacts that fit nowhere after the bounded window extensions in
    /// `unplaced`.
    pub async fn schedule_contacts(
        &self,
        user_id: &str,
        contact_ids: &[ContactId],
        options: &ScheduleOptions,
    ) -> Result<ScheduleResult, DialerError> {
        let _guard = self.lock_user(user_id).await;
        self.schedule_locked(user_id, contact_ids, options).await
    }

    pub(crate) async fn schedule_locked(
        &self,
        user_id: &str,
        contact_ids: &[ContactId],
        options: &ScheduleOptions,
    ) -> Result<ScheduleResult, DialerError> {
        if contact_ids.is_empty() {
            return Ok(ScheduleResult::default());
        }
        let settings = self.get_capacity_settings(user_id).await?;
        let limits = options.limits(&settings);
        let paused = self.paused_company_set(user_id).await?;
        let dates = business_days_from(self.today(), options.window_days(&settings) as usize);
        let mut buckets = self.load_buckets(user_id, &dates, &paused).await?;

        let today = self.today();
        let (fetched, missing) = self.fetch_contacts_by_ids(user_id, contact_ids).await;
        let (mut contacts, ineligible): (Vec<_>, Vec<_>) = fetched
            .into_iter()
            .partition(|c| is_eligible(c, &paused, today));
        release_existing(&mut buckets, &contacts, &paused, today);
        scheduling_order(&mut contacts);

        let placement = self
            .place_contacts(user_id, buckets, &contacts, &limits, &paused)
            .await;
        let (per_day, failed_writes) = self.persist_assignments(user_id, &placement.assignments).await;

        let result = ScheduleResult {
            scheduled: per_day.values().sum(),
            distribution: per_day
                .into_iter()
                .map(|(date, count)| DayCount { date, count })
                .collect(),
            unplaced: placement.unplaced,
            missing,
            ineligible: ineligible.into_iter().map(|c| c.id).collect(),
            failed_writes,
        };
        tracing::info!(
            user_id,
            requested = contact_ids.len(),
            scheduled = result.scheduled,
            unplaced = result.unplaced.len(),
            missing = result.missing.len(),
            ineligible = result.ineligible.len(),
            failed_writes,
            "scheduling pass complete"
        );
        Ok(result)
    }

    /// Place an ordered batch, extending the window by
    /// `extension_step_days` whenever no loaded day has room, at most
    /// `max_window_extensions` times per pass.
    pub(crate) async fn place_contacts(
        &self,
        user_id: &str,
        mut buckets: Vec<CapacityBucket>,
        contacts: &[ContactRecord],
        limits: &DailyLimits,
        paused: &HashSet<CompanyId>,
    ) -> Placement {
        let mut assignments = Vec::with_capacity(contacts.len());
        let mut unplaced = Vec::new();
        let mut extensions = 0;

        for contact in contacts {
            let is_new = contact.is_new();
            let date = loop {
                if let Some(date) = place_in(&mut buckets, is_new, limits) {
                    break Some(date);
                }
                if !limits.can_ever_fit(is_new) || extensions >= self.config.max_window_extensions {
                    break None;
                }
                let anchor = buckets.last().map_or_else(|| self.today(), |b| b.date);
                let dates = business_days_after(anchor, self.config.extension_step_days);
                extensions += 1;
                match self.load_buckets(user_id, &dates, paused).await {
                    Ok(extra) => {
                        tracing::debug!(
                            user_id,
                            extension = extensions,
                            through = %dates.last().copied().unwrap_or(anchor),
                            "scheduling window extended"
                        );
                        buckets.extend(extra);
                    }
                    Err(e) => {
                        tracing::warn!(user_id, error = %e, "window extension read failed");
                        extensions = self.config.max_window_extensions;
                    }
                }
            };
            match date {
                Some(date) => assignments.push(Assignment {
                    contact_id: contact.id.clone(),
                    date,
                }),
                None => unplaced.push(contact.id.clone()),
            }
        }

        if !unplaced.is_empty() {
            tracing::warn!(
                user_id,
                unplaced = unplaced.len(),
                extensions,
                "capacity exhausted; some contacts were not scheduled"
            );
        }
        Placement {
            assignments,
            unplaced,
            buckets,
        }
    }

    /// Write assignments grouped by date in id chunks. Returns the number of
    /// rows written per day and the number of assignments that were not.
    async fn persist_assignments(
        &self,
        user_id: &str,
        assignments: &[Assignment],
    ) -> (BTreeMap<NaiveDate, usize>, usize) {
        let mut by_date: BTreeMap<NaiveDate, Vec<ContactId>> = BTreeMap::new();
        for a in assignments {
            by_date.entry(a.date).or_default().push(a.contact_id.clone());
        }

        let mut written: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        let mut failed = 0;
        for (date, ids) in by_date {
            let patch = ContactPatch::reschedule(date);
            for chunk in ids.chunks(self.config.chunk_size) {
                match self.store.update_contacts(user_id, chunk, &patch).await {
                    Ok(updated) => {
                        let updated = updated.min(chunk.len());
                        if updated < chunk.len() {
                            tracing::warn!(
                                user_id,
                                %date,
                                ids = chunk.len(),
                                updated,
                                "schedule write touched fewer rows than requested"
                            );
                            failed += chunk.len() - updated;
                        }
                        if updated > 0 {
                            *written.entry(date).or_default() += updated;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(user_id, %date, ids = chunk.len(), error = %e, "schedule write failed");
                        failed += chunk.len();
                    }
                }
            }
        }
        (written, failed)
    }
}
