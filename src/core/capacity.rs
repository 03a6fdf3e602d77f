//! Per-day capacity buckets and the due-today counter.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::CapacitySettings;
use crate::core::{
    is_eligible, CompanyId, ContactFilter, ContactRecord, DialerEngine, DialerError, DialerStore,
};
use crate::util::calendar::business_days_from;

/// Load already committed to one business day. Computed, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityBucket {
    /// The business day.
    pub date: NaiveDate,
    /// Eligible contacts due that day.
    pub total_due: u32,
    /// Of those, never-called contacts.
    pub new_due: u32,
    /// Of those, contacts with at least one call.
    pub follow_up_due: u32,
}

impl CapacityBucket {
    /// A bucket with nothing due.
    pub const fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_due: 0,
            new_due: 0,
            follow_up_due: 0,
        }
    }

    /// Count one more contact.
    pub fn add(&mut self, is_new: bool) {
        self.total_due += 1;
        if is_new {
            self.new_due += 1;
        } else {
            self.follow_up_due += 1;
        }
    }

    /// Uncount a contact previously counted here.
    pub fn remove(&mut self, is_new: bool) {
        let split = if is_new {
            &mut self.new_due
        } else {
            &mut self.follow_up_due
        };
        if *split > 0 {
            *split -= 1;
            self.total_due -= 1;
        }
    }

    /// Whether one more contact of this kind fits under `limits`.
    pub const fn has_room(&self, is_new: bool, limits: &DailyLimits) -> bool {
        self.total_due < limits.target_per_day
            && (!is_new || self.new_due < limits.new_quota_per_day)
    }
}

/// The two per-day ceilings the scheduler enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyLimits {
    /// Ceiling on `total_due`.
    pub target_per_day: u32,
    /// Ceiling on `new_due`.
    pub new_quota_per_day: u32,
}

impl DailyLimits {
    /// Limits taken from a user's settings.
    pub const fn from_settings(settings: &CapacitySettings) -> Self {
        Self {
            target_per_day: settings.target_per_day,
            new_quota_per_day: settings.new_quota_per_day,
        }
    }

    /// False when no day, however empty, could take this kind of contact.
    pub const fn can_ever_fit(&self, is_new: bool) -> bool {
        self.target_per_day > 0 && (!is_new || self.new_quota_per_day > 0)
    }
}

/// Queue waiting right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueToday {
    /// Eligible contacts due today, overdue, or unscheduled.
    pub total: u32,
    /// Of those, never called.
    pub new: u32,
    /// Of those, called at least once.
    pub follow_up: u32,
    /// Of those, scheduled strictly before today.
    pub overdue: u32,
}

/// Count contacts eligible as of `today` onto one bucket per date. Contacts
/// dated outside `dates` are ignored; every date gets a bucket even if
/// nothing is due.
pub fn tally_buckets(
    dates: &[NaiveDate],
    contacts: &[ContactRecord],
    paused: &HashSet<CompanyId>,
    today: NaiveDate,
) -> Vec<CapacityBucket> {
    let mut buckets: Vec<CapacityBucket> = dates.iter().copied().map(CapacityBucket::empty).collect();
    let index: HashMap<NaiveDate, usize> = dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();
    for contact in contacts {
        let Some(slot) = contact.next_call_date.and_then(|d| index.get(&d)) else {
            continue;
        };
        if is_eligible(contact, paused, today) {
            buckets[*slot].add(contact.is_new());
        }
    }
    buckets
}

/// Collapse eligible contacts due on or before `today` (or unscheduled) into
/// one count.
pub fn tally_due(
    contacts: &[ContactRecord],
    paused: &HashSet<CompanyId>,
    today: NaiveDate,
) -> DueToday {
    let mut due = DueToday::default();
    for contact in contacts {
        if contact.next_call_date.is_some_and(|d| d > today) || !is_eligible(contact, paused, today) {
            continue;
        }
        due.total += 1;
        if contact.is_new() {
            due.new += 1;
        } else {
            due.follow_up += 1;
        }
        if contact.next_call_date.is_some_and(|d| d < today) {
            due.overdue += 1;
        }
    }
    due
}

/// Index of the least-loaded bucket that still has room; ties go to the
/// earliest date.
pub fn find_best_day(
    buckets: &[CapacityBucket],
    is_new: bool,
    limits: &DailyLimits,
) -> Option<usize> {
    buckets
        .iter()
        .enumerate()
        .filter(|(_, b)| b.has_room(is_new, limits))
        .min_by_key(|(_, b)| b.total_due)
        .map(|(i, _)| i)
}

impl<S> DialerEngine<S>
where
    S: DialerStore,
{
    /// Load per day for the next `window_days` business days.
    pub async fn get_capacity_buckets(
        &self,
        user_id: &str,
        window_days: u32,
    ) -> Result<Vec<CapacityBucket>, DialerError> {
        let dates = business_days_from(self.today(), window_days as usize);
        let paused = self.paused_company_set(user_id).await?;
        self.load_buckets(user_id, &dates, &paused).await
    }

    /// Buckets for an explicit list of business days.
    pub(crate) async fn load_buckets(
        &self,
        user_id: &str,
        dates: &[NaiveDate],
        paused: &HashSet<CompanyId>,
    ) -> Result<Vec<CapacityBucket>, DialerError> {
        if dates.is_empty() {
            return Ok(Vec::new());
        }
        let contacts = self
            .scan_contacts(user_id, &ContactFilter::ScheduledOn(dates.to_vec()))
            .await?;
        Ok(tally_buckets(dates, &contacts, paused, self.today()))
    }

    /// How many eligible contacts are waiting right now.
    pub async fn get_due_today(&self, user_id: &str) -> Result<DueToday, DialerError> {
        let today = self.today();
        let paused = self.paused_company_set(user_id).await?;
        let contacts = self
            .scan_contacts(user_id, &ContactFilter::DueBy(today))
            .await?;
        Ok(tally_due(&contacts, &paused, today))
    }
}
