//! Unscheduled contacts: counts, a dry-run preview and the backfill pass.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::scheduler::{distribution_of, scheduling_order, DayCount};
use crate::core::{
    is_eligible, CompanyId, ContactFilter, ContactId, ContactRecord, DialerEngine, DialerError,
    DialerStore, ScheduleOptions, ScheduleResult,
};
use crate::util::calendar::business_days_from;

/// Eligible contacts with no next call date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnscheduledCounts {
    /// All of them.
    pub total: u32,
    /// Never called.
    pub new: u32,
    /// Called at least once.
    pub follow_up: u32,
}

/// What a backfill would do right now.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackfillPreview {
    /// Contacts a backfill would try to place.
    pub unscheduled: UnscheduledCounts,
    /// Contacts per day the backfill would write.
    pub distribution: Vec<DayCount>,
    /// Contacts that would fit nowhere.
    pub unplaced: usize,
    /// Last business day the placement reached, extensions included.
    pub last_date: Option<NaiveDate>,
}

/// Count contacts by new/follow-up split.
pub fn tally_unscheduled<'a>(contacts: impl IntoIterator<Item = &'a ContactRecord>) -> UnscheduledCounts {
    let mut counts = UnscheduledCounts::default();
    for c in contacts {
        counts.total += 1;
        if c.is_new() {
            counts.new += 1;
        } else {
            counts.follow_up += 1;
        }
    }
    counts
}

impl<S> DialerEngine<S>
where
    S: DialerStore,
{
    async fn unscheduled_eligible(
        &self,
        user_id: &str,
        paused: &HashSet<CompanyId>,
    ) -> Result<Vec<ContactRecord>, DialerError> {
        let mut contacts = self
            .scan_contacts(user_id, &ContactFilter::Unscheduled)
            .await?;
        let today = self.today();
        contacts.retain(|c| is_eligible(c, paused, today));
        Ok(contacts)
    }

    /// How many eligible contacts have no call date.
    pub async fn get_unscheduled_counts(
        &self,
        user_id: &str,
    ) -> Result<UnscheduledCounts, DialerError> {
        let paused = self.paused_company_set(user_id).await?;
        let contacts = self.unscheduled_eligible(user_id, &paused).await?;
        Ok(tally_unscheduled(&contacts))
    }

    /// Run the placement for every unscheduled eligible contact against the
    /// current buckets without writing anything.
    pub async fn get_backfill_preview(&self, user_id: &str) -> Result<BackfillPreview, DialerError> {
        let settings = self.get_capacity_settings(user_id).await?;
        let options = ScheduleOptions::default();
        let limits = options.limits(&settings);
        let paused = self.paused_company_set(user_id).await?;
        let mut contacts = self.unscheduled_eligible(user_id, &paused).await?;
        let unscheduled = tally_unscheduled(&contacts);
        if contacts.is_empty() {
            return Ok(BackfillPreview {
                unscheduled,
                ..BackfillPreview::default()
            });
        }

        let dates = business_days_from(self.today(), options.window_days(&settings) as usize);
        let buckets = self.load_buckets(user_id, &dates, &paused).await?;
        scheduling_order(&mut contacts);
        let placement = self
            .place_contacts(user_id, buckets, &contacts, &limits, &paused)
            .await;

        Ok(BackfillPreview {
            unscheduled,
            distribution: distribution_of(&placement.assignments),
            unplaced: placement.unplaced.len(),
            last_date: placement.buckets.last().map(|b| b.date),
        })
    }

    /// Schedule every unscheduled eligible contact with the user's settings.
    pub async fn backfill_unscheduled(&self, user_id: &str) -> Result<ScheduleResult, DialerError> {
        let _guard = self.lock_user(user_id).await;
        let paused = self.paused_company_set(user_id).await?;
        let ids: Vec<ContactId> = self
            .unscheduled_eligible(user_id, &paused)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        tracing::info!(user_id, unscheduled = ids.len(), "backfill starting");
        self.schedule_locked(user_id, &ids, &ScheduleOptions::default())
            .await
    }
}
