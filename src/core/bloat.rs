//! Bloat detection and remediation.
//!
//! A pool is bloated when the due-today queue reaches the user's
//! `bloat_threshold`. Remediation shrinks the queue by the overage over
//! `target_per_day`, consuming removal candidates tier by tier.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::CapacitySettings;
use crate::core::{
    build_pause_event, CandidateQuery, ContactId, ContactPatch, ContactRecord, DialerEngine,
    DialerError, DialerStatus, DialerStore, DueToday, RemovalCandidates, SuggestedAction,
};
use crate::util::calendar::{add_business_days, add_months};

/// Health snapshot of a user's due-today queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloatReport {
    /// Eligible contacts due now.
    pub due_today: u32,
    /// Daily target.
    pub target: u32,
    /// How far the queue exceeds the target.
    pub overage: u32,
    /// Whether the queue reached the bloat threshold.
    pub is_bloated: bool,
    /// Threshold in force.
    pub bloat_threshold: u32,
    /// Never-called contacts in the queue.
    pub new_count: u32,
    /// Already-called contacts in the queue.
    pub follow_up_count: u32,
    /// Contacts scheduled before today.
    pub overdue_count: u32,
}

/// Compare a due-today count against the user's thresholds.
pub const fn evaluate_bloat(due: &DueToday, settings: &CapacitySettings) -> BloatReport {
    BloatReport {
        due_today: due.total,
        target: settings.target_per_day,
        overage: due.total.saturating_sub(settings.target_per_day),
        is_bloated: due.total >= settings.bloat_threshold,
        bloat_threshold: settings.bloat_threshold,
        new_count: due.new,
        follow_up_count: due.follow_up,
        overdue_count: due.overdue,
    }
}

/// One remediation to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloatFix {
    /// Contact to act on.
    pub contact_id: ContactId,
    /// Action to apply.
    pub action: SuggestedAction,
}

/// Per-fix tally of a remediation batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixOutcome {
    /// Fixes written.
    pub applied: usize,
    /// Fixes that failed and were skipped.
    pub failed: usize,
}

/// Result of an automatic remediation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoFixReport {
    /// Overage the pass was asked to remove.
    pub requested: u32,
    /// Candidates chosen.
    pub selected: usize,
    /// Fixes written.
    pub applied: usize,
    /// Fixes that failed.
    pub failed: usize,
}

/// Greedily take candidates tier 0, then 1, then 2 until `overage` are taken
/// or the candidates run out.
pub fn select_fixes(candidates: &RemovalCandidates, overage: u32) -> Vec<BloatFix> {
    candidates
        .iter()
        .take(overage as usize)
        .map(|c| BloatFix {
            contact_id: c.contact_id.clone(),
            action: c.suggested_action,
        })
        .collect()
}

/// Reason code stamped on pauses applied by bloat remediation.
pub const fn pause_reason_code(action: SuggestedAction) -> &'static str {
    match action {
        SuggestedAction::Pause12Months => "bloat_do_not_contact",
        SuggestedAction::Pause6Months => "bloat_not_interested",
        SuggestedAction::Throttle10Days | SuggestedAction::Throttle14Days => "bloat_throttle",
    }
}

/// The scheduling fields a fix writes, as of `today`.
pub fn fix_patch(action: SuggestedAction, today: NaiveDate) -> ContactPatch {
    if let Some(months) = action.pause_months() {
        return ContactPatch {
            dialer_status: Some(DialerStatus::Paused),
            paused_until: Some(add_months(today, months)),
            pause_reason: Some(pause_reason_code(action).to_string()),
            ..ContactPatch::default()
        };
    }
    let days = action.throttle_days().unwrap_or_default();
    ContactPatch {
        cadence_days: Some(days),
        next_call_date: Some(add_business_days(today, days)),
        ..ContactPatch::default()
    }
}

impl<S> DialerEngine<S>
where
    S: DialerStore,
{
    /// Compare the live due-today queue with the user's thresholds.
    pub async fn detect_bloat(&self, user_id: &str) -> Result<BloatReport, DialerError> {
        let settings = self.get_capacity_settings(user_id).await?;
        let due = self.get_due_today(user_id).await?;
        let report = evaluate_bloat(&due, &settings);
        if report.is_bloated {
            tracing::warn!(
                user_id,
                due_today = report.due_today,
                threshold = report.bloat_threshold,
                overage = report.overage,
                "dialer pool is bloated"
            );
        }
        Ok(report)
    }

    /// Apply pauses and throttles one contact at a time under the user's
    /// lock. A failing fix is logged and counted; the rest still run.
    pub async fn apply_bloat_fix(
        &self,
        user_id: &str,
        fixes: &[BloatFix],
    ) -> Result<FixOutcome, DialerError> {
        let _guard = self.lock_user(user_id).await;
        Ok(self.apply_fixes_locked(user_id, fixes).await)
    }

    /// Shrink the due-today queue by `overage` using AAA-exempt candidates,
    /// lowest tier first.
    pub async fn auto_fix_bloat(
        &self,
        user_id: &str,
        overage: u32,
    ) -> Result<AutoFixReport, DialerError> {
        if overage == 0 {
            return Ok(AutoFixReport::default());
        }
        let _guard = self.lock_user(user_id).await;
        let query = CandidateQuery {
            limit: Some(overage as usize),
            exclude_aaa: true,
        };
        let candidates = self.get_removal_candidates(user_id, &query).await?;
        let fixes = select_fixes(&candidates, overage);
        let outcome = self.apply_fixes_locked(user_id, &fixes).await;
        let report = AutoFixReport {
            requested: overage,
            selected: fixes.len(),
            applied: outcome.applied,
            failed: outcome.failed,
        };
        tracing::info!(
            user_id,
            requested = report.requested,
            selected = report.selected,
            applied = report.applied,
            failed = report.failed,
            "bloat auto-fix complete"
        );
        Ok(report)
    }

    async fn apply_fixes_locked(&self, user_id: &str, fixes: &[BloatFix]) -> FixOutcome {
        let today = self.today();
        let ids: Vec<ContactId> = fixes.iter().map(|f| f.contact_id.clone()).collect();
        let (contacts, _) = self.fetch_contacts_by_ids(user_id, &ids).await;
        let by_id: HashMap<&str, &ContactRecord> =
            contacts.iter().map(|c| (c.id.as_str(), c)).collect();

        let mut outcome = FixOutcome::default();
        for fix in fixes {
            let contact = by_id.get(fix.contact_id.as_str()).copied();
            match self.apply_one_fix(user_id, fix, contact, today).await {
                Ok(()) => outcome.applied += 1,
                Err(e) => {
                    tracing::warn!(
                        user_id,
                        contact_id = %fix.contact_id,
                        action = fix.action.as_str(),
                        error = %e,
                        "bloat fix failed"
                    );
                    outcome.failed += 1;
                }
            }
        }
        outcome
    }

    async fn apply_one_fix(
        &self,
        user_id: &str,
        fix: &BloatFix,
        contact: Option<&ContactRecord>,
        today: NaiveDate,
    ) -> Result<(), DialerError> {
        let contact = contact.ok_or_else(|| DialerError::ContactNotFound(fix.contact_id.clone()))?;
        let patch = fix_patch(fix.action, today);
        let updated = self
            .store
            .update_contacts(user_id, std::slice::from_ref(&fix.contact_id), &patch)
            .await?;
        if updated == 0 {
            return Err(DialerError::ContactNotFound(fix.contact_id.clone()));
        }

        if let Some(months) = fix.action.pause_months() {
            let event = build_pause_event(
                user_id,
                &fix.contact_id,
                pause_reason_code(fix.action),
                months,
                serde_json::to_value(contact).unwrap_or_default(),
            );
            if let Err(e) = self.store.append_pool_event(event).await {
                tracing::warn!(user_id, contact_id = %fix.contact_id, error = %e, "pool event append failed");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RemovalCandidate, RemovalTier};

    fn due(total: u32) -> DueToday {
        DueToday { total, new: 0, follow_up: total, overdue: 0 }
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let settings = CapacitySettings::default();
        assert!(!evaluate_bloat(&due(799), &settings).is_bloated);
        assert!(evaluate_bloat(&due(800), &settings).is_bloated);
    }

    #[test]
    fn test_overage_against_target() {
        let settings = CapacitySettings::default();
        assert_eq!(evaluate_bloat(&due(800), &settings).overage, 200);
        assert_eq!(evaluate_bloat(&due(500), &settings).overage, 0);
    }

    fn candidates(t0: usize, t1: usize, t2: usize) -> RemovalCandidates {
        let mk = |prefix: &str, i: usize, tier, action| RemovalCandidate {
            contact_id: format!("{prefix}{i}"),
            tier,
            reason: String::new(),
            suggested_action: action,
            unreachable_score: None,
            total_calls: 3,
        };
        let tier0: Vec<_> = (0..t0)
            .map(|i| mk("t0-", i, RemovalTier::DoNotContact, SuggestedAction::Pause12Months))
            .collect();
        let tier1: Vec<_> = (0..t1)
            .map(|i| mk("t1-", i, RemovalTier::NotInterested, SuggestedAction::Pause6Months))
            .collect();
        let tier2: Vec<_> = (0..t2)
            .map(|i| mk("t2-", i, RemovalTier::Unreachable, SuggestedAction::Throttle10Days))
            .collect();
        RemovalCandidates { total: t0 + t1 + t2, tier0, tier1, tier2 }
    }

    #[test]
    fn test_select_consumes_lower_tiers_first() {
        let fixes = select_fixes(&candidates(2, 1, 10), 5);
        let ids: Vec<&str> = fixes.iter().map(|f| f.contact_id.as_str()).collect();
        assert_eq!(ids, ["t0-0", "t0-1", "t1-0", "t2-0", "t2-1"]);
    }

    #[test]
    fn test_select_stops_when_candidates_run_out() {
        assert_eq!(select_fixes(&candidates(1, 0, 1), 50).len(), 2);
        assert!(select_fixes(&candidates(3, 3, 3), 0).is_empty());
    }

    #[test]
    fn test_fix_patches() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let pause = fix_patch(SuggestedAction::Pause6Months, today);
        assert_eq!(pause.dialer_status, Some(DialerStatus::Paused));
        assert_eq!(pause.paused_until, NaiveDate::from_ymd_opt(2027, 4, 19));
        assert_eq!(pause.pause_reason.as_deref(), Some("bloat_not_interested"));
        assert_eq!(pause.next_call_date, None);

        let throttle = fix_patch(SuggestedAction::Throttle14Days, today);
        assert_eq!(throttle.cadence_days, Some(14));
        assert_eq!(throttle.next_call_date, NaiveDate::from_ymd_opt(2026, 11, 6));
        assert_eq!(throttle.dialer_status, None);
    }
}
