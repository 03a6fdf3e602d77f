//! Tiered "stop calling this person" suggestions for contacts that are
//! already due and already called.
//!
//! Tiers are checked in order and the first match wins:
//!
//! | Tier | Meaning | Trigger (latest call) | Action |
//! |---|---|---|---|
//! | 0 | Do not contact | `do_not_contact` disposition or `wrong_number` | pause 12 months |
//! | 1 | Not interested | any `not_interested_*` disposition | pause 6 months |
//! | 2 | Unreachable | 6+ calls and unreachable score ≥ 30 | throttle 10 or 14 days |

use serde::{Deserialize, Serialize};

use crate::core::scoring::unreachable_score;
use crate::core::{
    is_eligible, CallDisposition, CallOutcome, CallRecord, ContactFilter, ContactId,
    ContactRecord, DialerEngine, DialerError, DialerStore,
};

/// Tier 2 needs at least this many attempts.
pub const UNREACHABLE_MIN_CALLS: u32 = 6;
/// Tier 2 needs at least this score.
pub const UNREACHABLE_MIN_SCORE: u32 = 30;
/// From this score on, tier 2 throttles harder.
pub const UNREACHABLE_SEVERE_SCORE: u32 = 60;

/// Confidence that further calls are wasted; lower is more certain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum RemovalTier {
    /// Tier 0.
    DoNotContact,
    /// Tier 1.
    NotInterested,
    /// Tier 2.
    Unreachable,
}

impl From<RemovalTier> for u8 {
    fn from(tier: RemovalTier) -> Self {
        match tier {
            RemovalTier::DoNotContact => 0,
            RemovalTier::NotInterested => 1,
            RemovalTier::Unreachable => 2,
        }
    }
}

impl TryFrom<u8> for RemovalTier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::DoNotContact),
            1 => Ok(Self::NotInterested),
            2 => Ok(Self::Unreachable),
            other => Err(format!("unknown removal tier {other}")),
        }
    }
}

/// Remediation suggested for a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuggestedAction {
    /// Pause for twelve months.
    #[serde(rename = "pause_12mo")]
    Pause12Months,
    /// Pause for six months.
    #[serde(rename = "pause_6mo")]
    Pause6Months,
    /// Permanent 10-business-day cadence.
    #[serde(rename = "throttle_10d")]
    Throttle10Days,
    /// Permanent 14-business-day cadence.
    #[serde(rename = "throttle_14d")]
    Throttle14Days,
}

impl SuggestedAction {
    /// Pause length in months, for pause actions.
    pub const fn pause_months(self) -> Option<u32> {
        match self {
            Self::Pause12Months => Some(12),
            Self::Pause6Months => Some(6),
            Self::Throttle10Days | Self::Throttle14Days => None,
        }
    }

    /// New cadence in business days, for throttle actions.
    pub const fn throttle_days(self) -> Option<u32> {
        match self {
            Self::Throttle10Days => Some(10),
            Self::Throttle14Days => Some(14),
            Self::Pause12Months | Self::Pause6Months => None,
        }
    }

    /// Wire name, e.g. `pause_12mo`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pause12Months => "pause_12mo",
            Self::Pause6Months => "pause_6mo",
            Self::Throttle10Days => "throttle_10d",
            Self::Throttle14Days => "throttle_14d",
        }
    }
}

/// One suggested removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalCandidate {
    /// Contact concerned.
    pub contact_id: ContactId,
    /// Confidence tier.
    pub tier: RemovalTier,
    /// Human-readable reason.
    pub reason: String,
    /// What to do about it.
    pub suggested_action: SuggestedAction,
    /// Score that qualified a tier-2 candidate.
    pub unreachable_score: Option<u32>,
    /// Attempts so far.
    pub total_calls: u32,
}

/// Candidates split by tier, each sorted and truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalCandidates {
    /// Do-not-contact candidates, most attempted first.
    pub tier0: Vec<RemovalCandidate>,
    /// Not-interested candidates, most attempted first.
    pub tier1: Vec<RemovalCandidate>,
    /// Unreachable candidates, highest score first.
    pub tier2: Vec<RemovalCandidate>,
    /// Candidates returned across all tiers.
    pub total: usize,
}

impl RemovalCandidates {
    /// All candidates in tier order.
    pub fn iter(&self) -> impl Iterator<Item = &RemovalCandidate> {
        self.tier0.iter().chain(&self.tier1).chain(&self.tier2)
    }
}

/// Options for a candidate query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateQuery {
    /// Per-tier limit; the engine default when unset.
    pub limit: Option<usize>,
    /// Leave priority accounts out.
    pub exclude_aaa: bool,
}

impl Default for CandidateQuery {
    fn default() -> Self {
        Self {
            limit: None,
            exclude_aaa: true,
        }
    }
}

fn disposition_label(d: CallDisposition) -> &'static str {
    match d {
        CallDisposition::NotInterestedFit => "not a fit",
        CallDisposition::NotInterestedSolution => "has a solution",
        CallDisposition::NotInterestedBudget => "no budget",
        _ => "other",
    }
}

/// Classify one contact from its recent history (most recent first).
pub fn classify_contact(contact: &ContactRecord, history: &[CallRecord]) -> Option<RemovalCandidate> {
    let latest = history.first();
    let disposition = latest.and_then(|c| c.disposition);
    let outcome = latest.map(|c| c.outcome);
    let candidate = |tier, reason: String, action, score| RemovalCandidate {
        contact_id: contact.id.clone(),
        tier,
        reason,
        suggested_action: action,
        unreachable_score: score,
        total_calls: contact.total_calls,
    };

    if disposition == Some(CallDisposition::DoNotContact) {
        return Some(candidate(
            RemovalTier::DoNotContact,
            "Asked not to be contacted".into(),
            SuggestedAction::Pause12Months,
            None,
        ));
    }
    if outcome == Some(CallOutcome::WrongNumber) {
        return Some(candidate(
            RemovalTier::DoNotContact,
            "Last call reached a wrong number".into(),
            SuggestedAction::Pause12Months,
            None,
        ));
    }
    if let Some(d) = disposition.filter(|d| d.is_not_interested()) {
        return Some(candidate(
            RemovalTier::NotInterested,
            format!("Not interested: {}", disposition_label(d)),
            SuggestedAction::Pause6Months,
            None,
        ));
    }
    if contact.total_calls >= UNREACHABLE_MIN_CALLS {
        let score = unreachable_score(history.iter().map(|c| c.outcome));
        if score >= UNREACHABLE_MIN_SCORE {
            let action = if score >= UNREACHABLE_SEVERE_SCORE {
                SuggestedAction::Throttle14Days
            } else {
                SuggestedAction::Throttle10Days
            };
            return Some(candidate(
                RemovalTier::Unreachable,
                format!("Unreachable: score {score} after {} calls", contact.total_calls),
                action,
                Some(score),
            ));
        }
    }
    None
}

/// Split by tier, sort each tier, and keep the top `limit` of each.
pub fn rank_candidates(candidates: Vec<RemovalCandidate>, limit: usize) -> RemovalCandidates {
    let mut ranked = RemovalCandidates::default();
    for c in candidates {
        match c.tier {
            RemovalTier::DoNotContact => ranked.tier0.push(c),
            RemovalTier::NotInterested => ranked.tier1.push(c),
            RemovalTier::Unreachable => ranked.tier2.push(c),
        }
    }
    ranked.tier0.sort_by(|a, b| b.total_calls.cmp(&a.total_calls));
    ranked.tier1.sort_by(|a, b| b.total_calls.cmp(&a.total_calls));
    ranked
        .tier2
        .sort_by(|a, b| b.unreachable_score.cmp(&a.unreachable_score));
    ranked.tier0.truncate(limit);
    ranked.tier1.truncate(limit);
    ranked.tier2.truncate(limit);
    ranked.total = ranked.tier0.len() + ranked.tier1.len() + ranked.tier2.len();
    ranked
}

impl<S> DialerEngine<S>
where
    S: DialerStore,
{
    /// Tiered removal suggestions among due, eligible, already-called
    /// contacts.
    pub async fn get_removal_candidates(
        &self,
        user_id: &str,
        query: &CandidateQuery,
    ) -> Result<RemovalCandidates, DialerError> {
        let limit = query.limit.unwrap_or(self.config.default_candidate_limit);
        let today = self.today();
        let paused = self.paused_company_set(user_id).await?;
        let population: Vec<ContactRecord> = self
            .scan_contacts(user_id, &ContactFilter::DueBy(today))
            .await?
            .into_iter()
            .filter(|c| is_eligible(c, &paused, today) && c.total_calls >= 1)
            .filter(|c| !(query.exclude_aaa && c.is_aaa))
            .collect();

        let ids: Vec<ContactId> = population.iter().map(|c| c.id.clone()).collect();
        let history = self.recent_call_history(&ids).await?;
        let candidates = population
            .iter()
            .filter_map(|c| {
                let calls = history.get(&c.id).map_or(&[][..], Vec::as_slice);
                classify_contact(c, calls)
            })
            .collect();

        let ranked = rank_candidates(candidates, limit);
        tracing::info!(
            user_id,
            population = population.len(),
            tier0 = ranked.tier0.len(),
            tier1 = ranked.tier1.len(),
            tier2 = ranked.tier2.len(),
            "removal candidates computed"
        );
        Ok(ranked)
    }
}
