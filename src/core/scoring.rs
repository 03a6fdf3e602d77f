//! "Give up on this contact" score from recent call outcomes.

use std::collections::HashMap;

use crate::core::{CallOutcome, CallRecord, ContactId, DialerEngine, DialerError, DialerStore};

/// Calls considered per contact, most recent first.
pub const CALL_HISTORY_DEPTH: usize = 6;

/// Subtracted once when any considered call connected.
pub const CONNECTED_CREDIT: u32 = 40;

/// Penalty contributed by one outcome.
pub const fn outcome_penalty(outcome: CallOutcome) -> u32 {
    match outcome {
        CallOutcome::NoAnswer => 10,
        CallOutcome::Voicemail => 8,
        CallOutcome::AiScreener => 6,
        CallOutcome::WrongNumber => 5,
        CallOutcome::Gatekeeper => 3,
        CallOutcome::Connected | CallOutcome::Busy | CallOutcome::Skipped => 0,
    }
}

/// Score the first [`CALL_HISTORY_DEPTH`] outcomes (most recent first).
/// A real conversation among them knocks [`CONNECTED_CREDIT`] off; the result
/// never goes below zero.
pub fn unreachable_score(outcomes: impl IntoIterator<Item = CallOutcome>) -> u32 {
    let mut score = 0u32;
    let mut connected = false;
    for outcome in outcomes.into_iter().take(CALL_HISTORY_DEPTH) {
        score += outcome_penalty(outcome);
        connected |= outcome == CallOutcome::Connected;
    }
    if connected {
        score = score.saturating_sub(CONNECTED_CREDIT);
    }
    score
}

/// Group calls by contact, newest first, keeping at most `depth` per contact.
pub fn group_recent_calls(
    calls: impl IntoIterator<Item = CallRecord>,
    depth: usize,
) -> HashMap<ContactId, Vec<CallRecord>> {
    let mut grouped: HashMap<ContactId, Vec<CallRecord>> = HashMap::new();
    for call in calls {
        grouped.entry(call.contact_id.clone()).or_default().push(call);
    }
    for history in grouped.values_mut() {
        history.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        history.truncate(depth);
    }
    grouped
}

impl<S> DialerEngine<S>
where
    S: DialerStore,
{
    /// Recent call history for many contacts, one store read per id chunk.
    pub(crate) async fn recent_call_history(
        &self,
        contact_ids: &[ContactId],
    ) -> Result<HashMap<ContactId, Vec<CallRecord>>, DialerError> {
        let mut calls = Vec::new();
        for chunk in contact_ids.chunks(self.config.chunk_size) {
            calls.extend(self.store.recent_calls(chunk, CALL_HISTORY_DEPTH).await?);
        }
        Ok(group_recent_calls(calls, CALL_HISTORY_DEPTH))
    }

    /// Unreachability score of one contact; 0 with no call history.
    pub async fn compute_unreachable_score(&self, contact_id: &str) -> Result<u32, DialerError> {
        let ids = [contact_id.to_string()];
        let history = self.recent_call_history(&ids).await?;
        Ok(history
            .get(contact_id)
            .map_or(0, |calls| unreachable_score(calls.iter().map(|c| c.outcome))))
    }

    /// Unreachability scores for a batch. Every requested id gets an entry.
    pub async fn compute_unreachable_scores(
        &self,
        contact_ids: &[ContactId],
    ) -> Result<HashMap<ContactId, u32>, DialerError> {
        let history = self.recent_call_history(contact_ids).await?;
        Ok(contact_ids
            .iter()
            .map(|id| {
                let score = history
                    .get(id)
                    .map_or(0, |calls| unreachable_score(calls.iter().map(|c| c.outcome)));
                (id.clone(), score)
            })
            .collect())
    }
}
