//! The single callability predicate shared by every counting, scheduling and
//! classifying component.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::core::{CompanyId, CompanyRecord, ContactRecord};

/// A contact is retired after this many attempts regardless of outcome.
pub const MAX_CALL_ATTEMPTS: u32 = 10;

/// Whether a contact may be dialed on `today`, given its own state and the
/// set of currently paused companies.
///
/// A contact-level pause window counts like a company pause: it holds while
/// `paused_until` is strictly after `today`.
pub fn is_eligible(
    contact: &ContactRecord,
    paused_company_ids: &HashSet<CompanyId>,
    today: NaiveDate,
) -> bool {
    if !contact.has_phone() {
        return false;
    }
    if contact.dialer_status.is_some_and(|s| s.is_retired()) {
        return false;
    }
    if contact.paused_until.is_some_and(|until| until > today) {
        return false;
    }
    if contact.total_calls >= MAX_CALL_ATTEMPTS {
        return false;
    }
    if let Some(company) = &contact.company_id {
        if paused_company_ids.contains(company) {
            return false;
        }
    }
    true
}

/// Ids of companies whose pause ends strictly after `today`.
pub fn paused_company_ids<'a>(
    companies: impl IntoIterator<Item = &'a CompanyRecord>,
    today: NaiveDate,
) -> HashSet<CompanyId> {
    companies
        .into_iter()
        .filter(|c| c.dialer_paused_until.is_some_and(|until| until > today))
        .map(|c| c.id.clone())
        .collect()
}
