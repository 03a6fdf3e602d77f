//! Contact, company and call records as seen by the scheduling engine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Contact identifier.
pub type ContactId = String;
/// Company identifier.
pub type CompanyId = String;
/// Owning salesperson identifier.
pub type UserId = String;

/// Dialer lifecycle state of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialerStatus {
    /// In rotation.
    Active,
    /// Temporarily removed from rotation.
    Paused,
    /// All attempts used up.
    Exhausted,
    /// Became a customer or opportunity.
    Converted,
}

impl DialerStatus {
    /// Whether this status removes the contact from rotation.
    pub const fn is_retired(self) -> bool {
        matches!(self, Self::Paused | Self::Exhausted | Self::Converted)
    }
}

/// Outcome recorded for a single call attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    /// A live conversation.
    Connected,
    /// Left a voicemail.
    Voicemail,
    /// Rang out.
    NoAnswer,
    /// Line busy.
    Busy,
    /// Number does not belong to the contact.
    WrongNumber,
    /// Stopped by a gatekeeper.
    Gatekeeper,
    /// Stopped by an automated call screener.
    AiScreener,
    /// Rep skipped the contact.
    Skipped,
}

/// What a connected call concluded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallDisposition {
    /// Booked a meeting.
    InterestedMeeting,
    /// Asked for more information.
    InterestedInfo,
    /// Asked to be called back.
    Callback,
    /// Not a fit.
    NotInterestedFit,
    /// Happy with an existing solution.
    NotInterestedSolution,
    /// No budget.
    NotInterestedBudget,
    /// Asked never to be contacted again.
    DoNotContact,
}

impl CallDisposition {
    /// One of the three "not interested" dispositions.
    pub const fn is_not_interested(self) -> bool {
        matches!(
            self,
            Self::NotInterestedFit | Self::NotInterestedSolution | Self::NotInterestedBudget
        )
    }
}

/// The scheduling-relevant projection of a contact row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    /// Contact identifier.
    pub id: ContactId,
    /// Owning user.
    pub user_id: UserId,
    /// Primary phone number.
    pub phone: Option<String>,
    /// Mobile phone number.
    pub mobile: Option<String>,
    /// Dialer state; `None` is treated as active.
    pub dialer_status: Option<DialerStatus>,
    /// Number of recorded call attempts.
    pub total_calls: u32,
    /// Next scheduled call date; `None` means unscheduled.
    pub next_call_date: Option<NaiveDate>,
    /// Owning company, if any.
    pub company_id: Option<CompanyId>,
    /// Priority account flag.
    pub is_aaa: bool,
    /// Recurring call spacing override set by throttling.
    pub cadence_days: Option<u32>,
    /// End of the current pause window.
    pub paused_until: Option<NaiveDate>,
    /// Reason code stamped when the contact was paused.
    pub pause_reason: Option<String>,
}

impl ContactRecord {
    /// A fresh, unscheduled, never-called contact with no numbers.
    pub fn new(id: impl Into<ContactId>, user_id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            phone: None,
            mobile: None,
            dialer_status: None,
            total_calls: 0,
            next_call_date: None,
            company_id: None,
            is_aaa: false,
            cadence_days: None,
            paused_until: None,
            pause_reason: None,
        }
    }

    /// Set the primary phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// At least one non-blank phone or mobile number.
    pub fn has_phone(&self) -> bool {
        let present = |n: &Option<String>| n.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.phone) || present(&self.mobile)
    }

    /// Never called.
    pub const fn is_new(&self) -> bool {
        self.total_calls == 0
    }
}

/// The scheduling-relevant projection of a company row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Company identifier.
    pub id: CompanyId,
    /// Owning user.
    pub user_id: UserId,
    /// Every contact of the company is ineligible until after this date.
    pub dialer_paused_until: Option<NaiveDate>,
}

/// An immutable call log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Call identifier.
    pub id: String,
    /// Contact that was called.
    pub contact_id: ContactId,
    /// Call outcome.
    pub outcome: CallOutcome,
    /// Disposition, set only for connected calls.
    pub disposition: Option<CallDisposition>,
    /// When the call started.
    pub started_at: DateTime<Utc>,
}
