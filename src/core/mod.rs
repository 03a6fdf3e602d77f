//! Core scheduling abstractions and capacity accounting.

pub mod audit;
pub mod backfill;
pub mod bloat;
pub mod capacity;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod model;
pub mod removal;
pub mod scheduler;
pub mod scoring;
pub mod store;

pub use audit::{build_pause_event, InMemoryPoolEventLog, PoolEvent, PoolEventAction};
pub use backfill::{BackfillPreview, UnscheduledCounts};
pub use bloat::{
    evaluate_bloat, select_fixes, AutoFixReport, BloatFix, BloatReport, FixOutcome,
};
pub use capacity::{find_best_day, CapacityBucket, DailyLimits, DueToday};
pub use eligibility::{is_eligible, paused_company_ids, MAX_CALL_ATTEMPTS};
pub use engine::DialerEngine;
pub use error::{AppResult, DialerError};
pub use model::{
    CallDisposition, CallOutcome, CallRecord, CompanyId, CompanyRecord, ContactId,
    ContactRecord, DialerStatus, UserId,
};
pub use removal::{
    classify_contact, CandidateQuery, RemovalCandidate, RemovalCandidates, RemovalTier,
    SuggestedAction,
};
pub use scheduler::{Assignment, DayCount, ScheduleOptions, ScheduleResult};
pub use scoring::{unreachable_score, CALL_HISTORY_DEPTH};
pub use store::{ContactFilter, ContactPatch, DialerStore, PageRequest, MAX_ID_CHUNK};
