//! Per-user capacity settings.

use serde::{Deserialize, Serialize};

/// Upper bound on the scheduling window (roughly one business year).
pub const MAX_SCHEDULE_WINDOW_DAYS: u32 = 260;

/// Daily throughput and pool-health thresholds for one user.
///
/// Missing rows fall back to [`CapacitySettings::default`]; partial updates
/// go through [`CapacitySettings::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacitySettings {
    /// Contacts scheduled per business day.
    pub target_per_day: u32,
    /// Of those, how many may be never-called contacts.
    pub new_quota_per_day: u32,
    /// Business days the scheduler spreads work across.
    pub schedule_window_days: u32,
    /// Due-today count at which the pool counts as bloated.
    pub bloat_threshold: u32,
}

impl Default for CapacitySettings {
    fn default() -> Self {
        Self {
            target_per_day: 600,
            new_quota_per_day: 150,
            schedule_window_days: 20,
            bloat_threshold: 800,
        }
    }
}

/// Partial update of [`CapacitySettings`]; `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacitySettingsPatch {
    /// New daily target.
    pub target_per_day: Option<u32>,
    /// New daily quota for never-called contacts.
    pub new_quota_per_day: Option<u32>,
    /// New window length.
    pub schedule_window_days: Option<u32>,
    /// New bloat threshold.
    pub bloat_threshold: Option<u32>,
}

impl CapacitySettings {
    /// Validate settings values.
    pub fn validate(&self) -> Result<(), String> {
        if self.target_per_day == 0 {
            return Err("target_per_day must be greater than 0".into());
        }
        if self.new_quota_per_day > self.target_per_day {
            return Err(format!(
                "new_quota_per_day ({}) must not exceed target_per_day ({})",
                self.new_quota_per_day, self.target_per_day
            ));
        }
        if self.schedule_window_days == 0 || self.schedule_window_days > MAX_SCHEDULE_WINDOW_DAYS {
            return Err(format!(
                "schedule_window_days must be between 1 and {MAX_SCHEDULE_WINDOW_DAYS}"
            ));
        }
        if self.bloat_threshold == 0 {
            return Err("bloat_threshold must be greater than 0".into());
        }
        Ok(())
    }

    /// Overlay the set fields of `patch` on these settings.
    #[must_use]
    pub fn merge(self, patch: &CapacitySettingsPatch) -> Self {
        Self {
            target_per_day: patch.target_per_day.unwrap_or(self.target_per_day),
            new_quota_per_day: patch.new_quota_per_day.unwrap_or(self.new_quota_per_day),
            schedule_window_days: patch
                .schedule_window_days
                .unwrap_or(self.schedule_window_days),
            bloat_threshold: patch.bloat_threshold.unwrap_or(self.bloat_threshold),
        }
    }
}
