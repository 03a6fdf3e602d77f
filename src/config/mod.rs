//! Configuration models: per-user capacity settings and engine tuning.

pub mod capacity;
pub mod engine;

pub use capacity::{CapacitySettings, CapacitySettingsPatch, MAX_SCHEDULE_WINDOW_DAYS};
pub use engine::EngineConfig;
