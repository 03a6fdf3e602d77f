//! Error types for scheduling and pool-health operations.

use thiserror::Error;

/// Errors produced by engine components.
#[derive(Debug, Error)]
pub enum DialerError {
    /// Backend read or write failed.
    #[error("store error: {0}")]
    Store(String),
    /// Capacity settings violate an invariant.
    #[error("invalid capacity settings: {0}")]
    InvalidSettings(String),
    /// Engine configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A referenced contact does not exist for this user.
    #[error("contact not found: {0}")]
    ContactNotFound(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
