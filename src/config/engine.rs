//! Engine-wide tuning: page sizes, chunking and window-extension bounds.

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::store::MAX_ID_CHUNK;

/// Engine configuration shared by all users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rows per paginated contact read.
    pub page_size: usize,
    /// Ids per `id in (...)` read or update.
    pub chunk_size: usize,
    /// Business days added each time the scheduling window is saturated.
    pub extension_step_days: usize,
    /// Window extensions allowed in one scheduling pass.
    pub max_window_extensions: usize,
    /// Per-tier limit used when a candidate query does not set one.
    pub default_candidate_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: 1000,
            chunk_size: MAX_ID_CHUNK,
            extension_step_days: 10,
            max_window_extensions: 12,
            default_candidate_limit: 100,
        }
    }
}

impl EngineConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.page_size == 0 {
            return Err("page_size must be greater than 0".into());
        }
        if self.chunk_size == 0 || self.chunk_size > MAX_ID_CHUNK {
            return Err(format!("chunk_size must be between 1 and {MAX_ID_CHUNK}"));
        }
        if self.extension_step_days == 0 {
            return Err("extension_step_days must be greater than 0".into());
        }
        if self.default_candidate_limit == 0 {
            return Err("default_candidate_limit must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults overridden by `DIALER_*` environment variables, after loading
    /// a `.env` file if one is present.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        let mut cfg = Self::default();
        read_var("DIALER_PAGE_SIZE", &mut cfg.page_size)?;
        read_var("DIALER_CHUNK_SIZE", &mut cfg.chunk_size)?;
        read_var("DIALER_EXTENSION_STEP_DAYS", &mut cfg.extension_step_days)?;
        read_var("DIALER_MAX_WINDOW_EXTENSIONS", &mut cfg.max_window_extensions)?;
        read_var("DIALER_DEFAULT_CANDIDATE_LIMIT", &mut cfg.default_candidate_limit)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

fn read_var<T>(name: &str, slot: &mut T) -> Result<(), String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => {
            *slot = raw
                .trim()
                .parse()
                .map_err(|e| format!("{name}: invalid value `{raw}`: {e}"))?;
            Ok(())
        }
        Err(env::VarError::NotPresent) => Ok(()),
        Err(e) => Err(format!("{name}: {e}")),
    }
}
