//! # Prometheus Dialer Pool
//!
//! Capacity-based outreach scheduling and pool-health engine for a sales
//! power dialer.
//!
//! Every contact in a salesperson's book gets a `next_call_date` on a
//! business day. The engine keeps each day under a throughput target, with
//! a separate ceiling for never-called contacts, and watches the live
//! "due today" queue for bloat.
//!
//! ## Key Features
//!
//! - **Capacity Scheduling**: least-loaded placement over a business-day
//!   window, extended in bounded steps when saturated
//! - **Bloat Detection**: due-today queue compared against per-user thresholds
//! - **Removal Candidates**: tiered pause/throttle suggestions from call
//!   dispositions and an unreachability score
//! - **Auto-Fix**: greedy remediation, lowest tier first, with an audit trail
//! - **Storage-Agnostic**: everything goes through the [`DialerStore`](core::DialerStore) trait
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use prometheus_dialer_pool::builders::EngineBuilder;
//! use prometheus_dialer_pool::core::ScheduleOptions;
//! use prometheus_dialer_pool::infra::InMemoryStore;
//!
//! let engine = EngineBuilder::new(Arc::new(InMemoryStore::new())).build()?;
//! let result = engine
//!     .schedule_contacts("user-1", &ids, &ScheduleOptions::default())
//!     .await?;
//! let health = engine.detect_bloat("user-1").await?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions and capacity accounting.
pub mod core;
/// Per-user capacity settings and engine configuration.
pub mod config;
/// Builders to construct engines from configuration.
pub mod builders;
/// Infrastructure adapters for storage backends.
pub mod infra;
/// Job entry points for schedulers and operators.
pub mod runtime;
/// Shared utilities.
pub mod util;
