//! Job entry points for schedulers and operators.

pub mod jobs;

pub use jobs::{run_pool_health_check, run_pool_health_checks, PoolHealthReport};
