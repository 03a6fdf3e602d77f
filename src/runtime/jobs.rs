//! Pool-health job: detect bloat, then shrink the queue when asked to.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, AutoFixReport, BloatReport, DialerEngine, DialerStore};

/// Outcome of one user's health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolHealthReport {
    /// User checked.
    pub user_id: String,
    /// Bloat snapshot taken before any fix.
    pub bloat: BloatReport,
    /// Auto-fix result, when one ran.
    pub fix: Option<AutoFixReport>,
}

/// Check one user's pool. With `auto_fix`, a bloated pool with a positive
/// overage is shrunk by that overage.
pub async fn run_pool_health_check<S>(
    engine: &DialerEngine<S>,
    user_id: &str,
    auto_fix: bool,
) -> AppResult<PoolHealthReport>
where
    S: DialerStore,
{
    let bloat = engine
        .detect_bloat(user_id)
        .await
        .with_context(|| format!("bloat detection failed for user {user_id}"))?;

    let fix = if auto_fix && bloat.is_bloated && bloat.overage > 0 {
        let report = engine
            .auto_fix_bloat(user_id, bloat.overage)
            .await
            .with_context(|| format!("bloat auto-fix failed for user {user_id}"))?;
        Some(report)
    } else {
        None
    };

    Ok(PoolHealthReport {
        user_id: user_id.to_string(),
        bloat,
        fix,
    })
}

/// Check each user in turn. A failing user is logged and skipped.
pub async fn run_pool_health_checks<S>(
    engine: &DialerEngine<S>,
    user_ids: &[String],
    auto_fix: bool,
) -> Vec<PoolHealthReport>
where
    S: DialerStore,
{
    let mut reports = Vec::with_capacity(user_ids.len());
    for user_id in user_ids {
        match run_pool_health_check(engine, user_id, auto_fix).await {
            Ok(report) => reports.push(report),
            Err(e) => tracing::error!(user_id = %user_id, error = %format!("{e:#}"), "pool health check failed"),
        }
    }
    tracing::info!(
        users = user_ids.len(),
        checked = reports.len(),
        bloated = reports.iter().filter(|r| r.bloat.is_bloated).count(),
        "pool health checks complete"
    );
    reports
}
