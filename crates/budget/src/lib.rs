//! Daily token budget: a shared, cost-weighted spend window that degrades
//! service by lowering the permitted model tier, never by refusing to
//! answer.
//!
//! The tracker is stateless — `status()` recomputes the weighted total
//! from today's usage rows on every call, so there is no counter to drift
//! or reset. On a store outage it fails open (full capability, zero
//! measured spend): one day of unmetered usage is an accepted cost of
//! keeping the assistant available.

use std::sync::Arc;

use adjutant_core::snapshot::today_key;
use adjutant_core::store::UsageStore;
use adjutant_core::tier::ModelTier;
use adjutant_core::usage::{TokenBudgetStatus, UsageLogEntry, UsageSummaryRow};
use adjutant_core::Result;
use tracing::{debug, warn};

/// Computes budget status from the usage log and records new usage.
pub struct TokenBudgetTracker {
    usage: Arc<dyn UsageStore>,
    daily_limit: u64,
}

impl TokenBudgetTracker {
    pub fn new(usage: Arc<dyn UsageStore>, daily_limit: u64) -> Self {
        Self { usage, daily_limit }
    }

    /// Current budget state for today's local calendar day.
    ///
    /// Never returns an error: a store failure yields the fail-open status
    /// (pct 0, premium cap, no warning) with a warning log.
    pub async fn status(&self) -> TokenBudgetStatus {
        let entries = match self.usage.entries_for_day(&today_key()).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "usage store unavailable, budget failing open");
                return TokenBudgetStatus {
                    weighted_used: 0.0,
                    daily_limit: self.daily_limit,
                    pct_used: 0.0,
                    tier_cap: ModelTier::Premium,
                    warning: None,
                };
            }
        };

        let weighted_used: f64 = entries.iter().map(UsageLogEntry::weighted_tokens).sum();
        let pct_used = if self.daily_limit == 0 {
            100.0
        } else {
            (weighted_used / self.daily_limit as f64 * 100.0).min(100.0)
        };

        let (tier_cap, warning) = ceiling_for(pct_used);
        debug!(weighted_used, pct_used, ?tier_cap, "budget status computed");

        TokenBudgetStatus {
            weighted_used,
            daily_limit: self.daily_limit,
            pct_used,
            tier_cap,
            warning,
        }
    }

    /// Append a usage entry. Fire-and-forget: a store failure is logged
    /// and swallowed so it can never fail the request being recorded.
    pub async fn log_usage(&self, entry: &UsageLogEntry) {
        if let Err(err) = self.usage.append(entry).await {
            warn!(error = %err, entry_id = %entry.id, "failed to record usage entry");
        }
    }

    /// Per-day, per-tier report over the most recent `days` days.
    pub async fn summary(&self, days: u32) -> Result<Vec<UsageSummaryRow>> {
        self.usage.summary(days).await.map_err(Into::into)
    }
}

/// The tier ceiling step function. First matching threshold wins; the
/// permitted tier only ever goes down as pct goes up.
fn ceiling_for(pct: f64) -> (ModelTier, Option<String>) {
    if pct >= 100.0 {
        (ModelTier::Cheap, Some("budget exhausted.".to_string()))
    } else if pct >= 95.0 {
        (
            ModelTier::Cheap,
            Some("budget nearly exhausted, downgraded to cheapest tier.".to_string()),
        )
    } else if pct >= 80.0 {
        (
            ModelTier::Mid,
            Some("budget at 80%, premium tier temporarily disabled.".to_string()),
        )
    } else {
        (ModelTier::Premium, None)
    }
}
