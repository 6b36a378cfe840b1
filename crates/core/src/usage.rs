//! Usage accounting types — the append-only invocation log and the derived
//! budget status.

use crate::tier::ModelTier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One pipeline invocation, recorded for budget accounting and reporting.
///
/// Append-only: entries are never updated or deleted. Local-answer and
/// cache hits are logged too (zero tokens) so observability covers every
/// request, but they contribute nothing to the weighted spend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageLogEntry {
    pub id: String,
    pub tier: ModelTier,
    pub input_tokens: u32,
    pub output_tokens: u32,
    /// Served from the response cache.
    pub cached: bool,
    /// Served by the local answer matcher (no model involved).
    pub local_answer: bool,
    /// Originating page/context tag.
    pub page: String,
    pub created_at: DateTime<Utc>,
}

impl UsageLogEntry {
    /// Entry for a real model invocation.
    pub fn model_call(tier: ModelTier, input_tokens: u32, output_tokens: u32, page: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tier,
            input_tokens,
            output_tokens,
            cached: false,
            local_answer: false,
            page: page.to_string(),
            created_at: Utc::now(),
        }
    }

    /// Zero-token entry for a local-matcher hit.
    pub fn local_hit(page: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tier: ModelTier::Cheap,
            input_tokens: 0,
            output_tokens: 0,
            cached: false,
            local_answer: true,
            page: page.to_string(),
            created_at: Utc::now(),
        }
    }

    /// Zero-token entry for a response-cache hit.
    pub fn cache_hit(tier: ModelTier, page: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            tier,
            input_tokens: 0,
            output_tokens: 0,
            cached: true,
            local_answer: false,
            page: page.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn total_tokens(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }

    /// Token count scaled by the tier's cost weight.
    pub fn weighted_tokens(&self) -> f64 {
        f64::from(self.total_tokens()) * self.tier.cost_weight()
    }
}

/// Derived budget state — recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBudgetStatus {
    /// Weighted tokens spent so far today.
    pub weighted_used: f64,

    /// Daily limit in weighted tokens.
    pub daily_limit: u64,

    /// Percentage of the daily limit used, capped at 100.
    pub pct_used: f64,

    /// Highest tier the budget currently permits.
    pub tier_cap: ModelTier,

    /// Human-readable note when service is degraded.
    pub warning: Option<String>,
}

/// One row of the administrative usage report: per-day, per-tier totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSummaryRow {
    pub day: String,
    pub tier: ModelTier,
    pub requests: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub weighted_tokens: f64,
}
