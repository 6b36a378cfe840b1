//! The answer pipeline — orchestrates the cost ladder end to end.
//!
//! Each request walks the ladder cheapest-first: local pattern match
//! against the daily snapshot, then the response cache, then a model call
//! at the highest tier the daily budget currently permits. Every rung is
//! logged (zero tokens for local and cache hits), so observability covers
//! all traffic while only real model calls spend budget.
//!
//! Failure policy follows the availability-first design: upstream context
//! failures degrade to "No data" prompts, cache failures are treated as
//! misses, usage-log failures are swallowed. Only a provider failure
//! surfaces to the caller, as a typed error with no silent tier fallback.

pub mod fingerprint;

use std::sync::Arc;

use adjutant_answers::try_local_answer;
use adjutant_budget::TokenBudgetTracker;
use adjutant_context::{assemble, estimate_tokens};
use adjutant_core::answer::{Answer, CachedResponse, ServedBy};
use adjutant_core::context_data::RawContextData;
use adjutant_core::provider::{ContextSource, ModelProvider};
use adjutant_core::snapshot::{today_key, MetricSnapshot};
use adjutant_core::store::{ResponseStore, SnapshotStore, UsageStore};
use adjutant_core::tier::ModelTier;
use adjutant_core::usage::{UsageLogEntry, UsageSummaryRow};
use adjutant_core::{Error, Result};
use adjutant_snapshot::SnapshotService;
use chrono::Utc;
use tracing::{debug, info, warn};

pub use fingerprint::fingerprint;

/// The orchestrator. Cheap to construct; all state lives in the stores.
pub struct AnswerPipeline {
    source: Arc<dyn ContextSource>,
    snapshots: SnapshotService,
    responses: Arc<dyn ResponseStore>,
    budget: TokenBudgetTracker,
    provider: Arc<dyn ModelProvider>,
}

impl AnswerPipeline {
    pub fn new(
        source: Arc<dyn ContextSource>,
        snapshot_store: Arc<dyn SnapshotStore>,
        usage_store: Arc<dyn UsageStore>,
        response_store: Arc<dyn ResponseStore>,
        provider: Arc<dyn ModelProvider>,
        daily_token_limit: u64,
    ) -> Self {
        Self {
            snapshots: SnapshotService::new(source.clone(), snapshot_store),
            source,
            responses: response_store,
            budget: TokenBudgetTracker::new(usage_store, daily_token_limit),
            provider,
        }
    }

    /// Answer a question in the context of the user's current page.
    ///
    /// `requested_tier` is the caller's preference; it is clamped *down*
    /// to the budget ceiling, never up. `None` requests the best
    /// currently-permitted tier.
    pub async fn answer(
        &self,
        question: &str,
        current_page: &str,
        requested_tier: Option<ModelTier>,
    ) -> Result<Answer> {
        // 1. Today's snapshot. A failure here only disables local
        //    matching; the request continues.
        let snapshot = match self.snapshots.get_or_build(&today_key()).await {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                warn!(error = %err, "snapshot unavailable, skipping local matching");
                None
            }
        };

        // 2. Local pattern match — free, answers immediately.
        if let Some(local) = try_local_answer(question, snapshot.as_ref()) {
            self.budget
                .log_usage(&UsageLogEntry::local_hit(current_page))
                .await;
            return Ok(Answer {
                text: local.text,
                suggestions: local.suggestions,
                served_by: ServedBy::Local,
            });
        }

        // 3. Response cache, keyed by the tier the caller asked for.
        let tentative = requested_tier.unwrap_or(ModelTier::Premium);
        let fp = fingerprint(question, current_page, tentative);
        match self.responses.get(&fp).await {
            Ok(Some(cached)) => {
                debug!(fingerprint = %fp, tier = %cached.tier, "cache hit");
                self.budget
                    .log_usage(&UsageLogEntry::cache_hit(cached.tier, current_page))
                    .await;
                return Ok(Answer {
                    text: cached.answer,
                    suggestions: Vec::new(),
                    served_by: ServedBy::Cache,
                });
            }
            Ok(None) => {}
            // A cache outage is a miss, never a failure.
            Err(err) => warn!(error = %err, "response cache unavailable, treating as miss"),
        }

        // 4. Budget ceiling; clamp the requested tier down to it.
        let status = self.budget.status().await;
        let tier = tentative.clamp_to(status.tier_cap);
        if let Some(warning) = &status.warning {
            info!(pct = status.pct_used, %tier, "{warning}");
        }

        // 5. Assemble context at the level the clamped tier affords.
        let raw = match self.source.fetch_raw_context().await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "raw context unavailable, prompting with no data");
                RawContextData::default()
            }
        };
        let context = assemble(&raw, current_page, tier.detail_level());
        debug!(
            tier = %tier,
            context_tokens = estimate_tokens(&context),
            "assembled model context"
        );

        // 6. The model call. Provider errors propagate typed; there is no
        //    silent retry at a different tier.
        let completion = self
            .provider
            .complete(tier, &context, question)
            .await
            .map_err(Error::Provider)?;

        let now = Utc::now();
        let ttl = chrono::Duration::seconds(tier.cache_ttl().as_secs() as i64);
        let cached = CachedResponse {
            fingerprint: fp,
            answer: completion.text.clone(),
            tier,
            created_at: now,
            expires_at: now + ttl,
        };
        if let Err(err) = self.responses.put(&cached).await {
            warn!(error = %err, "failed to cache model answer");
        }

        self.budget
            .log_usage(&UsageLogEntry::model_call(
                tier,
                completion.input_tokens,
                completion.output_tokens,
                current_page,
            ))
            .await;

        Ok(Answer {
            text: completion.text,
            suggestions: Vec::new(),
            served_by: ServedBy::Model(tier),
        })
    }

    /// Build and persist today's snapshot. Safe to run on a schedule and
    /// safe to run redundantly.
    pub async fn build_snapshot_today(&self) -> Result<MetricSnapshot> {
        self.snapshots.build_today().await
    }

    /// Read (or lazily build) the snapshot for a day.
    pub async fn snapshot_for(&self, day: &str) -> Result<MetricSnapshot> {
        self.snapshots.get_or_build(day).await
    }

    /// Current budget status for today.
    pub async fn budget_status(&self) -> adjutant_core::usage::TokenBudgetStatus {
        self.budget.status().await
    }

    /// Per-day, per-tier usage report over the most recent `days` days.
    pub async fn usage_summary(&self, days: u32) -> Result<Vec<UsageSummaryRow>> {
        self.budget.summary(days).await
    }

    /// Sweep expired cache entries; returns how many were removed.
    pub async fn cleanup_cache(&self) -> Result<u64> {
        let removed = self.responses.cleanup_expired().await?;
        if removed > 0 {
            info!(removed, "expired cache entries removed");
        }
        Ok(removed)
    }
}
