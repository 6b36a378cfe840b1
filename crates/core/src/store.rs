//! Store traits — the three external-store-backed shared resources.
//!
//! The pipeline is stateless between requests except for these: the
//! persisted per-day snapshot, the append-only usage log, and the response
//! cache. All three rely on the store's own atomicity for single-row
//! upserts/inserts; no application-level locking is required.

use crate::answer::CachedResponse;
use crate::error::StoreError;
use crate::snapshot::MetricSnapshot;
use crate::usage::{UsageLogEntry, UsageSummaryRow};
use async_trait::async_trait;

/// One row per calendar day, holding the snapshot blob.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist a snapshot keyed by its day. Idempotent: re-running for the
    /// same day replaces the prior value.
    async fn upsert(&self, snapshot: &MetricSnapshot) -> Result<(), StoreError>;

    /// Read the snapshot for a day, if one exists.
    async fn get(&self, day: &str) -> Result<Option<MetricSnapshot>, StoreError>;
}

/// Append-only usage log with day-windowed reads.
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Append one entry. Never updates existing rows.
    async fn append(&self, entry: &UsageLogEntry) -> Result<(), StoreError>;

    /// All entries whose timestamp falls on the given local calendar day.
    async fn entries_for_day(&self, day: &str) -> Result<Vec<UsageLogEntry>, StoreError>;

    /// Per-day, per-tier aggregates over the most recent `days` days.
    async fn summary(&self, days: u32) -> Result<Vec<UsageSummaryRow>, StoreError>;
}

/// Keyed store with expiry for cached model answers.
///
/// Expiry is enforced twice, deliberately: `get` never returns an expired
/// entry even if the sweep has not run, and `cleanup_expired` reclaims
/// storage on a schedule. A missed sweep cycle can only cost disk, never
/// serve stale answers.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Fetch a cached response; `None` for missing *or expired* entries.
    async fn get(&self, fingerprint: &str) -> Result<Option<CachedResponse>, StoreError>;

    /// Store a response, overwriting any prior entry for the fingerprint.
    async fn put(&self, response: &CachedResponse) -> Result<(), StoreError>;

    /// Remove all expired entries. Returns how many were removed.
    async fn cleanup_expired(&self) -> Result<u64, StoreError>;
}
