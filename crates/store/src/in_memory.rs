//! In-memory backend — useful for testing and ephemeral sessions.

use adjutant_core::answer::CachedResponse;
use adjutant_core::error::StoreError;
use adjutant_core::snapshot::{day_key_for, MetricSnapshot};
use adjutant_core::store::{ResponseStore, SnapshotStore, UsageStore};
use adjutant_core::usage::{UsageLogEntry, UsageSummaryRow};
use async_trait::async_trait;
use chrono::{Duration, Local};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// An in-memory implementation of all three store traits.
///
/// Keeps everything in maps behind `RwLock`s. Expiry semantics match the
/// SQLite backend: reads filter expired cache entries, the sweep removes
/// them.
#[derive(Default)]
pub struct InMemoryStore {
    snapshots: Arc<RwLock<HashMap<String, MetricSnapshot>>>,
    usage: Arc<RwLock<Vec<UsageLogEntry>>>,
    cache: Arc<RwLock<HashMap<String, CachedResponse>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for InMemoryStore {
    async fn upsert(&self, snapshot: &MetricSnapshot) -> Result<(), StoreError> {
        self.snapshots
            .write()
            .await
            .insert(snapshot.day.clone(), snapshot.clone());
        Ok(())
    }

    async fn get(&self, day: &str) -> Result<Option<MetricSnapshot>, StoreError> {
        Ok(self.snapshots.read().await.get(day).cloned())
    }
}

#[async_trait]
impl UsageStore for InMemoryStore {
    async fn append(&self, entry: &UsageLogEntry) -> Result<(), StoreError> {
        self.usage.write().await.push(entry.clone());
        Ok(())
    }

    async fn entries_for_day(&self, day: &str) -> Result<Vec<UsageLogEntry>, StoreError> {
        Ok(self
            .usage
            .read()
            .await
            .iter()
            .filter(|e| day_key_for(e.created_at) == day)
            .cloned()
            .collect())
    }

    async fn summary(&self, days: u32) -> Result<Vec<UsageSummaryRow>, StoreError> {
        let cutoff = Local::now().date_naive() - Duration::days(i64::from(days.saturating_sub(1)));
        let cutoff_key = adjutant_core::snapshot::day_key(cutoff);

        // BTreeMap keyed by (day, tier) gives deterministic row ordering.
        let mut groups: BTreeMap<(String, adjutant_core::ModelTier), UsageSummaryRow> =
            BTreeMap::new();

        for entry in self.usage.read().await.iter() {
            let day = day_key_for(entry.created_at);
            if day < cutoff_key {
                continue;
            }
            let row = groups
                .entry((day.clone(), entry.tier))
                .or_insert_with(|| UsageSummaryRow {
                    day,
                    tier: entry.tier,
                    requests: 0,
                    input_tokens: 0,
                    output_tokens: 0,
                    weighted_tokens: 0.0,
                });
            row.requests += 1;
            row.input_tokens += u64::from(entry.input_tokens);
            row.output_tokens += u64::from(entry.output_tokens);
            row.weighted_tokens += entry.weighted_tokens();
        }

        let mut rows: Vec<UsageSummaryRow> = groups.into_values().collect();
        rows.sort_by(|a, b| b.day.cmp(&a.day).then(a.tier.cmp(&b.tier)));
        Ok(rows)
    }
}

#[async_trait]
impl ResponseStore for InMemoryStore {
    async fn get(&self, fingerprint: &str) -> Result<Option<CachedResponse>, StoreError> {
        Ok(self
            .cache
            .read()
            .await
            .get(fingerprint)
            .filter(|r| !r.is_expired())
            .cloned())
    }

    async fn put(&self, response: &CachedResponse) -> Result<(), StoreError> {
        self.cache
            .write()
            .await
            .insert(response.fingerprint.clone(), response.clone());
        Ok(())
    }

    async fn cleanup_expired(&self) -> Result<u64, StoreError> {
        let mut cache = self.cache.write().await;
        let before = cache.len();
        cache.retain(|_, r| !r.is_expired());
        Ok((before - cache.len()) as u64)
    }
}
