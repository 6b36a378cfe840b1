//! SQLite backend for all three store traits.
//!
//! Uses a single SQLite database file with three tables:
//! - `snapshots` — one row per calendar day holding the snapshot blob
//! - `usage_log` — append-only usage entries with a day index
//! - `response_cache` — keyed model answers with an expiry timestamp
//!
//! Correctness under concurrent requests relies on SQLite's own atomicity
//! for single-row upserts/inserts; no application-level locking.

use adjutant_core::answer::CachedResponse;
use adjutant_core::error::StoreError;
use adjutant_core::snapshot::{day_key_for, MetricSnapshot};
use adjutant_core::store::{ResponseStore, SnapshotStore, UsageStore};
use adjutant_core::tier::ModelTier;
use adjutant_core::usage::{UsageLogEntry, UsageSummaryRow};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

/// A production SQLite store backing snapshots, usage, and the response cache.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store from a file path.
    ///
    /// The database and all tables/indexes are created automatically.
    /// Pass `"sqlite::memory:"` for an in-process ephemeral database
    /// (useful for tests).
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite store initialized at {path}");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Run schema migrations — creates the three tables and the day index.
    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS snapshots (
                day         TEXT PRIMARY KEY,
                data        TEXT NOT NULL,
                captured_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("snapshots table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS usage_log (
                id            TEXT PRIMARY KEY,
                day           TEXT NOT NULL,
                tier          TEXT NOT NULL,
                input_tokens  INTEGER NOT NULL,
                output_tokens INTEGER NOT NULL,
                cached        INTEGER NOT NULL DEFAULT 0,
                local_answer  INTEGER NOT NULL DEFAULT 0,
                page          TEXT NOT NULL DEFAULT '',
                created_at    TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("usage_log table: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_usage_log_day ON usage_log(day)")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::MigrationFailed(format!("usage_log day index: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS response_cache (
                fingerprint TEXT PRIMARY KEY,
                answer      TEXT NOT NULL,
                tier        TEXT NOT NULL,
                created_at  TEXT NOT NULL,
                expires_at  TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("response_cache table: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    fn parse_timestamp(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }

    fn row_to_usage_entry(row: &sqlx::sqlite::SqliteRow) -> Result<UsageLogEntry, StoreError> {
        let tier_str: String = row
            .try_get("tier")
            .map_err(|e| StoreError::QueryFailed(format!("tier column: {e}")))?;
        let tier = ModelTier::from_str(&tier_str)
            .map_err(|e| StoreError::QueryFailed(format!("tier column: {e}")))?;

        let created_at_str: String = row
            .try_get("created_at")
            .map_err(|e| StoreError::QueryFailed(format!("created_at column: {e}")))?;

        Ok(UsageLogEntry {
            id: row
                .try_get("id")
                .map_err(|e| StoreError::QueryFailed(format!("id column: {e}")))?,
            tier,
            input_tokens: row
                .try_get::<i64, _>("input_tokens")
                .map_err(|e| StoreError::QueryFailed(format!("input_tokens column: {e}")))?
                as u32,
            output_tokens: row
                .try_get::<i64, _>("output_tokens")
                .map_err(|e| StoreError::QueryFailed(format!("output_tokens column: {e}")))?
                as u32,
            cached: row.try_get::<i64, _>("cached").unwrap_or(0) != 0,
            local_answer: row.try_get::<i64, _>("local_answer").unwrap_or(0) != 0,
            page: row.try_get("page").unwrap_or_default(),
            created_at: Self::parse_timestamp(&created_at_str),
        })
    }
}

#[async_trait]
impl SnapshotStore for SqliteStore {
    async fn upsert(&self, snapshot: &MetricSnapshot) -> Result<(), StoreError> {
        let data = serde_json::to_string(snapshot)
            .map_err(|e| StoreError::Storage(format!("Snapshot serialization: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO snapshots (day, data, captured_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(day) DO UPDATE SET
                data = excluded.data,
                captured_at = excluded.captured_at
            "#,
        )
        .bind(&snapshot.day)
        .bind(&data)
        .bind(snapshot.captured_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("Snapshot upsert failed: {e}")))?;

        debug!("Upserted snapshot for {}", snapshot.day);
        Ok(())
    }

    async fn get(&self, day: &str) -> Result<Option<MetricSnapshot>, StoreError> {
        let row = sqlx::query("SELECT data FROM snapshots WHERE day = ?1")
            .bind(day)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("Snapshot read: {e}")))?;

        match row {
            Some(r) => {
                let data: String = r
                    .try_get("data")
                    .map_err(|e| StoreError::QueryFailed(format!("data column: {e}")))?;
                let snapshot = serde_json::from_str(&data)
                    .map_err(|e| StoreError::QueryFailed(format!("Snapshot blob parse: {e}")))?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UsageStore for SqliteStore {
    async fn append(&self, entry: &UsageLogEntry) -> Result<(), StoreError> {
        // Day column is derived at write time so day-windowed reads stay a
        // plain indexed equality instead of a timezone conversion in SQL.
        let day = day_key_for(entry.created_at);

        sqlx::query(
            r#"
            INSERT INTO usage_log
                (id, day, tier, input_tokens, output_tokens, cached, local_answer, page, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&entry.id)
        .bind(&day)
        .bind(entry.tier.as_str())
        .bind(i64::from(entry.input_tokens))
        .bind(i64::from(entry.output_tokens))
        .bind(i64::from(entry.cached))
        .bind(i64::from(entry.local_answer))
        .bind(&entry.page)
        .bind(entry.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("Usage insert failed: {e}")))?;

        Ok(())
    }

    async fn entries_for_day(&self, day: &str) -> Result<Vec<UsageLogEntry>, StoreError> {
        let rows = sqlx::query("SELECT * FROM usage_log WHERE day = ?1 ORDER BY created_at")
            .bind(day)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("Usage day read: {e}")))?;

        rows.iter().map(Self::row_to_usage_entry).collect()
    }

    async fn summary(&self, days: u32) -> Result<Vec<UsageSummaryRow>, StoreError> {
        let cutoff = Local::now().date_naive() - Duration::days(i64::from(days.saturating_sub(1)));
        let cutoff_key = adjutant_core::snapshot::day_key(cutoff);

        let rows = sqlx::query(
            r#"
            SELECT day, tier,
                   COUNT(*)           AS requests,
                   SUM(input_tokens)  AS input_tokens,
                   SUM(output_tokens) AS output_tokens
            FROM usage_log
            WHERE day >= ?1
            GROUP BY day, tier
            ORDER BY day DESC, tier
            "#,
        )
        .bind(&cutoff_key)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("Usage summary: {e}")))?;

        rows.iter()
            .map(|row| {
                let tier_str: String = row
                    .try_get("tier")
                    .map_err(|e| StoreError::QueryFailed(format!("tier column: {e}")))?;
                let tier = ModelTier::from_str(&tier_str)
                    .map_err(|e| StoreError::QueryFailed(format!("tier column: {e}")))?;
                let input: i64 = row.try_get("input_tokens").unwrap_or(0);
                let output: i64 = row.try_get("output_tokens").unwrap_or(0);
                let requests: i64 = row.try_get("requests").unwrap_or(0);

                Ok(UsageSummaryRow {
                    day: row
                        .try_get("day")
                        .map_err(|e| StoreError::QueryFailed(format!("day column: {e}")))?,
                    tier,
                    requests: requests as u64,
                    input_tokens: input as u64,
                    output_tokens: output as u64,
                    weighted_tokens: (input + output) as f64 * tier.cost_weight(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl ResponseStore for SqliteStore {
    async fn get(&self, fingerprint: &str) -> Result<Option<CachedResponse>, StoreError> {
        let row = sqlx::query("SELECT * FROM response_cache WHERE fingerprint = ?1")
            .bind(fingerprint)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("Cache read: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let tier_str: String = row
            .try_get("tier")
            .map_err(|e| StoreError::QueryFailed(format!("tier column: {e}")))?;
        let tier = ModelTier::from_str(&tier_str)
            .map_err(|e| StoreError::QueryFailed(format!("tier column: {e}")))?;
        let created_at: String = row
            .try_get("created_at")
            .map_err(|e| StoreError::QueryFailed(format!("created_at column: {e}")))?;
        let expires_at: String = row
            .try_get("expires_at")
            .map_err(|e| StoreError::QueryFailed(format!("expires_at column: {e}")))?;

        let response = CachedResponse {
            fingerprint: fingerprint.to_string(),
            answer: row
                .try_get("answer")
                .map_err(|e| StoreError::QueryFailed(format!("answer column: {e}")))?,
            tier,
            created_at: Self::parse_timestamp(&created_at),
            expires_at: Self::parse_timestamp(&expires_at),
        };

        // Read-time expiry check: never serve stale data, even if the
        // cleanup sweep has not run yet.
        if response.is_expired() {
            return Ok(None);
        }

        Ok(Some(response))
    }

    async fn put(&self, response: &CachedResponse) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO response_cache (fingerprint, answer, tier, created_at, expires_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(fingerprint) DO UPDATE SET
                answer = excluded.answer,
                tier = excluded.tier,
                created_at = excluded.created_at,
                expires_at = excluded.expires_at
            "#,
        )
        .bind(&response.fingerprint)
        .bind(&response.answer)
        .bind(response.tier.as_str())
        .bind(response.created_at.to_rfc3339())
        .bind(response.expires_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("Cache write failed: {e}")))?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> Result<u64, StoreError> {
        // RFC 3339 UTC timestamps compare lexicographically.
        let result = sqlx::query("DELETE FROM response_cache WHERE expires_at <= ?1")
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(format!("Cache cleanup failed: {e}")))?;

        let removed = result.rows_affected();
        if removed > 0 {
            debug!("Removed {removed} expired cache entries");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adjutant_core::snapshot::{AgencyMetrics, CalendarMetrics, ProjectMetrics, TaskMetrics};
    use chrono::Duration;

    async fn test_store() -> SqliteStore {
        SqliteStore::new("sqlite::memory:").await.unwrap()
    }

    fn make_snapshot(day: &str) -> MetricSnapshot {
        MetricSnapshot {
            day: day.into(),
            captured_at: Utc::now(),
            agencies: vec![AgencyMetrics {
                code: "gpl".into(),
                name: "GPL".into(),
                health_score: Some(8.2),
                health_label: Some("Stable".into()),
                open_issues: Some(3),
                headcount: None,
            }],
            tasks: TaskMetrics {
                active: Some(12),
                overdue: Some(2),
                due_today: None,
            },
            projects: ProjectMetrics::default(),
            calendar: CalendarMetrics::default(),
        }
    }

    fn make_response(fingerprint: &str, ttl_secs: i64) -> CachedResponse {
        let now = Utc::now();
        CachedResponse {
            fingerprint: fingerprint.into(),
            answer: "cached answer".into(),
            tier: ModelTier::Mid,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_secs),
        }
    }

    #[tokio::test]
    async fn snapshot_round_trip() {
        let store = test_store().await;
        let snapshot = make_snapshot("2026-03-07");
        SnapshotStore::upsert(&store, &snapshot).await.unwrap();

        let fetched = SnapshotStore::get(&store, "2026-03-07").await.unwrap().unwrap();
        assert_eq!(fetched.day, "2026-03-07");
        assert_eq!(fetched.agency("gpl").unwrap().health_score, Some(8.2));
        assert_eq!(fetched.tasks.active, Some(12));
    }

    #[tokio::test]
    async fn snapshot_missing_day_is_none() {
        let store = test_store().await;
        assert!(SnapshotStore::get(&store, "1999-01-01").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn snapshot_upsert_replaces() {
        let store = test_store().await;
        let mut snapshot = make_snapshot("2026-03-07");
        SnapshotStore::upsert(&store, &snapshot).await.unwrap();

        snapshot.tasks.active = Some(99);
        SnapshotStore::upsert(&store, &snapshot).await.unwrap();

        let fetched = SnapshotStore::get(&store, "2026-03-07").await.unwrap().unwrap();
        assert_eq!(fetched.tasks.active, Some(99));
    }

    #[tokio::test]
    async fn usage_append_and_day_read() {
        let store = test_store().await;
        let entry = UsageLogEntry::model_call(ModelTier::Premium, 1000, 500, "chat");
        let day = day_key_for(entry.created_at);
        store.append(&entry).await.unwrap();
        store
            .append(&UsageLogEntry::local_hit("dashboard"))
            .await
            .unwrap();

        let entries = store.entries_for_day(&day).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].tier, ModelTier::Premium);
        assert_eq!(entries[0].input_tokens, 1000);
        assert!(entries[1].local_answer);
    }

    #[tokio::test]
    async fn usage_other_day_is_empty() {
        let store = test_store().await;
        store
            .append(&UsageLogEntry::model_call(ModelTier::Mid, 10, 10, "chat"))
            .await
            .unwrap();

        let entries = store.entries_for_day("1999-01-01").await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn usage_summary_groups_by_tier() {
        let store = test_store().await;
        store
            .append(&UsageLogEntry::model_call(ModelTier::Premium, 1000, 500, "chat"))
            .await
            .unwrap();
        store
            .append(&UsageLogEntry::model_call(ModelTier::Premium, 500, 250, "chat"))
            .await
            .unwrap();
        store
            .append(&UsageLogEntry::model_call(ModelTier::Mid, 2000, 1000, "chat"))
            .await
            .unwrap();

        let rows = store.summary(7).await.unwrap();
        assert_eq!(rows.len(), 2);

        let premium = rows.iter().find(|r| r.tier == ModelTier::Premium).unwrap();
        assert_eq!(premium.requests, 2);
        assert_eq!(premium.input_tokens, 1500);
        assert_eq!(premium.output_tokens, 750);
        assert!((premium.weighted_tokens - 2250.0).abs() < 1e-9);

        let mid = rows.iter().find(|r| r.tier == ModelTier::Mid).unwrap();
        assert_eq!(mid.requests, 1);
        assert!((mid.weighted_tokens - 300.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn cache_round_trip() {
        let store = test_store().await;
        store.put(&make_response("fp1", 60)).await.unwrap();

        let fetched = ResponseStore::get(&store, "fp1").await.unwrap().unwrap();
        assert_eq!(fetched.answer, "cached answer");
        assert_eq!(fetched.tier, ModelTier::Mid);
    }

    #[tokio::test]
    async fn cache_expired_entry_not_served() {
        let store = test_store().await;
        // Already expired at write time
        store.put(&make_response("fp1", -1)).await.unwrap();

        assert!(ResponseStore::get(&store, "fp1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cache_put_overwrites() {
        let store = test_store().await;
        store.put(&make_response("fp1", 60)).await.unwrap();

        let mut newer = make_response("fp1", 60);
        newer.answer = "newer answer".into();
        store.put(&newer).await.unwrap();

        let fetched = ResponseStore::get(&store, "fp1").await.unwrap().unwrap();
        assert_eq!(fetched.answer, "newer answer");
    }

    #[tokio::test]
    async fn cleanup_removes_only_expired() {
        let store = test_store().await;
        store.put(&make_response("live", 60)).await.unwrap();
        store.put(&make_response("dead1", -5)).await.unwrap();
        store.put(&make_response("dead2", -5)).await.unwrap();

        let removed = store.cleanup_expired().await.unwrap();
        assert_eq!(removed, 2);

        assert!(ResponseStore::get(&store, "live").await.unwrap().is_some());
        assert!(ResponseStore::get(&store, "dead1").await.unwrap().is_none());
    }
}
