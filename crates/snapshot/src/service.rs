//! Snapshot lifecycle: lazy get-or-build on the request path, plus an
//! explicit build for the scheduled pre-warm.

use std::sync::Arc;

use adjutant_core::provider::ContextSource;
use adjutant_core::snapshot::{today_key, MetricSnapshot};
use adjutant_core::store::SnapshotStore;
use adjutant_core::{Error, Result};
use chrono::Utc;
use tracing::{debug, info};

use crate::builder;

/// Fetches raw context, reduces it to a snapshot, and persists the result
/// keyed by day.
///
/// Two paths share the builder: `get_or_build` serves requests and only
/// fetches upstream on a store miss; `build_today` is the pre-warm and
/// always refetches. Because builds are pure and upserts replace whole
/// rows, the two racing is harmless.
pub struct SnapshotService {
    source: Arc<dyn ContextSource>,
    store: Arc<dyn SnapshotStore>,
}

impl SnapshotService {
    pub fn new(source: Arc<dyn ContextSource>, store: Arc<dyn SnapshotStore>) -> Self {
        Self { source, store }
    }

    /// Return the stored snapshot for `day`, building and persisting one
    /// from live context on a miss.
    pub async fn get_or_build(&self, day: &str) -> Result<MetricSnapshot> {
        if let Some(snapshot) = self.store.get(day).await? {
            debug!(day, "snapshot hit");
            return Ok(snapshot);
        }

        debug!(day, "snapshot miss, building");
        self.build_for(day).await
    }

    /// Build and persist today's snapshot from live context, replacing any
    /// existing row. Used by the pre-warm schedule and the CLI.
    pub async fn build_today(&self) -> Result<MetricSnapshot> {
        self.build_for(&today_key()).await
    }

    async fn build_for(&self, day: &str) -> Result<MetricSnapshot> {
        let raw = self
            .source
            .fetch_raw_context()
            .await
            .map_err(Error::from)?;
        let snapshot = builder::build_at(&raw, day, Utc::now());
        self.store.upsert(&snapshot).await?;
        info!(
            day,
            agencies = snapshot.agencies.len(),
            "snapshot captured"
        );
        Ok(snapshot)
    }
}
