//! CLI command implementations.

pub mod answer;
pub mod cache;
pub mod snapshot;
pub mod usage;

use std::sync::Arc;

use adjutant_config::AppConfig;
use adjutant_store::SqliteStore;

/// Open the configured SQLite store, creating its directory if needed.
pub(crate) async fn open_store(
    config: &AppConfig,
) -> Result<Arc<SqliteStore>, Box<dyn std::error::Error>> {
    if let Some(parent) = config.store.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let path = format!("sqlite://{}", config.store.db_path.display());
    Ok(Arc::new(SqliteStore::new(&path).await?))
}
