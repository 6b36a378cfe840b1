//! The `cache` commands — response cache maintenance.

use adjutant_config::AppConfig;
use adjutant_core::store::ResponseStore;

/// Remove expired cached responses. Safe to run on a schedule.
pub async fn cleanup() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let store = super::open_store(&config).await?;

    let removed = store.cleanup_expired().await?;
    match removed {
        0 => println!("Cache is clean — nothing expired."),
        n => println!("Removed {n} expired cache entries."),
    }
    Ok(())
}
