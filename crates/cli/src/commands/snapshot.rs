//! The `snapshot` commands — build and inspect the daily snapshot.

use std::sync::Arc;

use adjutant_config::AppConfig;
use adjutant_core::snapshot::{today_key, MetricSnapshot};
use adjutant_core::store::SnapshotStore;
use adjutant_snapshot::SnapshotService;

use crate::context_source::FileContextSource;

/// Build (or rebuild) today's snapshot from live context.
pub async fn build() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let store = super::open_store(&config).await?;

    let service = SnapshotService::new(Arc::new(FileContextSource::from_env()), store);
    let snapshot = service.build_today().await?;

    println!("📸 Snapshot built for {}", snapshot.day);
    print_snapshot(&snapshot);
    Ok(())
}

/// Show a stored snapshot (defaults to today).
pub async fn show(day: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let store = super::open_store(&config).await?;

    let day = day.unwrap_or_else(today_key);
    match SnapshotStore::get(store.as_ref(), &day).await? {
        Some(snapshot) => {
            println!("📸 Snapshot for {day}");
            print_snapshot(&snapshot);
        }
        None => println!("No snapshot stored for {day}. Run `adjutant snapshot build`."),
    }
    Ok(())
}

fn print_snapshot(snapshot: &MetricSnapshot) {
    println!("─────────────────────────────────────");
    println!("  Captured: {}", snapshot.captured_at.to_rfc3339());

    if snapshot.agencies.is_empty() {
        println!("  Agencies: none");
    } else {
        println!("  Agencies:");
        for agency in &snapshot.agencies {
            let score = agency
                .health_score
                .map(|s| format!("{s:.1}/10"))
                .unwrap_or_else(|| "—".into());
            let label = agency.health_label.as_deref().unwrap_or("");
            println!("    {:<12} {score} {label}", agency.name);
        }
    }

    println!(
        "  Tasks:    active {}, overdue {}, due today {}",
        fmt(snapshot.tasks.active),
        fmt(snapshot.tasks.overdue),
        fmt(snapshot.tasks.due_today)
    );
    println!(
        "  Projects: total {}, on track {}, delayed {}, at risk {}",
        fmt(snapshot.projects.total),
        fmt(snapshot.projects.on_track),
        fmt(snapshot.projects.delayed),
        fmt(snapshot.projects.at_risk)
    );
    println!(
        "  Calendar: {} meetings today, next: {}",
        fmt(snapshot.calendar.meetings_today),
        snapshot.calendar.next_meeting.as_deref().unwrap_or("—")
    );
}

fn fmt(value: Option<u32>) -> String {
    value.map_or_else(|| "—".into(), |n| n.to_string())
}
