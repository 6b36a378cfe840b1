//! The per-day metric snapshot — a flattened, numeric summary of raw context.
//!
//! One snapshot exists per calendar day, keyed by a `YYYY-MM-DD` string of
//! the deployment's local date. Repeated builds for the same day overwrite
//! (upsert), so the scheduled pre-warm and the lazy on-demand path can race
//! safely: both compute from the same upstream data and last writer wins.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Format a date as a snapshot day key.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Today's day key in the deployment's local timezone.
pub fn today_key() -> String {
    day_key(Local::now().date_naive())
}

/// Day key for an instant, converted to local time first.
///
/// Usage accounting and snapshot lookup both window on the local calendar
/// day, resetting at local midnight.
pub fn day_key_for(instant: DateTime<Utc>) -> String {
    day_key(instant.with_timezone(&Local).date_naive())
}

/// A compact, numeric-only summary of one day's operational state.
///
/// Derivation from [`crate::RawContextData`] is pure: identical raw input
/// always yields a structurally identical snapshot (timestamps aside).
/// Missing upstream figures stay `None` — "unknown", never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    /// Calendar day this snapshot covers (`YYYY-MM-DD`, local).
    pub day: String,

    /// When the snapshot was computed.
    pub captured_at: DateTime<Utc>,

    /// One sub-record per monitored agency.
    pub agencies: Vec<AgencyMetrics>,

    /// Task-domain figures.
    pub tasks: TaskMetrics,

    /// Project-portfolio figures.
    pub projects: ProjectMetrics,

    /// Calendar figures.
    pub calendar: CalendarMetrics,
}

impl MetricSnapshot {
    /// Look up an agency sub-record by its code (case-insensitive).
    pub fn agency(&self, code: &str) -> Option<&AgencyMetrics> {
        self.agencies
            .iter()
            .find(|a| a.code.eq_ignore_ascii_case(code))
    }
}

/// Numeric summary for one agency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgencyMetrics {
    pub code: String,
    pub name: String,
    pub health_score: Option<f64>,
    pub health_label: Option<String>,
    pub open_issues: Option<u32>,
    pub headcount: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskMetrics {
    pub active: Option<u32>,
    pub overdue: Option<u32>,
    pub due_today: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetrics {
    pub total: Option<u32>,
    pub on_track: Option<u32>,
    pub delayed: Option<u32>,
    pub at_risk: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarMetrics {
    pub meetings_today: Option<u32>,
    pub next_meeting: Option<String>,
}
