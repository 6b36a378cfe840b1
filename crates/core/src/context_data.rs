//! Raw operational context — the transient bundle of current-state fields
//! the surrounding system assembles from upstream collaborators.
//!
//! Every leaf figure is an `Option`: upstream fetches may partially fail
//! per-domain, and the contract is that failures surface as missing fields,
//! never as aborts. `RawContextData` is rebuilt per request and never
//! persisted as-is; the snapshot builder reduces it to a compact per-day
//! summary.

use serde::{Deserialize, Serialize};

/// Current-state fields from every monitored domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawContextData {
    /// Per-agency operational figures.
    #[serde(default)]
    pub agencies: Vec<AgencyStatus>,

    /// Active/overdue task counts.
    #[serde(default)]
    pub tasks: Option<TaskOverview>,

    /// Upcoming calendar entries.
    #[serde(default)]
    pub calendar: Option<CalendarOverview>,

    /// Project-portfolio aggregates.
    #[serde(default)]
    pub projects: Option<ProjectOverview>,

    /// Known gaps in the collected data (human-readable).
    #[serde(default)]
    pub data_gaps: Vec<String>,
}

impl RawContextData {
    /// True when no domain produced any data at all.
    pub fn is_empty(&self) -> bool {
        self.agencies.is_empty()
            && self.tasks.is_none()
            && self.calendar.is_none()
            && self.projects.is_none()
    }
}

/// Operational figures for one monitored agency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgencyStatus {
    /// Short route/code identifier, e.g. "gpl".
    pub code: String,

    /// Display name.
    pub name: String,

    /// Health score on a 0–10 scale.
    pub health_score: Option<f64>,

    /// Qualitative label, e.g. "Stable", "At Risk".
    pub health_label: Option<String>,

    /// Open issue count.
    pub open_issues: Option<u32>,

    /// Current headcount.
    pub headcount: Option<u32>,

    /// Free-form operational notes.
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Task-domain counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskOverview {
    pub active: Option<u32>,
    pub overdue: Option<u32>,
    pub due_today: Option<u32>,

    /// Titles of overdue tasks, most urgent first.
    #[serde(default)]
    pub overdue_titles: Vec<String>,
}

/// Calendar-domain figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarOverview {
    pub meetings_today: Option<u32>,

    /// Human-readable "next meeting" line, e.g. "Board sync at 14:00".
    pub next_meeting: Option<String>,

    /// Upcoming entry titles, soonest first.
    #[serde(default)]
    pub upcoming: Vec<String>,
}

/// Project-portfolio aggregates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectOverview {
    pub total: Option<u32>,
    pub on_track: Option<u32>,
    pub delayed: Option<u32>,
    pub at_risk: Option<u32>,

    /// Names of delayed projects, most delayed first.
    #[serde(default)]
    pub delayed_names: Vec<String>,
}
