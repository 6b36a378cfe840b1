//! Reduction of raw context into a `MetricSnapshot`.
//!
//! `build_at` is total and pure: it cannot fail, and identical inputs
//! always yield structurally identical snapshots. Every field that is
//! absent in the raw data stays `None` in the snapshot — "unknown" is an
//! explicit value here, never an exception and never a zero.

use adjutant_core::context_data::RawContextData;
use adjutant_core::snapshot::{
    AgencyMetrics, CalendarMetrics, MetricSnapshot, ProjectMetrics, TaskMetrics,
};
use chrono::{DateTime, Utc};

/// Build a snapshot for a day from raw context, stamping it with `now`.
pub fn build(raw: &RawContextData, day: &str) -> MetricSnapshot {
    build_at(raw, day, Utc::now())
}

/// Pure core of the builder — the timestamp is an input, so two calls with
/// equal arguments produce equal snapshots.
pub fn build_at(raw: &RawContextData, day: &str, captured_at: DateTime<Utc>) -> MetricSnapshot {
    let agencies = raw
        .agencies
        .iter()
        .map(|a| AgencyMetrics {
            code: a.code.clone(),
            name: a.name.clone(),
            health_score: a.health_score,
            health_label: a.health_label.clone(),
            open_issues: a.open_issues,
            headcount: a.headcount,
        })
        .collect();

    let tasks = match &raw.tasks {
        Some(t) => TaskMetrics {
            active: t.active,
            overdue: t.overdue,
            due_today: t.due_today,
        },
        None => TaskMetrics::default(),
    };

    let projects = match &raw.projects {
        Some(p) => ProjectMetrics {
            total: p.total,
            on_track: p.on_track,
            delayed: p.delayed,
            at_risk: p.at_risk,
        },
        None => ProjectMetrics::default(),
    };

    let calendar = match &raw.calendar {
        Some(c) => CalendarMetrics {
            meetings_today: c.meetings_today,
            next_meeting: c.next_meeting.clone(),
        },
        None => CalendarMetrics::default(),
    };

    MetricSnapshot {
        day: day.to_string(),
        captured_at,
        agencies,
        tasks,
        projects,
        calendar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adjutant_core::context_data::{AgencyStatus, ProjectOverview, TaskOverview};

    fn sample_raw() -> RawContextData {
        RawContextData {
            agencies: vec![
                AgencyStatus {
                    code: "gpl".into(),
                    name: "GPL".into(),
                    health_score: Some(8.2),
                    health_label: Some("Stable".into()),
                    open_issues: Some(3),
                    headcount: Some(42),
                    notes: vec!["audit scheduled".into()],
                },
                AgencyStatus {
                    code: "dmv".into(),
                    name: "DMV".into(),
                    health_score: None,
                    health_label: None,
                    open_issues: Some(11),
                    headcount: None,
                    notes: vec![],
                },
            ],
            tasks: Some(TaskOverview {
                active: Some(12),
                overdue: Some(2),
                due_today: None,
                overdue_titles: vec!["Quarterly filing".into()],
            }),
            calendar: None,
            projects: Some(ProjectOverview {
                total: Some(7),
                on_track: Some(5),
                delayed: Some(2),
                at_risk: None,
                delayed_names: vec!["Portal rewrite".into()],
            }),
            data_gaps: vec!["calendar feed down".into()],
        }
    }

    #[test]
    fn equal_input_yields_equal_snapshot() {
        let raw = sample_raw();
        let at = Utc::now();
        let a = build_at(&raw, "2026-03-07", at);
        let b = build_at(&raw, "2026-03-07", at);
        assert_eq!(a, b);
    }

    #[test]
    fn missing_domains_degrade_to_unknown() {
        let snapshot = build_at(&RawContextData::default(), "2026-03-07", Utc::now());

        assert!(snapshot.agencies.is_empty());
        assert_eq!(snapshot.tasks.active, None);
        assert_eq!(snapshot.tasks.overdue, None);
        assert_eq!(snapshot.projects.total, None);
        assert_eq!(snapshot.calendar.meetings_today, None);
    }

    #[test]
    fn missing_leaf_fields_stay_none() {
        let snapshot = build_at(&sample_raw(), "2026-03-07", Utc::now());

        let dmv = snapshot.agency("dmv").unwrap();
        assert_eq!(dmv.health_score, None);
        assert_eq!(dmv.open_issues, Some(11));
        assert_eq!(snapshot.tasks.due_today, None);
        assert_eq!(snapshot.projects.at_risk, None);
    }

    #[test]
    fn agency_order_is_preserved() {
        let snapshot = build_at(&sample_raw(), "2026-03-07", Utc::now());
        assert_eq!(snapshot.agencies[0].code, "gpl");
        assert_eq!(snapshot.agencies[1].code, "dmv");
    }
}
