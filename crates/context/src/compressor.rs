//! The context compressor.
//!
//! Renders [`RawContextData`] into a prompt string at one of three detail
//! levels. Levels are strictly nested views of the same data, never
//! different data sources:
//!
//! - **Minimal** — one summary line per domain.
//! - **Focused** — the minimal summary for every domain, with the domain
//!   the current page relates to expanded in full (list items capped).
//! - **Full** — every domain expanded, lists uncapped, data gaps included.
//!
//! Output is deterministic for fixed inputs, apart from the leading
//! "As of" timestamp line. A missing figure renders the literal marker
//! `No data`, never silent omission, so the model cannot mistake absence
//! for zero.

use adjutant_core::context_data::RawContextData;
use adjutant_core::tier::DetailLevel;
use chrono::{DateTime, SecondsFormat, Utc};

/// List-item cap applied at the focused level. Full output is uncapped.
const FOCUSED_LIST_CAP: usize = 5;

const NO_DATA: &str = "No data";

/// The domain a page route points at; drives focused-level expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDomain {
    Agencies,
    Tasks,
    Calendar,
    Projects,
}

/// Known route prefixes, matched as substrings of the current page.
const ROUTE_PREFIXES: &[(&str, FocusDomain)] = &[
    ("/agencies", FocusDomain::Agencies),
    ("/agency", FocusDomain::Agencies),
    ("/tasks", FocusDomain::Tasks),
    ("/calendar", FocusDomain::Calendar),
    ("/projects", FocusDomain::Projects),
];

/// Infer the focus domain from the current page route. `None` when no
/// known prefix appears in the route.
pub fn infer_focus(current_page: &str) -> Option<FocusDomain> {
    ROUTE_PREFIXES
        .iter()
        .find(|(prefix, _)| current_page.contains(prefix))
        .map(|(_, domain)| *domain)
}

/// Assemble a context string at the given detail level, stamped with the
/// current time.
pub fn assemble(raw: &RawContextData, current_page: &str, level: DetailLevel) -> String {
    assemble_at(raw, current_page, level, Utc::now())
}

/// Pure core of the compressor — the "As of" timestamp is an input, so
/// output is byte-identical for identical arguments.
pub fn assemble_at(
    raw: &RawContextData,
    current_page: &str,
    level: DetailLevel,
    as_of: DateTime<Utc>,
) -> String {
    let focus = infer_focus(current_page);
    let mut out = format!(
        "As of {}\n",
        as_of.to_rfc3339_opts(SecondsFormat::Secs, true)
    );

    let domains = [
        FocusDomain::Agencies,
        FocusDomain::Tasks,
        FocusDomain::Projects,
        FocusDomain::Calendar,
    ];

    for domain in domains {
        let block = match level {
            DetailLevel::Minimal => summary_line(raw, domain),
            DetailLevel::Focused if focus == Some(domain) => {
                expanded_block(raw, domain, Some(FOCUSED_LIST_CAP))
            }
            DetailLevel::Focused => summary_line(raw, domain),
            DetailLevel::Full => expanded_block(raw, domain, None),
        };
        out.push_str(&block);
        out.push('\n');
    }

    if level == DetailLevel::Full {
        if raw.data_gaps.is_empty() {
            out.push_str("Data gaps: none reported\n");
        } else {
            out.push_str(&format!("Data gaps: {}\n", raw.data_gaps.join("; ")));
        }
    }

    out
}

// ── rendering ──

fn opt_u32(value: Option<u32>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |n| n.to_string())
}

fn agency_summary(raw: &RawContextData) -> String {
    if raw.agencies.is_empty() {
        return format!("Agencies: {NO_DATA}");
    }
    let parts: Vec<String> = raw
        .agencies
        .iter()
        .map(|a| match (a.health_score, &a.health_label) {
            (Some(score), Some(label)) => format!("{}: {score:.1}/10 ({label})", a.name),
            (Some(score), None) => format!("{}: {score:.1}/10", a.name),
            (None, _) => format!("{}: {NO_DATA}", a.name),
        })
        .collect();
    format!("Agencies: {}", parts.join("; "))
}

/// One summary line per domain. Identical text is reused as the first
/// line of the expanded block, so higher levels are literal supersets.
fn summary_line(raw: &RawContextData, domain: FocusDomain) -> String {
    match domain {
        FocusDomain::Agencies => agency_summary(raw),
        FocusDomain::Tasks => match &raw.tasks {
            Some(t) => format!(
                "Tasks: active {}, overdue {}, due today {}",
                opt_u32(t.active),
                opt_u32(t.overdue),
                opt_u32(t.due_today)
            ),
            None => format!("Tasks: {NO_DATA}"),
        },
        FocusDomain::Projects => match &raw.projects {
            Some(p) => format!(
                "Projects: total {}, on track {}, delayed {}, at risk {}",
                opt_u32(p.total),
                opt_u32(p.on_track),
                opt_u32(p.delayed),
                opt_u32(p.at_risk)
            ),
            None => format!("Projects: {NO_DATA}"),
        },
        FocusDomain::Calendar => match &raw.calendar {
            Some(c) => format!(
                "Calendar: meetings today {}, next {}",
                opt_u32(c.meetings_today),
                c.next_meeting.as_deref().unwrap_or(NO_DATA)
            ),
            None => format!("Calendar: {NO_DATA}"),
        },
    }
}

fn push_list(out: &mut String, header: &str, items: &[String], cap: Option<usize>) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("\n  {header}:"));
    let shown = cap.unwrap_or(items.len()).min(items.len());
    for item in &items[..shown] {
        out.push_str(&format!("\n  - {item}"));
    }
    if shown < items.len() {
        out.push_str(&format!("\n  - (and {} more)", items.len() - shown));
    }
}

fn expanded_block(raw: &RawContextData, domain: FocusDomain, cap: Option<usize>) -> String {
    let mut out = summary_line(raw, domain);

    match domain {
        FocusDomain::Agencies => {
            for a in &raw.agencies {
                out.push_str(&format!(
                    "\n  {} ({}): open issues {}, headcount {}",
                    a.name,
                    a.code,
                    opt_u32(a.open_issues),
                    opt_u32(a.headcount)
                ));
                let shown = cap.unwrap_or(a.notes.len()).min(a.notes.len());
                for note in &a.notes[..shown] {
                    out.push_str(&format!("\n    note: {note}"));
                }
            }
        }
        FocusDomain::Tasks => {
            if let Some(t) = &raw.tasks {
                push_list(&mut out, "Overdue items", &t.overdue_titles, cap);
            }
        }
        FocusDomain::Projects => {
            if let Some(p) = &raw.projects {
                push_list(&mut out, "Delayed projects", &p.delayed_names, cap);
            }
        }
        FocusDomain::Calendar => {
            if let Some(c) = &raw.calendar {
                push_list(&mut out, "Upcoming", &c.upcoming, cap);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use adjutant_core::context_data::{
        AgencyStatus, CalendarOverview, ProjectOverview, TaskOverview,
    };

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
                overdue: Some(7),
                due_today: Some(4),
                overdue_titles: (1..=7).map(|i| format!("task-{i}")).collect(),
            }),
            calendar: Some(CalendarOverview {
                meetings_today: Some(3),
                next_meeting: Some("Budget review at 14:00".into()),
                upcoming: vec!["Board sync".into(), "1:1 with ops".into()],
            }),
            projects: Some(ProjectOverview {
                total: Some(7),
                on_track: Some(5),
                delayed: Some(2),
                at_risk: None,
                delayed_names: vec!["Portal rewrite".into(), "Data migration".into()],
            }),
            data_gaps: vec!["payroll feed stale".into()],
        }
    }

    fn without_timestamp(output: &str) -> &str {
        output.split_once('\n').unwrap().1
    }

    #[test]
    fn output_is_deterministic_for_fixed_inputs() {
        let raw = sample_raw();
        let as_of = Utc::now();
        let a = assemble_at(&raw, "/tasks", DetailLevel::Focused, as_of);
        let b = assemble_at(&raw, "/tasks", DetailLevel::Focused, as_of);
        assert_eq!(a, b);
    }

    #[test]
    fn levels_are_strictly_ordered_by_length() {
        let raw = sample_raw();
        let as_of = Utc::now();
        let minimal = assemble_at(&raw, "/projects", DetailLevel::Minimal, as_of);
        let focused = assemble_at(&raw, "/projects", DetailLevel::Focused, as_of);
        let full = assemble_at(&raw, "/projects", DetailLevel::Full, as_of);

        assert!(minimal.len() < focused.len());
        assert!(focused.len() < full.len());
    }

    #[test]
    fn estimated_tokens_shrink_with_the_detail_level() {
        let raw = sample_raw();
        let as_of = Utc::now();
        let minimal =
            crate::estimate_tokens(&assemble_at(&raw, "/projects", DetailLevel::Minimal, as_of));
        let full =
            crate::estimate_tokens(&assemble_at(&raw, "/projects", DetailLevel::Full, as_of));

        assert!(minimal > 0);
        assert!(minimal < full);
    }

    #[test]
    fn minimal_facts_survive_into_higher_levels() {
        let raw = sample_raw();
        let as_of = Utc::now();
        let minimal = assemble_at(&raw, "/tasks", DetailLevel::Minimal, as_of);
        let focused = assemble_at(&raw, "/tasks", DetailLevel::Focused, as_of);
        let full = assemble_at(&raw, "/tasks", DetailLevel::Full, as_of);

        for fact in ["8.2/10", "Stable", "overdue 7", "total 7", "Budget review at 14:00"] {
            assert!(minimal.contains(fact), "minimal missing {fact}");
            assert!(focused.contains(fact), "focused missing {fact}");
            assert!(full.contains(fact), "full missing {fact}");
        }
    }

    #[test]
    fn missing_figures_render_the_no_data_marker() {
        let minimal = assemble_at(
            &RawContextData::default(),
            "/dashboard",
            DetailLevel::Minimal,
            Utc::now(),
        );
        assert!(minimal.contains("Agencies: No data"));
        assert!(minimal.contains("Tasks: No data"));
        assert!(minimal.contains("Projects: No data"));
        assert!(minimal.contains("Calendar: No data"));
    }

    #[test]
    fn partial_fields_are_marked_not_omitted() {
        let full = assemble_at(&sample_raw(), "/dashboard", DetailLevel::Full, Utc::now());
        // DMV has no score and no headcount.
        assert!(without_timestamp(&full).contains("DMV: No data"));
        assert!(full.contains("headcount No data"));
        assert!(full.contains("at risk No data"));
    }

    #[test]
    fn focus_inference_uses_route_prefixes() {
        assert_eq!(infer_focus("/projects/123"), Some(FocusDomain::Projects));
        assert_eq!(infer_focus("/app/tasks?filter=overdue"), Some(FocusDomain::Tasks));
        assert_eq!(infer_focus("/agency/gpl"), Some(FocusDomain::Agencies));
        assert_eq!(infer_focus("/settings"), None);
    }

    #[test]
    fn focused_caps_lists_and_full_does_not() {
        let raw = sample_raw();
        let as_of = Utc::now();
        let focused = assemble_at(&raw, "/tasks", DetailLevel::Focused, as_of);
        let full = assemble_at(&raw, "/tasks", DetailLevel::Full, as_of);

        assert!(focused.contains("task-5"));
        assert!(!focused.contains("task-6"));
        assert!(focused.contains("(and 2 more)"));
        assert!(full.contains("task-7"));
    }

    #[test]
    fn data_gaps_only_in_full_output() {
        let raw = sample_raw();
        let as_of = Utc::now();
        let focused = assemble_at(&raw, "/tasks", DetailLevel::Focused, as_of);
        let full = assemble_at(&raw, "/tasks", DetailLevel::Full, as_of);

        assert!(!focused.contains("payroll feed stale"));
        assert!(full.contains("Data gaps: payroll feed stale"));
    }

    #[test]
    fn unknown_page_yields_summary_only_focused_output() {
        let raw = sample_raw();
        let as_of = Utc::now();
        let minimal = assemble_at(&raw, "/settings", DetailLevel::Minimal, as_of);
        let focused = assemble_at(&raw, "/settings", DetailLevel::Focused, as_of);
        // No focus domain matched, so nothing expands.
        assert_eq!(minimal, focused);
    }
}
