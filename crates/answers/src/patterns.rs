//! The built-in match table.
//!
//! Patterns are listed most-specific first. Broad catch-alls (like the
//! plain task count) sit at the bottom so they only fire after every
//! narrower pattern has either failed to match or declined.

use adjutant_core::answer::LocalAnswer;
use adjutant_core::snapshot::{AgencyMetrics, MetricSnapshot};

use crate::LocalPattern;

/// The ordered pattern table. Static content; rebuilt per call, which is
/// cheap since rows are plain function pointers.
pub fn default_patterns() -> Vec<LocalPattern> {
    vec![
        LocalPattern {
            name: "agency_health",
            matches: |q| q.contains("health") || q.contains("score"),
            handler: agency_health,
        },
        LocalPattern {
            name: "agency_open_issues",
            matches: |q| q.contains("issue"),
            handler: agency_open_issues,
        },
        LocalPattern {
            name: "agency_headcount",
            matches: |q| q.contains("headcount") || q.contains("staff"),
            handler: agency_headcount,
        },
        LocalPattern {
            name: "tasks_due_today",
            matches: |q| q.contains("due today"),
            handler: tasks_due_today,
        },
        LocalPattern {
            name: "tasks_overdue",
            matches: |q| q.contains("overdue"),
            handler: tasks_overdue,
        },
        LocalPattern {
            name: "task_count",
            matches: |q| q.contains("task"),
            handler: task_count,
        },
        LocalPattern {
            name: "next_meeting",
            matches: |q| q.contains("next meeting") || (q.contains("meeting") && q.contains("when")),
            handler: next_meeting,
        },
        LocalPattern {
            name: "meetings_today",
            matches: |q| q.contains("meeting"),
            handler: meetings_today,
        },
        LocalPattern {
            name: "project_status",
            matches: |q| q.contains("project"),
            handler: project_status,
        },
    ]
}

/// Find the agency the question names, by code or display name.
fn mentioned_agency<'a>(question: &str, snapshot: &'a MetricSnapshot) -> Option<&'a AgencyMetrics> {
    snapshot.agencies.iter().find(|a| {
        question.contains(&a.code.to_lowercase()) || question.contains(&a.name.to_lowercase())
    })
}

// ── handlers ──

fn agency_health(question: &str, snapshot: &MetricSnapshot) -> Option<LocalAnswer> {
    let agency = mentioned_agency(question, snapshot)?;
    let score = agency.health_score?;

    let text = match &agency.health_label {
        Some(label) => format!("{} health score: {score:.1}/10 ({label}).", agency.name),
        None => format!("{} health score: {score:.1}/10.", agency.name),
    };
    Some(
        LocalAnswer::new(text, format!("What's driving {}'s score?", agency.name))
            .with_suggestion("Compare health across agencies"),
    )
}

fn agency_open_issues(question: &str, snapshot: &MetricSnapshot) -> Option<LocalAnswer> {
    let agency = mentioned_agency(question, snapshot)?;
    let open = agency.open_issues?;

    Some(
        LocalAnswer::new(
            format!("{} has {open} open issues.", agency.name),
            "Which issues are oldest?",
        )
        .with_suggestion(format!("How is {}'s health trending?", agency.name)),
    )
}

fn agency_headcount(question: &str, snapshot: &MetricSnapshot) -> Option<LocalAnswer> {
    let agency = mentioned_agency(question, snapshot)?;
    let headcount = agency.headcount?;

    Some(LocalAnswer::new(
        format!("{} headcount: {headcount}.", agency.name),
        "Show headcount for all agencies",
    ))
}

fn tasks_due_today(_question: &str, snapshot: &MetricSnapshot) -> Option<LocalAnswer> {
    let due = snapshot.tasks.due_today?;
    Some(LocalAnswer::new(
        format!("{due} tasks are due today."),
        "Which tasks are due today?",
    ))
}

fn tasks_overdue(_question: &str, snapshot: &MetricSnapshot) -> Option<LocalAnswer> {
    let overdue = snapshot.tasks.overdue?;
    Some(
        LocalAnswer::new(
            format!("{overdue} tasks are overdue."),
            "Show me the overdue list",
        )
        .with_suggestion("Which are due today?"),
    )
}

fn task_count(_question: &str, snapshot: &MetricSnapshot) -> Option<LocalAnswer> {
    let active = snapshot.tasks.active?;
    Some(LocalAnswer::new(
        format!("You have {active} active tasks."),
        "Any of them overdue?",
    ))
}

fn next_meeting(_question: &str, snapshot: &MetricSnapshot) -> Option<LocalAnswer> {
    let next = snapshot.calendar.next_meeting.as_ref()?;
    Some(LocalAnswer::new(
        format!("Your next meeting: {next}."),
        "What's on the rest of today's calendar?",
    ))
}

fn meetings_today(_question: &str, snapshot: &MetricSnapshot) -> Option<LocalAnswer> {
    let count = snapshot.calendar.meetings_today?;
    Some(LocalAnswer::new(
        format!("You have {count} meetings today."),
        "When is the next one?",
    ))
}

fn project_status(_question: &str, snapshot: &MetricSnapshot) -> Option<LocalAnswer> {
    let total = snapshot.projects.total?;
    let mut text = format!("{total} projects in the portfolio");
    if let Some(on_track) = snapshot.projects.on_track {
        text.push_str(&format!(", {on_track} on track"));
    }
    if let Some(delayed) = snapshot.projects.delayed {
        text.push_str(&format!(", {delayed} delayed"));
    }
    if let Some(at_risk) = snapshot.projects.at_risk {
        text.push_str(&format!(", {at_risk} at risk"));
    }
    text.push('.');

    Some(LocalAnswer::new(text, "Which projects are delayed?"))
}
