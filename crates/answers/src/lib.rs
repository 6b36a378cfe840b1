//! Local answer matching — the zero-cost tier of the pipeline.
//!
//! A fixed, ordered table of question patterns is tested top to bottom
//! against the (lowercased) question. The first pattern whose predicate
//! matches gets to answer from the day's metric snapshot; if the snapshot
//! lacks the figure that pattern needs, the handler declines and matching
//! continues, so a near-miss still falls through to the model path instead
//! of producing a hollow answer.
//!
//! Order is significant: more specific patterns sit above broader ones,
//! and the table is a plain `Vec` precisely so that precedence is explicit
//! rather than an accident of iteration order.

pub mod patterns;

use adjutant_core::answer::LocalAnswer;
use adjutant_core::snapshot::MetricSnapshot;
use tracing::debug;

pub use patterns::default_patterns;

/// One row of the match table.
pub struct LocalPattern {
    /// Stable identifier, used in logs only.
    pub name: &'static str,
    /// Cheap predicate over the normalized (lowercased, trimmed) question.
    pub matches: fn(&str) -> bool,
    /// Produces an answer from the snapshot, or declines with `None` when
    /// the snapshot is missing the figure this pattern needs.
    pub handler: fn(&str, &MetricSnapshot) -> Option<LocalAnswer>,
}

/// Try to answer a question from the snapshot without any model call.
///
/// Returns `None` when no snapshot is available (never attempts a partial
/// match), when no predicate matches, or when every matching handler
/// declined. Pure with respect to its inputs: the same question and
/// snapshot always yield the same result.
pub fn try_local_answer(question: &str, snapshot: Option<&MetricSnapshot>) -> Option<LocalAnswer> {
    let snapshot = snapshot?;
    let normalized = question.trim().to_lowercase();

    for pattern in default_patterns() {
        if !(pattern.matches)(&normalized) {
            continue;
        }
        match (pattern.handler)(&normalized, snapshot) {
            Some(answer) => {
                debug_assert!(!answer.suggestions.is_empty());
                debug!(pattern = pattern.name, "local answer matched");
                return Some(answer);
            }
            // Handler declined (missing figure) — keep matching.
            None => debug!(pattern = pattern.name, "pattern matched but declined"),
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use adjutant_core::snapshot::{
        AgencyMetrics, CalendarMetrics, MetricSnapshot, ProjectMetrics, TaskMetrics,
    };
    use chrono::Utc;

    fn snapshot() -> MetricSnapshot {
        MetricSnapshot {
            day: "2026-03-07".into(),
            captured_at: Utc::now(),
            agencies: vec![AgencyMetrics {
                code: "gpl".into(),
                name: "GPL".into(),
                health_score: Some(8.2),
                health_label: Some("Stable".into()),
                open_issues: Some(3),
                headcount: Some(42),
            }],
            tasks: TaskMetrics {
                active: Some(12),
                overdue: Some(2),
                due_today: Some(4),
            },
            projects: ProjectMetrics {
                total: Some(7),
                on_track: Some(5),
                delayed: Some(2),
                at_risk: Some(1),
            },
            calendar: CalendarMetrics {
                meetings_today: Some(3),
                next_meeting: Some("Budget review at 14:00".into()),
            },
        }
    }

    #[test]
    fn no_snapshot_means_no_match() {
        assert!(try_local_answer("how many tasks are overdue?", None).is_none());
    }

    #[test]
    fn agency_health_answer_carries_score_and_label() {
        let answer = try_local_answer("What's the GPL health score", Some(&snapshot())).unwrap();
        assert!(answer.text.contains("8.2/10"));
        assert!(answer.text.contains("Stable"));
        assert!(answer.suggestions.iter().all(|s| !s.is_empty()));
        assert!(!answer.suggestions.is_empty());
    }

    #[test]
    fn overdue_question_uses_task_metrics() {
        let answer = try_local_answer("how many tasks are overdue?", Some(&snapshot())).unwrap();
        assert!(answer.text.contains('2'));
        assert!(answer.text.to_lowercase().contains("overdue"));
    }

    #[test]
    fn next_meeting_question_quotes_the_meeting() {
        let answer = try_local_answer("when is my next meeting?", Some(&snapshot())).unwrap();
        assert!(answer.text.contains("Budget review at 14:00"));
    }

    #[test]
    fn unmatched_question_falls_through() {
        let q = "summarize the regulatory landscape for next quarter";
        assert!(try_local_answer(q, Some(&snapshot())).is_none());
    }

    #[test]
    fn declining_handler_does_not_terminate_matching() {
        let mut snap = snapshot();
        snap.tasks.overdue = None;
        // "overdue tasks" matches the overdue pattern, whose handler declines;
        // the broader task-count pattern then answers from `active`.
        let answer = try_local_answer("how many overdue tasks do I have", Some(&snap)).unwrap();
        assert!(answer.text.contains("12"));
    }

    #[test]
    fn matching_is_deterministic() {
        let snap = snapshot();
        let first = try_local_answer("what's the gpl health score", Some(&snap));
        let second = try_local_answer("what's the gpl health score", Some(&snap));
        assert_eq!(first, second);
    }
}
