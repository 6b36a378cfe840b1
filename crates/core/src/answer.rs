//! Answer types — what the pipeline returns and what the response cache holds.

use crate::tier::ModelTier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which path produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "tier")]
pub enum ServedBy {
    /// Pattern-matched against the metric snapshot; zero cost.
    Local,
    /// Returned from the response cache.
    Cache,
    /// Generated by the model at the given tier.
    Model(ModelTier),
}

/// The pipeline's answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    /// Follow-up prompts for the UI. Local answers always carry at least one.
    pub suggestions: Vec<String>,
    pub served_by: ServedBy,
}

/// An answer produced by the local matcher, before the pipeline wraps it.
///
/// Construction requires a first suggestion up front — "at least one
/// follow-up suggestion" is a hard invariant of local answers, so the type
/// makes an empty suggestion list unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalAnswer {
    pub text: String,
    pub suggestions: Vec<String>,
}

impl LocalAnswer {
    pub fn new(text: impl Into<String>, first_suggestion: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            suggestions: vec![first_suggestion.into()],
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

/// A previously generated model answer, keyed by fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    /// Normalized fingerprint of (question, page, tier).
    pub fingerprint: String,
    pub answer: String,
    /// Tier that generated the answer (reported honestly on cache hits).
    pub tier: ModelTier,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CachedResponse {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn local_answer_always_has_a_suggestion() {
        let answer = LocalAnswer::new("8 tasks overdue.", "Show me the overdue list");
        assert_eq!(answer.suggestions.len(), 1);

        let answer = answer.with_suggestion("Which are due today?");
        assert_eq!(answer.suggestions.len(), 2);
    }

    #[test]
    fn cached_response_expiry() {
        let now = Utc::now();
        let resp = CachedResponse {
            fingerprint: "fp".into(),
            answer: "cached".into(),
            tier: ModelTier::Mid,
            created_at: now,
            expires_at: now + Duration::seconds(60),
        };

        assert!(!resp.is_expired_at(now));
        assert!(!resp.is_expired_at(now + Duration::seconds(59)));
        assert!(resp.is_expired_at(now + Duration::seconds(60)));
        assert!(resp.is_expired_at(now + Duration::seconds(120)));
    }

    #[test]
    fn served_by_serializes_with_tier() {
        let json = serde_json::to_string(&ServedBy::Model(ModelTier::Premium)).unwrap();
        assert!(json.contains("model"));
        assert!(json.contains("premium"));
    }
}
