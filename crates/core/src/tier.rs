//! Model tiers — the closed capability/cost ladder.
//!
//! Three tiers share one daily budget via *cost weights*: a token spent on
//! the premium tier counts its full price, a token on the mid tier roughly a
//! tenth, a token on the cheap tier a few percent. The weights approximate
//! the price ratios between the frontier, workhorse, and small models the
//! deployment maps each tier to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A named LLM capability/cost class.
///
/// Ordering is by capability: `Cheap < Mid < Premium`. The budget tracker
/// hands out a *ceiling* tier; requested tiers are clamped down to it with
/// [`ModelTier::clamp_to`], never up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    Cheap,
    Mid,
    Premium,
}

impl ModelTier {
    /// Cost multiplier relative to the premium tier.
    pub fn cost_weight(&self) -> f64 {
        match self {
            Self::Cheap => 0.03,
            Self::Mid => 0.1,
            Self::Premium => 1.0,
        }
    }

    /// The context payload size appropriate to this tier's window and cost.
    pub fn detail_level(&self) -> DetailLevel {
        match self {
            Self::Cheap => DetailLevel::Minimal,
            Self::Mid => DetailLevel::Focused,
            Self::Premium => DetailLevel::Full,
        }
    }

    /// How long a generated answer stays in the response cache.
    ///
    /// Cheaper tiers are cheap to regenerate, so their answers expire sooner.
    pub fn cache_ttl(&self) -> Duration {
        match self {
            Self::Cheap => Duration::from_secs(5 * 60),
            Self::Mid => Duration::from_secs(15 * 60),
            Self::Premium => Duration::from_secs(30 * 60),
        }
    }

    /// Clamp this tier down to a ceiling. Never upgrades.
    pub fn clamp_to(self, ceiling: ModelTier) -> ModelTier {
        self.min(ceiling)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cheap => "cheap",
            Self::Mid => "mid",
            Self::Premium => "premium",
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ModelTier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cheap" => Ok(Self::Cheap),
            "mid" => Ok(Self::Mid),
            "premium" => Ok(Self::Premium),
            other => Err(format!("unknown model tier: {other}")),
        }
    }
}

/// Context payload size, derived from the permitted tier.
///
/// Each level is a strict superset of the one below it — same data source,
/// more detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Minimal,
    Focused,
    Full,
}
