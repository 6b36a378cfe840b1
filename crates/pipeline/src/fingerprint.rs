//! Response-cache fingerprints.
//!
//! A fingerprint identifies a *request* — normalized question, page, and
//! the tier the caller asked for — not the answer. Normalization folds
//! case and whitespace so trivially different phrasings of the same
//! question share a cache entry.

use adjutant_core::tier::ModelTier;
use sha2::{Digest, Sha256};

/// Compute the cache fingerprint for a request.
pub fn fingerprint(question: &str, page: &str, tier: ModelTier) -> String {
    let normalized_question = normalize(question);
    let normalized_page = page.trim().to_lowercase();

    let mut hasher = Sha256::new();
    hasher.update(normalized_question.as_bytes());
    hasher.update(b"\n");
    hasher.update(normalized_page.as_bytes());
    hasher.update(b"\n");
    hasher.update(tier.as_str().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Lowercase and collapse internal whitespace runs to single spaces.
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
