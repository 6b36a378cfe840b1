//! Error types for the Adjutant domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.
//!
//! Two policy points are deliberate, not accidental:
//! - Budget exhaustion is **not** an error anywhere in this taxonomy. The
//!   pipeline responds to a tight budget by downgrading the model tier, never
//!   by refusing to answer.
//! - Store failures in the budget and cache paths are swallowed by their
//!   owners (fail-open / treat-as-miss); only the snapshot path surfaces them.

use thiserror::Error;

/// The top-level error type for all Adjutant operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Upstream context errors ---
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    // --- Store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures fetching raw operational context from upstream systems.
///
/// Per-domain failures should surface as missing fields on
/// [`crate::RawContextData`], not as this error; `Unavailable` means the
/// fetch as a whole produced nothing usable.
#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    #[error("Upstream data unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl ProviderError {
    /// Whether the caller can reasonably retry the same request.
    ///
    /// Used by the surrounding system to distinguish "temporarily degraded"
    /// from "unavailable" in user-facing messaging.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Timeout(_) | Self::Network(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn retryable_classification() {
        assert!(ProviderError::Timeout("30s".into()).is_retryable());
        assert!(ProviderError::RateLimited { retry_after_secs: 5 }.is_retryable());
        assert!(!ProviderError::AuthenticationFailed("bad key".into()).is_retryable());
        assert!(
            !ProviderError::ApiError {
                status_code: 500,
                message: "oops".into()
            }
            .is_retryable()
        );
    }

    #[test]
    fn store_error_converts_to_top_level() {
        let err: Error = StoreError::Storage("disk full".into()).into();
        assert!(err.to_string().contains("disk full"));
    }
}
