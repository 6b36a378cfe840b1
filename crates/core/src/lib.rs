//! # Adjutant Core
//!
//! Domain types, traits, and error definitions for the Adjutant answering
//! pipeline. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator and shared resource is defined as a trait here:
//! the LLM provider, the raw-context source, and the three store-backed
//! resources (snapshots, usage log, response cache). Implementations live in
//! their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod answer;
pub mod context_data;
pub mod error;
pub mod provider;
pub mod snapshot;
pub mod store;
pub mod tier;
pub mod usage;

// Re-export key types at crate root for ergonomics
pub use answer::{Answer, CachedResponse, LocalAnswer, ServedBy};
pub use context_data::{
    AgencyStatus, CalendarOverview, ProjectOverview, RawContextData, TaskOverview,
};
pub use error::{Error, ProviderError, Result, StoreError, UpstreamError};
pub use provider::{ContextSource, ModelCompletion, ModelProvider};
pub use snapshot::{day_key, day_key_for, today_key, AgencyMetrics, MetricSnapshot};
pub use store::{ResponseStore, SnapshotStore, UsageStore};
pub use tier::{DetailLevel, ModelTier};
pub use usage::{TokenBudgetStatus, UsageLogEntry, UsageSummaryRow};
