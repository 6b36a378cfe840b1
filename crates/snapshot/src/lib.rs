//! Per-day metric snapshots: a pure builder over raw operational context,
//! and a service that persists the result keyed by calendar day.
//!
//! Two paths produce a snapshot, both through the same idempotent upsert:
//! a scheduled pre-warm (`SnapshotService::build_today`) and a lazy
//! on-demand path (`SnapshotService::get_or_build`). A failed pre-warm
//! never blocks the lazy path.

pub mod builder;
pub mod service;

pub use builder::{build, build_at};
pub use service::SnapshotService;
