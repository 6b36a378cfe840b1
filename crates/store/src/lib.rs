//! Store backends for the three shared resources: per-day snapshots, the
//! append-only usage log, and the response cache with expiry.
//!
//! `SqliteStore` is the production backend — one SQLite file, three tables,
//! WAL journal mode. `InMemoryStore` serves tests and ephemeral sessions.
//! Both implement the store traits from `adjutant-core`; everything above
//! this crate is backend-agnostic.

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryStore;
pub use sqlite::SqliteStore;
