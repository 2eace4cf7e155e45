//! Migrator Core - discovery, planning and diagnostics for SQL migrations
//!
//! This crate is database-agnostic. It provides:
//! - The [`source::MigrationSource`] abstraction with directory and in-memory backings
//! - Deterministic discovery of `.sql` files ([`discover::discover`])
//! - Validation of a stored version against the discovered set ([`plan::MigrationPlan`])
//! - The error facility ([`errors::MigratorError`]) with stable codes
//! - Run events with injectable sinks, and the structured logging facility
//!
//! The SQLite executor lives in `migrator-store`.

pub mod discover;
pub mod errors;
pub mod events;
pub mod logging_facility;
pub mod model;
pub mod plan;
pub mod source;

// Re-export commonly used types
pub use discover::{discover, MIGRATION_EXTENSION};
pub use errors::{ErrorKind, MigratorError, Result};
pub use events::{EventSink, MemorySink, NullSink, RunEvent, TracingSink};
pub use model::{MigrationFile, MigrationSet, Version};
pub use plan::MigrationPlan;
pub use source::{DirSource, MemorySource, MigrationSource, SourceEntry};
