//! Migrator Store - applies SQL migrations to SQLite
//!
//! Provides:
//! - Connection helpers (`db`)
//! - The persisted schema version in `PRAGMA user_version`
//! - The transactional migration runner
//!
//! ```no_run
//! let mut conn = migrator_store::db::open("app.db")?;
//! let version = migrator_store::run_dir(&mut conn, "migrations")?;
//! println!("database at version {}", version);
//! # Ok::<(), migrator_core::MigratorError>(())
//! ```

pub mod db;
pub mod errors;
pub mod migrations;

// Re-export key types
pub use errors::Result;
pub use migrations::{plan, run, run_dir, Migrator, RunReport, UserVersion, VersionStore};
