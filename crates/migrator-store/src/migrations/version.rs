//! Schema version slot
//!
//! The applied version lives in an engine-level metadata slot rather than a
//! table, so it is independent of any schema the migrations create.

use crate::errors::{version_read, version_write, Result};
use migrator_core::model::Version;
use rusqlite::Connection;

/// Persisted "highest fully-applied migration" slot
pub trait VersionStore {
    /// Read the raw stored value
    ///
    /// The value is returned unvalidated so that negative or out-of-range
    /// values surface as `InvalidVersion` rather than as read failures.
    fn read(&self, conn: &Connection) -> Result<i64>;

    /// Write `version`
    ///
    /// Called with the connection of an open transaction; the write commits
    /// or rolls back together with the migrations.
    fn write(&self, conn: &Connection, version: Version) -> Result<()>;
}

/// Version slot backed by `PRAGMA user_version`
#[derive(Debug, Clone, Copy, Default)]
pub struct UserVersion;

impl VersionStore for UserVersion {
    fn read(&self, conn: &Connection) -> Result<i64> {
        conn.pragma_query_value(None, "user_version", |row| row.get(0))
            .map_err(version_read)
    }

    fn write(&self, conn: &Connection, version: Version) -> Result<()> {
        conn.pragma_update(None, "user_version", version)
            .map_err(|e| version_write(version, e))
    }
}
