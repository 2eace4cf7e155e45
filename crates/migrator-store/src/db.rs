//! Database connection management
//!
//! Provides utilities for opening and configuring SQLite connections before
//! migrations run against them.

use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::Duration;

/// Default time a connection waits on a locked database
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings applied by [`configure`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    /// Enforce foreign keys (`PRAGMA foreign_keys`)
    pub foreign_keys: bool,
    /// How long to block on a lock held by another connection
    pub busy_timeout: Duration,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            foreign_keys: true,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

/// Open (or create) a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    tracing::debug!(path = %path.as_ref().display(), "opening database");
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an existing SQLite database without write access
pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Connection> {
    tracing::debug!(path = %path.as_ref().display(), "opening database read-only");
    Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Configure a connection with the given options
///
/// Must be called outside a transaction; SQLite ignores `foreign_keys`
/// changes while one is open.
pub fn configure(conn: &Connection, options: &ConnectionOptions) -> Result<()> {
    tracing::debug!(
        foreign_keys = options.foreign_keys,
        busy_timeout_ms = options.busy_timeout.as_millis() as u64,
        "configuring connection"
    );
    conn.pragma_update(None, "foreign_keys", options.foreign_keys)
        .map_err(from_rusqlite)?;
    conn.busy_timeout(options.busy_timeout)
        .map_err(from_rusqlite)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_configure_enables_foreign_keys() {
        let conn = open_in_memory().unwrap();
        configure(&conn, &ConnectionOptions::default()).unwrap();

        let enabled: i64 = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_configure_can_disable_foreign_keys() {
        let conn = open_in_memory().unwrap();
        let options = ConnectionOptions {
            foreign_keys: false,
            ..ConnectionOptions::default()
        };
        configure(&conn, &options).unwrap();

        let enabled: i64 = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 0);
    }

    #[test]
    fn test_open_read_only_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let err = open_read_only(temp.path().join("missing.db")).unwrap_err();
        assert_eq!(err.code(), "ERR_DATABASE");
    }

    #[test]
    fn test_open_creates_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("store.db");
        let conn = open(&path).unwrap();
        conn.execute_batch("create table t(id integer)").unwrap();
        assert!(path.exists());
    }
}
