//! Error handling for migrator-store
//!
//! Maps `rusqlite` failures into the core error facility

use migrator_core::errors::MigratorError;
use migrator_core::model::Version;

/// Result type alias using MigratorError
pub type Result<T> = std::result::Result<T, MigratorError>;

/// Create a version read error
pub fn version_read(err: rusqlite::Error) -> MigratorError {
    MigratorError::VersionRead {
        message: err.to_string(),
    }
}

/// Create a version write error
pub fn version_write(version: Version, err: rusqlite::Error) -> MigratorError {
    MigratorError::VersionWrite {
        version,
        message: err.to_string(),
    }
}

/// Create a transaction begin error
pub fn transaction_begin(err: rusqlite::Error) -> MigratorError {
    MigratorError::TransactionBegin {
        message: err.to_string(),
    }
}

/// Create a migration read error
pub fn migration_read(name: &str, reason: impl ToString) -> MigratorError {
    MigratorError::MigrationRead {
        name: name.to_string(),
        message: reason.to_string(),
    }
}

/// Create a migration execution error
pub fn migration_exec(name: &str, err: rusqlite::Error) -> MigratorError {
    MigratorError::MigrationExec {
        name: name.to_string(),
        message: err.to_string(),
    }
}

/// Create a commit error
pub fn commit(err: rusqlite::Error) -> MigratorError {
    MigratorError::Commit {
        message: err.to_string(),
    }
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> MigratorError {
    MigratorError::Database {
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exec_error_keeps_driver_message() {
        let err = migration_exec(
            "0002.sql",
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
                Some("near \"invalid\": syntax error".to_string()),
            ),
        );
        assert_eq!(err.migration_name(), Some("0002.sql"));
        assert!(err.to_string().contains("near \"invalid\": syntax error"));
    }

    #[test]
    fn test_migration_read_accepts_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = migration_read("0003.sql", io);
        assert_eq!(err.code(), "ERR_MIGRATION_READ");
        assert_eq!(err.to_string(), "Could not read migration file 0003.sql: gone");
    }
}
