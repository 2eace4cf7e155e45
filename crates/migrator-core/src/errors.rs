use crate::model::Version;
use thiserror::Error;

/// Result type alias using MigratorError
pub type Result<T> = std::result::Result<T, MigratorError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every [`MigratorError`] variant maps to exactly one kind, and every kind
/// maps to a stable code usable for programmatic handling and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    // Discovery
    Discovery,
    DuplicateMigration,
    NoMigrations,

    // Version slot
    VersionRead,
    InvalidVersion,
    VersionWrite,

    // Apply
    Transaction,
    MigrationRead,
    MigrationExec,
    Commit,

    // Connection management
    Database,
}

impl ErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Discovery => "ERR_DISCOVERY",
            ErrorKind::DuplicateMigration => "ERR_DUPLICATE_MIGRATION",
            ErrorKind::NoMigrations => "ERR_NO_MIGRATIONS",
            ErrorKind::VersionRead => "ERR_VERSION_READ",
            ErrorKind::InvalidVersion => "ERR_INVALID_VERSION",
            ErrorKind::VersionWrite => "ERR_VERSION_WRITE",
            ErrorKind::Transaction => "ERR_TRANSACTION",
            ErrorKind::MigrationRead => "ERR_MIGRATION_READ",
            ErrorKind::MigrationExec => "ERR_MIGRATION_EXEC",
            ErrorKind::Commit => "ERR_COMMIT",
            ErrorKind::Database => "ERR_DATABASE",
        }
    }

    /// Whether an error of this kind can only occur after the migration
    /// transaction was opened, which means a rollback was attempted.
    pub fn is_apply_phase(&self) -> bool {
        matches!(
            self,
            ErrorKind::MigrationRead
                | ErrorKind::MigrationExec
                | ErrorKind::VersionWrite
                | ErrorKind::Commit
        )
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for migration runs
///
/// All variants are terminal for the current invocation. None are retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MigratorError {
    // ===== Discovery =====
    /// Traversal of the migration source failed
    #[error("Failed to discover migrations in '{path}': {message}")]
    Discovery { path: String, message: String },

    /// Two migration files share a name, so there is no strict order
    #[error("Duplicate migration name: {name}")]
    DuplicateMigration { name: String },

    /// The source holds no `.sql` files
    #[error("No migrations to run, do you have *.sql files in the target directory?")]
    NoMigrations,

    // ===== Version slot =====
    /// The stored schema version could not be read
    #[error("Failed to read current schema version: {message}")]
    VersionRead { message: String },

    /// The stored schema version is negative or beyond the discovered migrations
    #[error(
        "Current schema version {current} is invalid for {latest} discovered migrations, cannot proceed"
    )]
    InvalidVersion { current: i64, latest: Version },

    /// The new schema version could not be written
    #[error("Could not set schema version to {version}: {message}")]
    VersionWrite { version: Version, message: String },

    // ===== Apply =====
    /// The migration transaction could not be opened
    #[error("Could not begin migration transaction: {message}")]
    TransactionBegin { message: String },

    /// A migration file's content could not be loaded
    #[error("Could not read migration file {name}: {message}")]
    MigrationRead { name: String, message: String },

    /// The database rejected a migration's SQL
    #[error("Error executing migration {name}: {message}")]
    MigrationExec { name: String, message: String },

    /// The transaction failed to commit after all migrations were applied
    #[error("Failed to commit migrations: {message}")]
    Commit { message: String },

    // ===== Connection management =====
    /// Opening or configuring the database failed
    #[error("Database error: {message}")]
    Database { message: String },
}

impl MigratorError {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            MigratorError::Discovery { .. } => ErrorKind::Discovery,
            MigratorError::DuplicateMigration { .. } => ErrorKind::DuplicateMigration,
            MigratorError::NoMigrations => ErrorKind::NoMigrations,
            MigratorError::VersionRead { .. } => ErrorKind::VersionRead,
            MigratorError::InvalidVersion { .. } => ErrorKind::InvalidVersion,
            MigratorError::VersionWrite { .. } => ErrorKind::VersionWrite,
            MigratorError::TransactionBegin { .. } => ErrorKind::Transaction,
            MigratorError::MigrationRead { .. } => ErrorKind::MigrationRead,
            MigratorError::MigrationExec { .. } => ErrorKind::MigrationExec,
            MigratorError::Commit { .. } => ErrorKind::Commit,
            MigratorError::Database { .. } => ErrorKind::Database,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Name of the migration file the error refers to, if any
    pub fn migration_name(&self) -> Option<&str> {
        match self {
            MigratorError::DuplicateMigration { name }
            | MigratorError::MigrationRead { name, .. }
            | MigratorError::MigrationExec { name, .. } => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ErrorKind::Discovery, "ERR_DISCOVERY"),
            (ErrorKind::NoMigrations, "ERR_NO_MIGRATIONS"),
            (ErrorKind::InvalidVersion, "ERR_INVALID_VERSION"),
            (ErrorKind::MigrationExec, "ERR_MIGRATION_EXEC"),
            (ErrorKind::Commit, "ERR_COMMIT"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_exec_error_carries_file_and_driver_message() {
        let err = MigratorError::MigrationExec {
            name: "0002.sql".to_string(),
            message: "near \"invalid\": syntax error".to_string(),
        };

        assert_eq!(err.kind(), ErrorKind::MigrationExec);
        assert_eq!(err.migration_name(), Some("0002.sql"));
        assert_eq!(
            err.to_string(),
            "Error executing migration 0002.sql: near \"invalid\": syntax error"
        );
    }

    #[test]
    fn test_apply_phase_kinds() {
        assert!(ErrorKind::MigrationExec.is_apply_phase());
        assert!(ErrorKind::Commit.is_apply_phase());
        assert!(!ErrorKind::InvalidVersion.is_apply_phase());
        assert!(!ErrorKind::NoMigrations.is_apply_phase());
    }

    #[test]
    fn test_no_migration_name_for_version_errors() {
        let err = MigratorError::InvalidVersion {
            current: 7,
            latest: 3,
        };
        assert!(err.migration_name().is_none());
        assert_eq!(err.code(), "ERR_INVALID_VERSION");
    }
}
