//! Migration discovery
//!
//! Walks a [`MigrationSource`] and collects every non-directory entry whose
//! name ends in [`MIGRATION_EXTENSION`]. Everything else is ignored.
//!
//! The result is ordered by file name, compared byte-wise. File names must
//! therefore sort in the intended application order, which is why a
//! fixed-width, zero-padded numeric prefix is recommended:
//!
//! ```text
//! 0001_create_users.sql
//! 0002_add_email_index.sql
//! 0010_backfill_names.sql
//! ```
//!
//! Prefixes are never parsed or validated; only the sort order matters.

use crate::errors::{MigratorError, Result};
use crate::model::{MigrationFile, MigrationSet};
use crate::source::{self, MigrationSource};

/// Extension that marks a file as a migration
pub const MIGRATION_EXTENSION: &str = ".sql";

/// Discover all migrations in `source` in application order
///
/// # Errors
///
/// - [`MigratorError::Discovery`] if any directory cannot be listed
/// - [`MigratorError::DuplicateMigration`] if two files share a name
pub fn discover(source: &dyn MigrationSource) -> Result<MigrationSet> {
    let mut files = Vec::new();
    walk(source, "", &mut files)?;
    MigrationSet::from_unsorted(files)
}

fn walk(source: &dyn MigrationSource, dir: &str, files: &mut Vec<MigrationFile>) -> Result<()> {
    let entries = source.list(dir).map_err(|e| MigratorError::Discovery {
        path: display_path(source, dir),
        message: e.to_string(),
    })?;

    for entry in entries {
        let path = source::join(dir, &entry.name);
        if entry.is_dir {
            walk(source, &path, files)?;
        } else if entry.name.ends_with(MIGRATION_EXTENSION) {
            files.push(MigrationFile::new(entry.name, path));
        }
    }

    Ok(())
}

fn display_path(source: &dyn MigrationSource, dir: &str) -> String {
    if dir.is_empty() {
        source.describe()
    } else {
        format!("{}/{}", source.describe(), dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MemorySource, SourceEntry};
    use std::io;

    #[test]
    fn test_discovery_filters_and_sorts() {
        let source = MemorySource::new()
            .with_file("skip", "this should be skipped")
            .with_dir("dir")
            .with_file("0002.sql", "sql")
            .with_file("0001_init.sql", "sql");

        let set = discover(&source).unwrap();
        assert_eq!(set.names(), vec!["0001_init.sql", "0002.sql"]);
    }

    #[test]
    fn test_discovery_recurses_into_subdirectories() {
        let source = MemorySource::new()
            .with_file("0002.sql", "b")
            .with_file("core/0001.sql", "a")
            .with_file("core/notes.md", "ignored")
            .with_file("extra/deep/0003.sql", "c");

        let set = discover(&source).unwrap();
        assert_eq!(set.names(), vec!["0001.sql", "0002.sql", "0003.sql"]);
        assert_eq!(set.files()[0].path(), "core/0001.sql");
        assert_eq!(set.files()[2].path(), "extra/deep/0003.sql");
    }

    #[test]
    fn test_directory_named_like_migration_is_not_a_migration() {
        let source = MemorySource::new()
            .with_dir("0001.sql")
            .with_file("0002.sql", "b");

        let set = discover(&source).unwrap();
        assert_eq!(set.names(), vec!["0002.sql"]);
    }

    #[test]
    fn test_duplicate_names_across_directories() {
        let source = MemorySource::new()
            .with_file("a/0001.sql", "a")
            .with_file("b/0001.sql", "b");

        let err = discover(&source).unwrap_err();
        assert_eq!(err.code(), "ERR_DUPLICATE_MIGRATION");
        assert_eq!(err.migration_name(), Some("0001.sql"));
    }

    #[test]
    fn test_empty_source_yields_empty_set() {
        let set = discover(&MemorySource::new()).unwrap();
        assert!(set.is_empty());
    }

    struct BrokenSource;

    impl MigrationSource for BrokenSource {
        fn list(&self, dir: &str) -> io::Result<Vec<SourceEntry>> {
            if dir.is_empty() {
                Ok(vec![SourceEntry::dir("locked")])
            } else {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"))
            }
        }

        fn read(&self, _path: &str) -> io::Result<Vec<u8>> {
            unreachable!("discovery never reads content")
        }

        fn describe(&self) -> String {
            "broken".to_string()
        }
    }

    #[test]
    fn test_traversal_failure_is_discovery_error() {
        let err = discover(&BrokenSource).unwrap_err();
        assert_eq!(
            err,
            MigratorError::Discovery {
                path: "broken/locked".to_string(),
                message: "permission denied".to_string(),
            }
        );
    }
}
