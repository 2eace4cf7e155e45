//! Migration data model
//!
//! A [`MigrationSet`] is the ordered list of migration files discovered in a
//! source. Versions are positions in that list: version `N` means the first
//! `N` files have been applied.

use crate::errors::{MigratorError, Result};
use crate::source::MigrationSource;
use std::io;

/// Schema version stored in the database
pub type Version = u32;

/// Largest version the database's signed 32-bit version slot can hold
pub const MAX_VERSION: Version = i32::MAX as Version;

/// A single discovered migration file
///
/// Identity is the file name. The content is loaded lazily at apply time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    name: String,
    path: String,
}

impl MigrationFile {
    /// Create a migration file from its name and source-relative path
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Load the raw SQL content from `source`
    pub fn load(&self, source: &dyn MigrationSource) -> io::Result<Vec<u8>> {
        source.read(&self.path)
    }
}

/// Migration files in strict application order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationSet {
    files: Vec<MigrationFile>,
}

impl MigrationSet {
    /// Sort `files` by name and build the set
    ///
    /// Names are compared byte-wise. Fails if two files share a name, since
    /// the set would then have no strict order.
    pub fn from_unsorted(mut files: Vec<MigrationFile>) -> Result<Self> {
        files.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));

        if let Some(pair) = files.windows(2).find(|pair| pair[0].name == pair[1].name) {
            return Err(MigratorError::DuplicateMigration {
                name: pair[0].name.clone(),
            });
        }

        if files.len() > MAX_VERSION as usize {
            return Err(MigratorError::Discovery {
                path: String::new(),
                message: format!(
                    "{} migrations exceed the maximum schema version {}",
                    files.len(),
                    MAX_VERSION
                ),
            });
        }

        Ok(Self { files })
    }

    /// Version reached once every file in the set is applied
    pub fn latest_version(&self) -> Version {
        // Bounded by MAX_VERSION in from_unsorted
        self.files.len() as Version
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[MigrationFile] {
        &self.files
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MigrationFile> {
        self.files.iter()
    }

    /// Names in application order
    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(MigrationFile::name).collect()
    }

    /// Files not yet applied at `current`
    ///
    /// Returns an empty slice when `current` is at or past the latest version.
    pub fn pending_from(&self, current: Version) -> &[MigrationFile] {
        let start = (current as usize).min(self.files.len());
        &self.files[start..]
    }
}

impl<'a> IntoIterator for &'a MigrationSet {
    type Item = &'a MigrationFile;
    type IntoIter = std::slice::Iter<'a, MigrationFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> MigrationFile {
        MigrationFile::new(name, name)
    }

    #[test]
    fn test_from_unsorted_orders_by_name() {
        let set =
            MigrationSet::from_unsorted(vec![file("0010.sql"), file("0002.sql"), file("0001.sql")])
                .unwrap();
        assert_eq!(set.names(), vec!["0001.sql", "0002.sql", "0010.sql"]);
        assert_eq!(set.latest_version(), 3);
    }

    #[test]
    fn test_ordering_is_bytewise_not_numeric() {
        // Without zero padding "10" sorts before "9"
        let set = MigrationSet::from_unsorted(vec![file("9_b.sql"), file("10_a.sql")]).unwrap();
        assert_eq!(set.names(), vec!["10_a.sql", "9_b.sql"]);

        // Uppercase sorts before lowercase
        let set = MigrationSet::from_unsorted(vec![file("a.sql"), file("B.sql")]).unwrap();
        assert_eq!(set.names(), vec!["B.sql", "a.sql"]);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = MigrationSet::from_unsorted(vec![
            MigrationFile::new("0001.sql", "a/0001.sql"),
            MigrationFile::new("0001.sql", "b/0001.sql"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            MigratorError::DuplicateMigration {
                name: "0001.sql".to_string()
            }
        );
    }

    #[test]
    fn test_pending_from() {
        let set = MigrationSet::from_unsorted(vec![
            file("0001.sql"),
            file("0002.sql"),
            file("0003.sql"),
        ])
        .unwrap();
        let names = |files: &[MigrationFile]| {
            files
                .iter()
                .map(|f| f.name().to_string())
                .collect::<Vec<_>>()
        };

        assert_eq!(names(set.pending_from(0)).len(), 3);
        assert_eq!(names(set.pending_from(2)), vec!["0003.sql"]);
        assert!(set.pending_from(3).is_empty());
        assert!(set.pending_from(99).is_empty());
    }

    #[test]
    fn test_empty_set() {
        let set = MigrationSet::from_unsorted(Vec::new()).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.latest_version(), 0);
    }
}
