//! Pending-migration planning
//!
//! Pairs a discovered [`MigrationSet`] with the version read from the
//! database and validates that the two agree.

use crate::errors::{MigratorError, Result};
use crate::model::{MigrationFile, MigrationSet, Version};

/// A validated view of what a run would apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPlan {
    set: MigrationSet,
    current: Version,
}

impl MigrationPlan {
    /// Validate the stored version against the discovered set
    ///
    /// `stored` is the raw value read from the version slot. It must lie in
    /// `0..=set.latest_version()`; anything else means the database and the
    /// migration files disagree.
    ///
    /// # Errors
    ///
    /// - [`MigratorError::NoMigrations`] if the set is empty
    /// - [`MigratorError::InvalidVersion`] if `stored` is out of range
    pub fn new(set: MigrationSet, stored: i64) -> Result<Self> {
        if set.is_empty() {
            return Err(MigratorError::NoMigrations);
        }

        let latest = set.latest_version();
        let current = Version::try_from(stored)
            .ok()
            .filter(|v| *v <= latest)
            .ok_or(MigratorError::InvalidVersion {
                current: stored,
                latest,
            })?;

        Ok(Self { set, current })
    }

    pub fn current(&self) -> Version {
        self.current
    }

    pub fn latest(&self) -> Version {
        self.set.latest_version()
    }

    pub fn set(&self) -> &MigrationSet {
        &self.set
    }

    /// Migrations still to apply, in order
    pub fn pending(&self) -> &[MigrationFile] {
        self.set.pending_from(self.current)
    }

    pub fn is_up_to_date(&self) -> bool {
        self.current == self.latest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(names: &[&str]) -> MigrationSet {
        MigrationSet::from_unsorted(names.iter().map(|n| MigrationFile::new(*n, *n)).collect())
            .unwrap()
    }

    #[test]
    fn test_fresh_database_has_everything_pending() {
        let plan = MigrationPlan::new(set_of(&["0001.sql", "0002.sql"]), 0).unwrap();
        assert_eq!(plan.current(), 0);
        assert_eq!(plan.latest(), 2);
        assert_eq!(plan.pending().len(), 2);
        assert!(!plan.is_up_to_date());
    }

    #[test]
    fn test_partial_application() {
        let plan = MigrationPlan::new(set_of(&["0001.sql", "0002.sql", "0003.sql"]), 2).unwrap();
        assert_eq!(plan.pending()[0].name(), "0003.sql");
        assert_eq!(plan.pending().len(), 1);
    }

    #[test]
    fn test_up_to_date() {
        let plan = MigrationPlan::new(set_of(&["0001.sql"]), 1).unwrap();
        assert!(plan.is_up_to_date());
        assert!(plan.pending().is_empty());
    }

    #[test]
    fn test_version_beyond_latest_is_invalid() {
        let err = MigrationPlan::new(set_of(&["0001.sql"]), 2).unwrap_err();
        assert_eq!(
            err,
            MigratorError::InvalidVersion {
                current: 2,
                latest: 1
            }
        );
    }

    #[test]
    fn test_negative_version_is_invalid() {
        let err = MigrationPlan::new(set_of(&["0001.sql"]), -1).unwrap_err();
        assert_eq!(err.code(), "ERR_INVALID_VERSION");
    }

    #[test]
    fn test_empty_set_has_no_migrations() {
        let err = MigrationPlan::new(MigrationSet::default(), 0).unwrap_err();
        assert_eq!(err, MigratorError::NoMigrations);
    }
}
