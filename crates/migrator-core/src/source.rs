//! Migration sources
//!
//! A [`MigrationSource`] is a read-only, hierarchical store of migration
//! files. Paths are relative to the source root, use `/` as separator, and
//! the root itself is the empty string.

mod dir;
mod memory;

pub use dir::DirSource;
pub use memory::MemorySource;

use std::io;

/// A single child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub name: String,
    pub is_dir: bool,
}

impl SourceEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

/// Read access to a tree of migration files
pub trait MigrationSource {
    /// List the direct children of `dir`
    fn list(&self, dir: &str) -> io::Result<Vec<SourceEntry>>;

    /// Read the full content of the file at `path`
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;

    /// Human-readable description used in logs and errors
    fn describe(&self) -> String {
        "<migration source>".to_string()
    }
}

impl<S: MigrationSource + ?Sized> MigrationSource for &S {
    fn list(&self, dir: &str) -> io::Result<Vec<SourceEntry>> {
        (**self).list(dir)
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        (**self).read(path)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Join a source-relative directory and a child name
pub fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}
