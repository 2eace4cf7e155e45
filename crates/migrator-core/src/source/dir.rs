//! Filesystem-backed migration source

use super::{MigrationSource, SourceEntry};
use crate::discover::MIGRATION_EXTENSION;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Migration source rooted at a directory on disk
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Create a source rooted at the given directory
    ///
    /// The directory is not touched until the source is listed.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, relative: &str) -> PathBuf {
        if relative.is_empty() {
            return self.root.clone();
        }
        relative
            .split('/')
            .fold(self.root.clone(), |path, part| path.join(part))
    }
}

impl MigrationSource for DirSource {
    fn list(&self, dir: &str) -> io::Result<Vec<SourceEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(self.resolve(dir))? {
            let entry = entry?;
            // Symlinks are not followed, matching a plain directory walk
            let is_dir = entry.file_type()?.is_dir();
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                // A file that could never be a migration is skipped like any other
                Err(raw)
                    if !is_dir && !raw.to_string_lossy().ends_with(MIGRATION_EXTENSION) =>
                {
                    continue;
                }
                Err(raw) => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("non UTF-8 file name: {:?}", raw),
                    ));
                }
            };
            entries.push(SourceEntry { name, is_dir });
        }
        Ok(entries)
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(path))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
