//! In-memory migration source
//!
//! Backs test fixtures and migrations embedded at compile time with
//! `include_str!`.

use super::{MigrationSource, SourceEntry};
use std::collections::BTreeMap;
use std::io;

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Dir,
}

/// Migration source holding its entries in memory
///
/// Parent directories of inserted files exist implicitly.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    nodes: BTreeMap<String, Node>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source from `(path, sql)` pairs
    ///
    /// # Example
    ///
    /// ```
    /// use migrator_core::source::MemorySource;
    ///
    /// static MIGRATIONS: &[(&str, &str)] = &[
    ///     ("0001_init.sql", "create table t(id integer)"),
    ///     ("0002_seed.sql", "insert into t values (1)"),
    /// ];
    ///
    /// let source = MemorySource::from_static(MIGRATIONS);
    /// assert_eq!(source.len(), 2);
    /// ```
    pub fn from_static(files: &[(&str, &str)]) -> Self {
        files
            .iter()
            .fold(Self::new(), |source, (path, sql)| source.with_file(*path, *sql))
    }

    /// Add a file, replacing any previous entry at the same path
    pub fn with_file(mut self, path: impl Into<String>, content: impl AsRef<[u8]>) -> Self {
        self.nodes
            .insert(normalize(&path.into()), Node::File(content.as_ref().to_vec()));
        self
    }

    /// Add an explicit (possibly empty) directory
    pub fn with_dir(mut self, path: impl Into<String>) -> Self {
        self.nodes.insert(normalize(&path.into()), Node::Dir);
        self
    }

    /// Number of files held by the source
    pub fn len(&self) -> usize {
        self.nodes
            .values()
            .filter(|node| matches!(node, Node::File(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_dir(&self, dir: &str) -> bool {
        if dir.is_empty() {
            return true;
        }
        match self.nodes.get(dir) {
            Some(Node::Dir) => true,
            Some(Node::File(_)) => false,
            None => {
                let prefix = format!("{}/", dir);
                self.nodes.keys().any(|key| key.starts_with(&prefix))
            }
        }
    }
}

fn normalize(path: &str) -> String {
    path.split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}

impl MigrationSource for MemorySource {
    fn list(&self, dir: &str) -> io::Result<Vec<SourceEntry>> {
        let dir = normalize(dir);
        if !self.is_dir(&dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", dir),
            ));
        }

        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{}/", dir)
        };

        // child name -> is_dir
        let mut children: BTreeMap<&str, bool> = BTreeMap::new();
        for (key, node) in &self.nodes {
            let Some(rest) = key.strip_prefix(prefix.as_str()) else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            match rest.split_once('/') {
                Some((child, _)) => {
                    children.insert(child, true);
                }
                None => {
                    let is_dir = matches!(node, Node::Dir);
                    children.entry(rest).or_insert(is_dir);
                }
            }
        }

        Ok(children
            .into_iter()
            .map(|(name, is_dir)| SourceEntry {
                name: name.to_string(),
                is_dir,
            })
            .collect())
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        match self.nodes.get(&normalize(path)) {
            Some(Node::File(content)) => Ok(content.clone()),
            Some(Node::Dir) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("is a directory: {}", path),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path),
            )),
        }
    }

    fn describe(&self) -> String {
        format!("<memory: {} files>", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_root_with_implicit_dirs() {
        let source = MemorySource::new()
            .with_file("0001.sql", "a")
            .with_file("nested/deeper/0002.sql", "b")
            .with_dir("empty");

        let entries = source.list("").unwrap();
        assert_eq!(
            entries,
            vec![
                SourceEntry::file("0001.sql"),
                SourceEntry::dir("empty"),
                SourceEntry::dir("nested"),
            ]
        );
        assert_eq!(
            source.list("nested").unwrap(),
            vec![SourceEntry::dir("deeper")]
        );
    }

    #[test]
    fn test_list_unknown_dir_is_not_found() {
        let source = MemorySource::new().with_file("0001.sql", "a");
        let err = source.list("missing").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_list_file_as_dir_fails() {
        let source = MemorySource::new().with_file("0001.sql", "a");
        assert!(source.list("0001.sql").is_err());
    }

    #[test]
    fn test_read_file_and_missing() {
        let source = MemorySource::new().with_file("./a/0001.sql", "select 1");
        assert_eq!(source.read("a/0001.sql").unwrap(), b"select 1");
        assert_eq!(
            source.read("a/0002.sql").unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn test_from_static_counts_files() {
        let source = MemorySource::from_static(&[("0001.sql", "a"), ("0002.sql", "b")]);
        assert_eq!(source.len(), 2);
        assert!(!source.is_empty());
        assert!(MemorySource::new().is_empty());
    }
}
