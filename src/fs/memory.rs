//! In-memory filesystem for hermetic tests

use std::collections::BTreeSet;
use std::io;

use super::{EntryKind, FileSystem};

/// A set of file paths; directories exist implicitly as path prefixes.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: BTreeSet<String>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fs = Self::new();
        for file in files {
            fs.add_file(file);
        }
        fs
    }

    pub fn add_file(&mut self, path: impl Into<String>) {
        let path: String = path.into();
        self.files.insert(path.trim_matches('/').to_string());
    }

    fn dir_prefix(dir: &str) -> String {
        let dir = dir.trim_matches('/');
        if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        }
    }
}

impl FileSystem for MemoryFileSystem {
    fn kind(&self, path: &str) -> io::Result<Option<EntryKind>> {
        let path = path.trim_matches('/');
        if self.files.contains(path) {
            return Ok(Some(EntryKind::File));
        }

        let prefix = Self::dir_prefix(path);
        let is_dir = self
            .files
            .range(prefix.clone()..)
            .next()
            .is_some_and(|f| f.starts_with(&prefix));
        Ok(is_dir.then_some(EntryKind::Dir))
    }

    /// Files below `dir`, ordered component by component like a sorted walk.
    fn files_under(&self, dir: &str) -> io::Result<Vec<String>> {
        let prefix = Self::dir_prefix(dir);
        let mut files: Vec<String> = self
            .files
            .range(prefix.clone()..)
            .take_while(|f| f.starts_with(&prefix))
            .cloned()
            .collect();
        files.sort_by(|a, b| a.split('/').cmp(b.split('/')));
        Ok(files)
    }
}
