//! Filesystem access used by pattern expansion
//!
//! Paths handed to and returned from a [`FileSystem`] are `/`-separated
//! strings. Relative paths are interpreted against the filesystem's root and
//! the empty string names the root itself.

pub mod memory;
pub mod os;

use std::io;

pub use memory::MemoryFileSystem;
pub use os::OsFileSystem;

/// Kind of a filesystem entry, after following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Other,
}

/// Read-only view of a directory tree.
pub trait FileSystem {
    /// Kind of the entry at `path`, or `None` if nothing exists there.
    fn kind(&self, path: &str) -> io::Result<Option<EntryKind>>;

    /// Every regular file beneath `dir`, in directory traversal order.
    ///
    /// Returned paths include the `dir` prefix. Symlinked directories are
    /// followed.
    fn files_under(&self, dir: &str) -> io::Result<Vec<String>>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn kind(&self, path: &str) -> io::Result<Option<EntryKind>> {
        (**self).kind(path)
    }

    fn files_under(&self, dir: &str) -> io::Result<Vec<String>> {
        (**self).files_under(dir)
    }
}

pub(crate) fn join_relative(dir: &str, relative: &str) -> String {
    match (dir.is_empty(), relative.is_empty()) {
        (true, _) => relative.to_string(),
        (false, true) => dir.to_string(),
        (false, false) if dir.ends_with('/') => format!("{dir}{relative}"),
        (false, false) => format!("{dir}/{relative}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_relative() {
        assert_eq!(join_relative("", "a.txt"), "a.txt");
        assert_eq!(join_relative("testdata", ""), "testdata");
        assert_eq!(join_relative("testdata", "a/a.txt"), "testdata/a/a.txt");
        assert_eq!(join_relative("/", "etc/hosts"), "/etc/hosts");
    }
}
