//! Real filesystem rooted at a directory

use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use super::{join_relative, EntryKind, FileSystem};

/// Filesystem rooted at a directory, usually the working directory.
///
/// Absolute paths bypass the root.
#[derive(Debug, Clone)]
pub struct OsFileSystem {
    root: PathBuf,
}

impl OsFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn current_dir() -> io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        if path.is_empty() {
            self.root.clone()
        } else if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.root.join(path)
        }
    }
}

impl FileSystem for OsFileSystem {
    fn kind(&self, path: &str) -> io::Result<Option<EntryKind>> {
        match std::fs::metadata(self.resolve(path)) {
            Ok(meta) if meta.is_file() => Ok(Some(EntryKind::File)),
            Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Dir)),
            Ok(_) => Ok(Some(EntryKind::Other)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn files_under(&self, dir: &str) -> io::Result<Vec<String>> {
        let base = self.resolve(dir);
        let mut files = Vec::new();

        for entry in WalkDir::new(&base).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if is_dangling_link(&e) => {
                    warn!(path = ?e.path(), "skipping dangling symlink");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = match entry.path().strip_prefix(&base) {
                Ok(relative) => relative_to_slash(relative),
                Err(_) => Some(String::new()),
            };
            let Some(relative) = relative else {
                warn!(path = ?entry.path(), "skipping non-unicode file name");
                continue;
            };
            files.push(join_relative(dir, &relative));
        }

        Ok(files)
    }
}

fn is_dangling_link(error: &walkdir::Error) -> bool {
    error.loop_ancestor().is_none()
        && error.io_error().map(|e| e.kind()) == Some(io::ErrorKind::NotFound)
        && error
            .path()
            .and_then(|p| std::fs::symlink_metadata(p).ok())
            .is_some_and(|meta| meta.file_type().is_symlink())
}

/// `/`-joined form of a path below the walk root, `None` if any name is not
/// valid Unicode.
fn relative_to_slash(path: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        if let Component::Normal(part) = component {
            parts.push(part.to_str()?);
        }
    }
    Some(parts.join("/"))
}
