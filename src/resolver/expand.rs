//! Expansion of source patterns into matching files

use globset::{GlobBuilder, GlobMatcher};
use std::collections::HashSet;
use tracing::{debug, trace};

use super::path;
use crate::error::ResolveError;
use crate::fs::{EntryKind, FileSystem};

/// Expands glob patterns against a [`FileSystem`].
///
/// Patterns without metacharacters name a file or a directory; a directory
/// expands to every file beneath it. The same holds for directories matched
/// by a glob: `testdata/*` yields files at any depth below `testdata`.
pub struct PatternExpander<F> {
    fs: F,
}

impl<F: FileSystem> PatternExpander<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    /// Files matched by `pattern`. An empty pattern matches nothing; use `.`
    /// for the whole root.
    pub fn expand(&self, pattern: &str) -> Result<Vec<String>, ResolveError> {
        let Some(pattern) = normalize_pattern(pattern) else {
            debug!("empty pattern matches no files");
            return Ok(Vec::new());
        };

        let files = if has_meta(&pattern) {
            self.expand_glob(&pattern)?
        } else {
            self.expand_literal(&pattern)?
        };

        if files.is_empty() {
            debug!(pattern = %pattern, "pattern matched no files");
        }
        Ok(files)
    }

    fn expand_literal(&self, pattern: &str) -> Result<Vec<String>, ResolveError> {
        match self.fs.kind(pattern).map_err(io_error(pattern))? {
            Some(EntryKind::File) => Ok(vec![pattern.to_string()]),
            Some(EntryKind::Dir) => self.fs.files_under(pattern).map_err(io_error(pattern)),
            Some(EntryKind::Other) | None => Ok(Vec::new()),
        }
    }

    fn expand_glob(&self, pattern: &str) -> Result<Vec<String>, ResolveError> {
        let matcher = compile(pattern)?;
        let base = static_prefix(pattern);

        if self.fs.kind(&base).map_err(io_error(&base))? != Some(EntryKind::Dir) {
            return Ok(Vec::new());
        }

        let mut seen = HashSet::new();
        let mut files = Vec::new();
        for file in self.fs.files_under(&base).map_err(io_error(&base))? {
            if matches_self_or_ancestor(&matcher, &base, &file) && seen.insert(file.clone()) {
                trace!(pattern = %pattern, file = %file, "matched");
                files.push(file);
            }
        }
        Ok(files)
    }
}

/// Cleaned pattern with the root spelled as `""`, or `None` for an empty one.
fn normalize_pattern(pattern: &str) -> Option<String> {
    let cleaned = path::clean(&path::to_slash(pattern));
    match cleaned.as_str() {
        "" => None,
        "." => Some(String::new()),
        _ => Some(cleaned),
    }
}

fn has_meta(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', '{'])
}

fn compile(pattern: &str) -> Result<GlobMatcher, ResolveError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .backslash_escape(false)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| ResolveError::Pattern {
            pattern: pattern.to_string(),
            reason: e.kind().to_string(),
        })
}

/// Leading components of `pattern` that contain no metacharacters.
fn static_prefix(pattern: &str) -> String {
    let prefix = pattern
        .split('/')
        .take_while(|part| !has_meta(part))
        .collect::<Vec<_>>()
        .join("/");

    if prefix.is_empty() && pattern.starts_with('/') {
        "/".to_string()
    } else {
        prefix
    }
}

fn matches_self_or_ancestor(matcher: &GlobMatcher, base: &str, file: &str) -> bool {
    file.match_indices('/')
        .map(|(idx, _)| idx)
        .filter(|&idx| idx > base.len())
        .any(|idx| matcher.is_match(&file[..idx]))
        || matcher.is_match(file)
}

fn io_error(path: &str) -> impl FnOnce(std::io::Error) -> ResolveError + '_ {
    move |source| ResolveError::Io {
        path: path.to_string(),
        source,
    }
}
