//! Build metadata read from a git repository

use chrono::{DateTime, Utc};
use git2::Repository;
use std::path::Path;

/// HEAD commit metadata exposed to templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitInfo {
    pub commit: String,
    pub commit_date: DateTime<Utc>,
    /// `None` when HEAD is detached.
    pub branch: Option<String>,
}

impl GitInfo {
    /// Reads HEAD of the repository containing `path`.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, git2::Error> {
        let repo = Repository::discover(path)?;
        let head = repo.head()?;
        let commit = head.peel_to_commit()?;

        let seconds = commit.time().seconds();
        let commit_date = DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
            git2::Error::from_str(&format!("commit time out of range: {seconds}"))
        })?;

        let branch = if head.is_branch() {
            head.shorthand().map(str::to_string)
        } else {
            None
        };

        tracing::debug!(commit = %commit.id(), ?branch, "read git metadata");

        Ok(Self {
            commit: commit.id().to_string(),
            commit_date,
            branch,
        })
    }
}
