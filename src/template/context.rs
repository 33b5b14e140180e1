//! Typed template context

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

use super::git::GitInfo;
use super::TemplateError;

/// Immutable snapshot of the variables available to templates.
///
/// Optional values that were never set are left out of the render data, so
/// referencing them fails in strict mode instead of rendering as an empty
/// string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    env: BTreeMap<String, String>,
    project_name: Option<String>,
    version: Option<String>,
    tag: Option<String>,
    branch: Option<String>,
    commit: Option<String>,
    commit_date: Option<DateTime<Utc>>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context seeded with the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    pub fn from_env() -> Self {
        let env = std::env::vars_os()
            .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (key, _) => {
                    warn!(key = ?key, "skipping non-unicode environment variable");
                    None
                }
            })
            .collect();

        Self {
            env,
            ..Default::default()
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Applies `KEY=VALUE` entries on top of the current environment.
    pub fn with_env_list<I, S>(mut self, entries: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for entry in entries {
            let entry = entry.as_ref();
            let (key, value) = entry
                .split_once('=')
                .filter(|(key, _)| !key.is_empty())
                .ok_or_else(|| TemplateError::InvalidEnv {
                    entry: entry.to_string(),
                })?;
            self.env.insert(key.to_string(), value.to_string());
        }
        Ok(self)
    }

    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = Some(commit.into());
        self
    }

    pub fn with_commit_date(mut self, date: DateTime<Utc>) -> Self {
        self.commit_date = Some(date);
        self
    }

    /// Copies HEAD metadata read from a git repository.
    pub fn with_git(mut self, git: GitInfo) -> Self {
        self.branch = git.branch;
        self.commit = Some(git.commit);
        self.commit_date = Some(git.commit_date);
        self
    }

    pub fn env(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn commit(&self) -> Option<&str> {
        self.commit.as_deref()
    }

    pub fn short_commit(&self) -> Option<&str> {
        self.commit.as_deref().map(|c| c.get(..7).unwrap_or(c))
    }

    pub fn commit_date(&self) -> Option<DateTime<Utc>> {
        self.commit_date
    }

    /// Render data handed to the template engine.
    pub fn to_value(&self) -> Value {
        let vars = TemplateVars {
            env: &self.env,
            project_name: self.project_name(),
            version: self.version(),
            tag: self.tag(),
            branch: self.branch(),
            commit: self.commit(),
            full_commit: self.commit(),
            short_commit: self.short_commit(),
            commit_date: self
                .commit_date
                .map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true)),
            commit_timestamp: self.commit_date.map(|d| d.timestamp()),
        };

        // Only strings, integers and maps of strings; this cannot fail.
        serde_json::to_value(vars).unwrap_or(Value::Null)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct TemplateVars<'a> {
    env: &'a BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_commit: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    short_commit: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit_timestamp: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_env_list_overrides() {
        let ctx = TemplateContext::new()
            .with_env("OWNER", "root")
            .with_env_list(["OWNER=carlos", "EMPTY=", "URL=a=b"])
            .unwrap();

        assert_eq!(ctx.env("OWNER"), Some("carlos"));
        assert_eq!(ctx.env("EMPTY"), Some(""));
        assert_eq!(ctx.env("URL"), Some("a=b"));
        assert_eq!(ctx.env("NOPE"), None);
    }

    #[test]
    fn test_env_list_rejects_entries_without_equals() {
        let err = TemplateContext::new()
            .with_env_list(["OWNER"])
            .unwrap_err();
        assert!(matches!(err, TemplateError::InvalidEnv { entry } if entry == "OWNER"));

        let err = TemplateContext::new().with_env_list(["=value"]).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidEnv { .. }));
    }

    #[test]
    fn test_render_data_omits_unset_values() {
        let ctx = TemplateContext::new().with_env("OWNER", "carlos");

        assert_eq!(ctx.to_value(), json!({"Env": {"OWNER": "carlos"}}));
    }

    #[test]
    fn test_render_data_with_commit() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let ctx = TemplateContext::new()
            .with_project_name("demo")
            .with_commit("0123456789abcdef")
            .with_commit_date(date);

        assert_eq!(ctx.short_commit(), Some("0123456"));
        assert_eq!(
            ctx.to_value(),
            json!({
                "Env": {},
                "ProjectName": "demo",
                "Commit": "0123456789abcdef",
                "FullCommit": "0123456789abcdef",
                "ShortCommit": "0123456",
                "CommitDate": "2024-03-01T12:30:00Z",
                "CommitTimestamp": 1709296200,
            })
        );
    }

    #[test]
    fn test_branch_from_builder() {
        let ctx = TemplateContext::new().with_branch("main");

        assert_eq!(ctx.branch(), Some("main"));
        assert_eq!(ctx.to_value()["Branch"], json!("main"));
    }

    #[cfg(unix)]
    #[test]
    fn test_from_env_skips_non_unicode_values() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let key = "ARCHIVE_FILES_NON_UNICODE_VALUE";
        std::env::set_var(key, OsStr::from_bytes(b"bad\xff"));
        std::env::set_var("ARCHIVE_FILES_UNICODE_VALUE", "ok");

        let ctx = TemplateContext::from_env();

        std::env::remove_var(key);
        std::env::remove_var("ARCHIVE_FILES_UNICODE_VALUE");
        assert_eq!(ctx.env(key), None);
        assert_eq!(ctx.env("ARCHIVE_FILES_UNICODE_VALUE"), Some("ok"));
    }

    #[test]
    fn test_short_commit_of_short_id() {
        let ctx = TemplateContext::new().with_commit("abc");
        assert_eq!(ctx.short_commit(), Some("abc"));
    }
}
