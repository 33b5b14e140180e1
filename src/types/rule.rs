//! File inclusion rules and their resolved form

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single file inclusion rule as written in configuration.
///
/// Rules can also be given as a bare string, which is shorthand for a rule
/// with only `src` set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RuleRepr")]
pub struct Rule {
    /// Glob pattern, file or directory to include. May contain templates.
    #[serde(rename = "src")]
    pub source: String,
    /// Directory prefix inside the archive. May contain templates.
    #[serde(rename = "dst", skip_serializing_if = "String::is_empty")]
    pub destination: String,
    /// Drop the matched file's parent directories, keeping only its name.
    #[serde(skip_serializing_if = "is_false")]
    pub strip_parent: bool,
    #[serde(skip_serializing_if = "FileInfo::is_empty")]
    pub info: FileInfo,
}

impl Rule {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = destination.into();
        self
    }

    pub fn strip_parent(mut self) -> Self {
        self.strip_parent = true;
        self
    }

    pub fn with_info(mut self, info: FileInfo) -> Self {
        self.info = info;
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RuleRepr {
    Path(String),
    Full {
        #[serde(rename = "src", alias = "source")]
        source: String,
        #[serde(rename = "dst", alias = "destination", default)]
        destination: String,
        #[serde(default)]
        strip_parent: bool,
        #[serde(default)]
        info: FileInfo,
    },
}

impl From<RuleRepr> for Rule {
    fn from(repr: RuleRepr) -> Self {
        match repr {
            RuleRepr::Path(source) => Rule::new(source),
            RuleRepr::Full {
                source,
                destination,
                strip_parent,
                info,
            } => Rule {
                source,
                destination,
                strip_parent,
                info,
            },
        }
    }
}

/// Ownership, permission and timestamp metadata for archived files.
///
/// `owner`, `group` and `mtime` are template strings. `parsed_mtime` is
/// derived from `mtime` during resolution, but can also be set directly, in
/// which case it is kept as long as `mtime` is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInfo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub owner: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub group: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub mode: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mtime: String,
    #[serde(skip)]
    pub parsed_mtime: Option<DateTime<Utc>>,
}

impl FileInfo {
    pub fn is_empty(&self) -> bool {
        self == &FileInfo::default()
    }
}

/// Metadata after templates have been applied.
pub type ResolvedFileInfo = FileInfo;

/// A single file to be written to the archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFile {
    /// Path of the file on disk, `/`-separated.
    pub source: String,
    /// Path of the file inside the archive.
    pub destination: String,
    #[serde(default, skip_serializing_if = "FileInfo::is_empty")]
    pub info: ResolvedFileInfo,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}
