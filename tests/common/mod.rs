//! Shared helpers for integration tests

#![allow(dead_code)]

use archive_files::{OsFileSystem, TemplateContext, TemplateProcessor};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Directory containing `testdata/`.
pub fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests")
}

pub fn fixture_fs() -> OsFileSystem {
    OsFileSystem::new(fixture_root())
}

/// Commit date with sub-second precision dropped.
pub fn commit_date() -> DateTime<Utc> {
    DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap()
}

pub fn processor(commit_date: DateTime<Utc>) -> TemplateProcessor {
    let ctx = TemplateContext::new()
        .with_env_list(["OWNER=carlos"])
        .unwrap()
        .with_commit_date(commit_date);
    TemplateProcessor::new(&ctx).unwrap()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}
