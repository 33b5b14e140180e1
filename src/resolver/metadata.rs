//! Template evaluation of file metadata

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::ResolveError;
use crate::template::Substitute;
use crate::types::{FileInfo, ResolvedFileInfo};

/// Applies templates to `owner`, `group` and `mtime`, in that order.
///
/// A non-empty `mtime` must render to an RFC 3339 timestamp; it is stored in
/// `parsed_mtime` and rewritten in canonical UTC form. An empty `mtime`
/// leaves `parsed_mtime` as given.
pub fn resolve_info<S>(
    rule: usize,
    info: &FileInfo,
    templater: &S,
) -> Result<ResolvedFileInfo, ResolveError>
where
    S: Substitute + ?Sized,
{
    let mut resolved = info.clone();

    resolved.owner = templater
        .substitute(&info.owner)
        .map_err(|e| ResolveError::template(rule, "owner", e))?;
    resolved.group = templater
        .substitute(&info.group)
        .map_err(|e| ResolveError::template(rule, "group", e))?;

    if info.mtime.is_empty() {
        return Ok(resolved);
    }

    let mtime = templater
        .substitute(&info.mtime)
        .map_err(|e| ResolveError::template(rule, "mtime", e))?;
    if mtime.is_empty() {
        resolved.mtime = mtime;
        return Ok(resolved);
    }

    let parsed = parse_mtime(&mtime).map_err(|source| ResolveError::Format {
        rule,
        value: mtime.clone(),
        source,
    })?;
    resolved.mtime = format_mtime(&parsed);
    resolved.parsed_mtime = Some(parsed);

    Ok(resolved)
}

/// Parses an RFC 3339 timestamp and converts it to UTC.
pub fn parse_mtime(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|t| t.with_timezone(&Utc))
}

/// Canonical RFC 3339 form, UTC, whole seconds.
pub fn format_mtime(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}
