//! Resolution of file rules into archive entries
//!
//! Each rule goes through three stages:
//! - template evaluation of its source, destination and metadata
//! - expansion of the source pattern into matching files
//! - composition of each file's destination path
//!
//! Rules are resolved in order and the first error aborts the whole batch.

pub mod destination;
pub mod expand;
pub mod metadata;
pub mod path;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

use crate::error::ResolveError;
use crate::fs::FileSystem;
use crate::template::Substitute;
use crate::types::{ResolvedFile, Rule};

pub use destination::destination_for;
pub use expand::PatternExpander;
pub use metadata::{format_mtime, parse_mtime, resolve_info};

/// Resolver settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Drop entries whose destination was already produced by an earlier
    /// entry, keeping the first one.
    pub unique_destinations: bool,
}

/// Turns [`Rule`]s into [`ResolvedFile`]s.
pub struct Resolver<F, S> {
    expander: PatternExpander<F>,
    templater: S,
    options: ResolveOptions,
}

impl<F: FileSystem, S: Substitute> Resolver<F, S> {
    pub fn new(fs: F, templater: S) -> Self {
        Self {
            expander: PatternExpander::new(fs),
            templater,
            options: ResolveOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolves all rules, in order. Nothing is returned unless every rule
    /// resolves.
    pub fn resolve(&self, rules: &[Rule]) -> Result<Vec<ResolvedFile>, ResolveError> {
        let mut result = Vec::new();
        for (index, rule) in rules.iter().enumerate() {
            result.extend(self.resolve_rule(index, rule)?);
        }

        if self.options.unique_destinations {
            result = unique_destinations(result);
        }

        debug!(rules = rules.len(), files = result.len(), "resolved file rules");
        Ok(result)
    }

    /// Resolves a single rule. `index` is only used for error context.
    pub fn resolve_rule(
        &self,
        index: usize,
        rule: &Rule,
    ) -> Result<Vec<ResolvedFile>, ResolveError> {
        let pattern = self
            .templater
            .substitute(&rule.source)
            .map_err(|e| ResolveError::template(index, "src", e))?;
        let destination = self
            .templater
            .substitute(&rule.destination)
            .map_err(|e| ResolveError::template(index, "dst", e))?;
        let info = resolve_info(index, &rule.info, &self.templater)?;

        let sources = self.expander.expand(&pattern)?;
        debug!(
            rule = index,
            pattern = %pattern,
            matches = sources.len(),
            "expanded rule"
        );

        Ok(sources
            .into_iter()
            .map(|source| {
                let destination = destination_for(&source, &destination, rule.strip_parent);
                trace!(source = %source, destination = %destination, "resolved file");
                ResolvedFile {
                    source,
                    destination,
                    info: info.clone(),
                }
            })
            .collect())
    }
}

/// Resolves `rules` with default options.
pub fn resolve<F, S>(
    rules: &[Rule],
    fs: F,
    templater: S,
) -> Result<Vec<ResolvedFile>, ResolveError>
where
    F: FileSystem,
    S: Substitute,
{
    Resolver::new(fs, templater).resolve(rules)
}

/// Keeps the first entry for each destination, preserving order.
pub fn unique_destinations(files: Vec<ResolvedFile>) -> Vec<ResolvedFile> {
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut result = Vec::with_capacity(files.len());

    for file in files {
        if let Some(existing) = seen.get(&file.destination) {
            warn!(
                destination = %file.destination,
                existing = %existing,
                ignored = %file.source,
                "file already exists in archive, ignoring"
            );
            continue;
        }
        seen.insert(file.destination.clone(), file.source.clone());
        result.push(file);
    }

    result
}
