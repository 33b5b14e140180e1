use thiserror::Error;

use crate::template::TemplateError;

/// Errors that can occur while resolving file rules
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("invalid glob pattern {pattern:?}: {reason}")]
    Pattern { pattern: String, reason: String },

    #[error("failed to apply template to {field} of rule #{rule}: {source}")]
    Template {
        rule: usize,
        field: &'static str,
        #[source]
        source: TemplateError,
    },

    #[error("failed to parse mtime {value:?} of rule #{rule}: {source}")]
    Format {
        rule: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("I/O error while matching {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    pub(crate) fn template(rule: usize, field: &'static str, source: TemplateError) -> Self {
        ResolveError::Template {
            rule,
            field,
            source,
        }
    }

    /// Name of the rule field whose evaluation failed, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ResolveError::Template { field, .. } => Some(*field),
            ResolveError::Format { .. } => Some("mtime"),
            _ => None,
        }
    }

    /// Index of the rule that failed, if the failure belongs to one rule.
    pub fn rule(&self) -> Option<usize> {
        match self {
            ResolveError::Template { rule, .. } | ResolveError::Format { rule, .. } => Some(*rule),
            _ => None,
        }
    }

    pub fn is_template_error(&self) -> bool {
        matches!(self, ResolveError::Template { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_error_carries_field_and_rule() {
        let err = ResolveError::template(
            2,
            "owner",
            TemplateError::UndefinedVariable {
                name: "Env.NOPE".to_string(),
            },
        );

        assert!(err.is_template_error());
        assert_eq!(err.field(), Some("owner"));
        assert_eq!(err.rule(), Some(2));
        let message = err.to_string();
        assert!(message.contains("owner"));
        assert!(message.contains("Env.NOPE"));
    }

    #[test]
    fn test_pattern_error_has_no_rule_context() {
        let err = ResolveError::Pattern {
            pattern: "[abc".to_string(),
            reason: "unclosed character class".to_string(),
        };

        assert!(!err.is_template_error());
        assert_eq!(err.field(), None);
        assert_eq!(err.rule(), None);
        assert!(err.to_string().contains("[abc"));
    }
}
