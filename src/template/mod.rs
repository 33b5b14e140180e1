//! Template evaluation for rule fields
//!
//! Rule fields use the `{{ .Env.NAME }}` / `{{ .CommitDate }}` dialect. Text is
//! converted to handlebars paths and rendered in strict mode against a typed
//! [`TemplateContext`], so a reference to anything the context does not
//! define is an error rather than an empty string.

pub mod context;
pub mod dialect;
pub mod git;
pub mod processor;

use thiserror::Error;

pub use context::TemplateContext;
pub use dialect::DialectConverter;
pub use git::GitInfo;
pub use processor::TemplateProcessor;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String },

    #[error("template rendering failed: {message}")]
    RenderingFailed { message: String },

    #[error("invalid template syntax: {message}")]
    InvalidSyntax { message: String },

    #[error("invalid environment entry {entry:?}: expected KEY=VALUE")]
    InvalidEnv { entry: String },
}

impl From<handlebars::RenderError> for TemplateError {
    fn from(error: handlebars::RenderError) -> Self {
        use handlebars::RenderErrorReason;

        match error.reason() {
            RenderErrorReason::MissingVariable(name) => TemplateError::UndefinedVariable {
                name: name.clone().unwrap_or_else(|| "<unknown>".to_string()),
            },
            // Strict mode reports a missing helper argument this way.
            RenderErrorReason::ParamNotFoundForName(..)
            | RenderErrorReason::ParamNotFoundForIndex(..) => TemplateError::UndefinedVariable {
                name: error.to_string(),
            },
            RenderErrorReason::TemplateError(e) => TemplateError::InvalidSyntax {
                message: e.to_string(),
            },
            _ => TemplateError::RenderingFailed {
                message: error.to_string(),
            },
        }
    }
}

/// Substitutes template expressions in a piece of text.
pub trait Substitute {
    fn substitute(&self, text: &str) -> Result<String, TemplateError>;
}

impl<T: Substitute + ?Sized> Substitute for &T {
    fn substitute(&self, text: &str) -> Result<String, TemplateError> {
        (**self).substitute(text)
    }
}

/// Returns `true` when `text` contains a substitution marker.
pub fn has_markers(text: &str) -> bool {
    text.contains("{{")
}
