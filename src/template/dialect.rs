//! Conversion of `{{ .Field }}` style templates into handlebars

use regex::{Captures, Regex};

use super::TemplateError;

/// Rewrites leading-dot field access into handlebars paths.
///
/// `{{ .Env.OWNER }}` becomes `{{ Env.OWNER }}` and `{{ tolower .Tag }}`
/// becomes `{{ tolower Tag }}`. `{{-`/`-}}` trim markers map to handlebars
/// `~`. Text that already uses handlebars paths passes through unchanged.
pub struct DialectConverter {
    expression_regex: Regex,
    field_regex: Regex,
}

impl DialectConverter {
    pub fn new() -> Result<Self, TemplateError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| TemplateError::InvalidSyntax {
                message: format!("regex error: {e}"),
            })
        };

        Ok(Self {
            expression_regex: compile(r"\{\{(-?)(.*?)(-?)\}\}")?,
            field_regex: compile(r"(^|[\s(])\.([A-Za-z_])")?,
        })
    }

    pub fn convert(&self, template: &str) -> String {
        self.expression_regex
            .replace_all(template, |caps: &Captures| {
                let open = if caps[1].is_empty() { "" } else { "~" };
                let close = if caps[3].is_empty() { "" } else { "~" };
                let body = self.field_regex.replace_all(&caps[2], "${1}${2}");
                format!("{{{{{open}{body}{close}}}}}")
            })
            .into_owned()
    }
}
