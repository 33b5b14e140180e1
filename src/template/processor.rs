//! Handlebars-backed template processor

use handlebars::{handlebars_helper, Handlebars};
use serde_json::Value;

use super::context::TemplateContext;
use super::dialect::DialectConverter;
use super::{has_markers, Substitute, TemplateError};

handlebars_helper!(to_lower_helper: |s: str| s.to_lowercase());
handlebars_helper!(to_upper_helper: |s: str| s.to_uppercase());
handlebars_helper!(trim_helper: |s: str| s.trim().to_string());
handlebars_helper!(trim_prefix_helper: |s: str, prefix: str| {
    s.strip_prefix(prefix).unwrap_or(s).to_string()
});
handlebars_helper!(trim_suffix_helper: |s: str, suffix: str| {
    s.strip_suffix(suffix).unwrap_or(s).to_string()
});
handlebars_helper!(replace_helper: |s: str, from: str, to: str| s.replace(from, to));

/// Renders rule fields against a fixed [`TemplateContext`].
pub struct TemplateProcessor {
    handlebars: Handlebars<'static>,
    converter: DialectConverter,
    data: Value,
}

impl TemplateProcessor {
    pub fn new(context: &TemplateContext) -> Result<Self, TemplateError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars.register_helper("tolower", Box::new(to_lower_helper));
        handlebars.register_helper("toupper", Box::new(to_upper_helper));
        handlebars.register_helper("trim", Box::new(trim_helper));
        handlebars.register_helper("trimprefix", Box::new(trim_prefix_helper));
        handlebars.register_helper("trimsuffix", Box::new(trim_suffix_helper));
        handlebars.register_helper("replace", Box::new(replace_helper));

        Ok(Self {
            handlebars,
            converter: DialectConverter::new()?,
            data: context.to_value(),
        })
    }

    pub fn render(&self, text: &str) -> Result<String, TemplateError> {
        if !has_markers(text) {
            return Ok(text.to_string());
        }

        let converted = self.converter.convert(text);
        let rendered = self.handlebars.render_template(&converted, &self.data)?;
        Ok(rendered)
    }
}

impl Substitute for TemplateProcessor {
    fn substitute(&self, text: &str) -> Result<String, TemplateError> {
        self.render(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn processor() -> TemplateProcessor {
        let ctx = TemplateContext::new()
            .with_env("OWNER", "carlos")
            .with_env("HTML", "<a&b>")
            .with_tag("v1.2.0")
            .with_commit_date(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap());
        TemplateProcessor::new(&ctx).unwrap()
    }

    #[test]
    fn test_plain_text_is_unchanged() {
        let p = processor();
        assert_eq!(p.render("root").unwrap(), "root");
        assert_eq!(p.render("").unwrap(), "");
    }

    #[test]
    fn test_env_lookup() {
        let p = processor();
        assert_eq!(p.render("{{ .Env.OWNER }}").unwrap(), "carlos");
        assert_eq!(p.render("user-{{.Env.OWNER}}").unwrap(), "user-carlos");
    }

    #[test]
    fn test_commit_date_is_rfc3339_utc() {
        let p = processor();
        assert_eq!(
            p.render("{{ .CommitDate }}").unwrap(),
            "2024-03-01T12:30:00Z"
        );
    }

    #[test]
    fn test_output_is_not_html_escaped() {
        let p = processor();
        assert_eq!(p.render("{{ .Env.HTML }}").unwrap(), "<a&b>");
    }

    #[test]
    fn test_undefined_env_variable() {
        let err = processor().render("{{ .Env.NOPE }}").unwrap_err();
        assert!(
            matches!(err, TemplateError::UndefinedVariable { .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn test_undefined_helper_argument() {
        let err = processor().render("{{ toupper .Env.NOPE }}").unwrap_err();
        assert!(
            matches!(err, TemplateError::UndefinedVariable { .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn test_unset_context_value_is_undefined() {
        let err = processor().render("{{ .Version }}").unwrap_err();
        assert!(matches!(err, TemplateError::UndefinedVariable { .. }));
    }

    #[test]
    fn test_helpers() {
        let p = processor();
        assert_eq!(p.render("{{ toupper .Env.OWNER }}").unwrap(), "CARLOS");
        assert_eq!(p.render("{{ trimprefix .Tag \"v\" }}").unwrap(), "1.2.0");
        assert_eq!(p.render("{{ replace .Tag \".\" \"_\" }}").unwrap(), "v1_2_0");
    }

    #[test]
    fn test_malformed_template() {
        assert!(processor().render("{{#if}}").is_err());
    }
}
