//! Finding `@tokens` in templates without rendering them.

use std::collections::HashSet;
use std::ops::Range;

use serde::Serialize;

use crate::interpolate::VariableInterpolator;
use crate::interpolate::syntax::preceded_by_ident;

/// A formatter as written in the template, before parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatterSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
}

/// One `@token` occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenRef {
    /// Identifier or dotted path, without the `@`.
    pub path: String,
    pub formatters: Vec<FormatterSpec>,
    /// Byte range of the whole token, formatter chain included.
    pub span: Range<usize>,
}

impl VariableInterpolator {
    /// Every token in `template`, in order, using the same recognition rules
    /// as [`VariableInterpolator::interpolate`]. Tokens inside `{if}`
    /// conditions are included.
    #[must_use]
    pub fn extract_tokens(&self, template: &str) -> Vec<TokenRef> {
        let syntax = self.syntax();

        syntax
            .token
            .captures_iter(template)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                if preceded_by_ident(template, whole.start()) {
                    return None;
                }
                let formatters = caps
                    .name("filters")
                    .map(|m| {
                        syntax
                            .formatter_specs(m.as_str())
                            .into_iter()
                            .map(|(name, arg)| FormatterSpec {
                                name: name.to_string(),
                                arg: arg.map(ToString::to_string),
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                Some(TokenRef {
                    path: caps.name("path")?.as_str().to_string(),
                    formatters,
                    span: whole.range(),
                })
            })
            .collect()
    }

    /// Unique variable paths referenced by `template`, in first-appearance order.
    #[must_use]
    pub fn extract_variable_names(&self, template: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for token in self.extract_tokens(template) {
            if seen.insert(token.path.clone()) {
                names.push(token.path);
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use crate::interpolate::{InterpolationOptions, VariableInterpolator};

    fn interpolator() -> VariableInterpolator {
        VariableInterpolator::new(InterpolationOptions::default()).unwrap()
    }

    #[test]
    fn test_extract_variable_names() {
        let template = "Hi @name, {if @score > @threshold}great{/if} @name | upper @user.plan";
        let names = interpolator().extract_variable_names(template);
        assert_eq!(names, vec!["name", "score", "threshold", "user.plan"]);
    }

    #[test]
    fn test_extract_tokens_with_formatters_and_spans() {
        let template = "Total: @price | currency:EUR.";
        let tokens = interpolator().extract_tokens(template);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].path, "price");
        assert_eq!(tokens[0].formatters.len(), 1);
        assert_eq!(tokens[0].formatters[0].name, "currency");
        assert_eq!(tokens[0].formatters[0].arg.as_deref(), Some("EUR"));
        assert_eq!(&template[tokens[0].span.clone()], "@price | currency:EUR");
    }

    #[test]
    fn test_extract_skips_emails() {
        let names = interpolator().extract_variable_names("mail hello@acme.com or @name");
        assert_eq!(names, vec!["name"]);
    }

    #[test]
    fn test_extract_without_nested_access() {
        let opts = InterpolationOptions { enable_nested_access: false, ..Default::default() };
        let interpolator = VariableInterpolator::new(opts).unwrap();
        assert_eq!(interpolator.extract_variable_names("@user.plan"), vec!["user"]);
    }

    #[test]
    fn test_no_tokens() {
        assert!(interpolator().extract_tokens("plain text, no tokens").is_empty());
    }
}
