//! Static checks for templates.
//!
//! Interpolation is fail-open, so problems in a template never surface at
//! render time. These checks find them ahead of publishing.

use serde::Serialize;

use super::conditional::Condition;
use super::engine::VariableInterpolator;
use super::formatters::{FORMATTER_NAMES, Formatter, FormatterError};
use super::syntax::preceded_by_ident;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The template renders, but probably not as intended.
    Warning,
    /// Part of the template will be emitted as literal text.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    UnclosedConditional,
    UnmatchedEndIf,
    NestedConditional,
    InvalidCondition { condition: String },
    UnknownFormatter { name: String },
    InvalidFormatterArgument { message: String },
}

/// A problem found in a template, at a byte offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateIssue {
    pub offset: usize,
    pub severity: Severity,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl TemplateIssue {
    fn error(offset: usize, kind: IssueKind) -> Self {
        Self { offset, severity: Severity::Error, kind }
    }

    fn warning(offset: usize, kind: IssueKind) -> Self {
        Self { offset, severity: Severity::Warning, kind }
    }

    /// Human-readable description.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.kind {
            IssueKind::UnclosedConditional => "{if} block is never closed".to_string(),
            IssueKind::UnmatchedEndIf => "{/if} without a matching {if}".to_string(),
            IssueKind::NestedConditional => {
                "nested {if} blocks are not supported".to_string()
            }
            IssueKind::InvalidCondition { condition } => {
                format!("cannot parse condition '{condition}'")
            }
            IssueKind::UnknownFormatter { name } => format!("unknown formatter '{name}'"),
            IssueKind::InvalidFormatterArgument { message } => message.clone(),
        }
    }
}

impl VariableInterpolator {
    /// Check a template for malformed conditionals and formatters.
    ///
    /// Issues are sorted by offset. Checks for disabled features are skipped.
    #[must_use]
    pub fn validate(&self, template: &str) -> Vec<TemplateIssue> {
        let mut issues = Vec::new();
        if self.options().enable_conditional_content {
            self.check_blocks(template, &mut issues);
        }
        if self.options().enable_formatting {
            self.check_formatters(template, &mut issues);
        }
        issues.sort_by_key(|i| i.offset);
        issues
    }

    fn check_blocks(&self, template: &str, issues: &mut Vec<TemplateIssue>) {
        let syntax = self.syntax();

        let mut open: Vec<usize> = Vec::new();
        for marker in syntax.block_marker.find_iter(template) {
            if marker.as_str() == "{/if}" {
                if open.pop().is_none() {
                    issues.push(TemplateIssue::error(marker.start(), IssueKind::UnmatchedEndIf));
                }
            } else {
                if !open.is_empty() {
                    issues.push(TemplateIssue::error(
                        marker.start(),
                        IssueKind::NestedConditional,
                    ));
                }
                open.push(marker.start());
            }
        }
        for start in open {
            issues.push(TemplateIssue::error(start, IssueKind::UnclosedConditional));
        }

        for caps in syntax.conditional.captures_iter(template) {
            let (Some(whole), Some(cond)) = (caps.get(0), caps.name("cond")) else {
                continue;
            };
            if Condition::parse(cond.as_str(), &syntax.condition).is_none() {
                issues.push(TemplateIssue::error(
                    whole.start(),
                    IssueKind::InvalidCondition { condition: cond.as_str().to_string() },
                ));
            }
        }
    }

    fn check_formatters(&self, template: &str, issues: &mut Vec<TemplateIssue>) {
        let syntax = self.syntax();

        for caps in syntax.token.captures_iter(template) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if preceded_by_ident(template, whole.start()) {
                continue;
            }

            if let Some(filters) = caps.name("filters") {
                for (name, arg) in syntax.formatter_specs(filters.as_str()) {
                    if let Err(e) = Formatter::parse(name, arg) {
                        issues.push(TemplateIssue::error(whole.start(), e.into()));
                    }
                }
            }

            // A `| word` right after the recognized chain was not consumed.
            if let Some(trailing) = syntax.trailing_pipe.captures(&template[whole.end()..]) {
                let name = trailing.name("name").map_or("", |m| m.as_str());
                if !FORMATTER_NAMES.contains(&name) {
                    issues.push(TemplateIssue::warning(
                        whole.start(),
                        IssueKind::UnknownFormatter { name: name.to_string() },
                    ));
                }
            }
        }
    }
}

impl From<FormatterError> for IssueKind {
    fn from(e: FormatterError) -> Self {
        match e {
            FormatterError::Unknown(name) => IssueKind::UnknownFormatter { name },
            other => IssueKind::InvalidFormatterArgument { message: other.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolate::options::InterpolationOptions;

    fn validate(template: &str) -> Vec<TemplateIssue> {
        VariableInterpolator::new(InterpolationOptions::default())
            .unwrap()
            .validate(template)
    }

    fn kinds(template: &str) -> Vec<IssueKind> {
        validate(template).into_iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_clean_template() {
        let template = "{if @score > 80}Great @name | title{else}Keep going{/if} @price|currency";
        assert!(validate(template).is_empty());
    }

    #[test]
    fn test_unclosed_conditional() {
        let issues = validate("Hi {if @x}there");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].offset, 3);
        assert_eq!(issues[0].kind, IssueKind::UnclosedConditional);
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_unmatched_end_if() {
        assert_eq!(kinds("done{/if}"), vec![IssueKind::UnmatchedEndIf]);
    }

    #[test]
    fn test_nested_conditional() {
        assert_eq!(kinds("{if @a}{if @b}x{/if}{/if}"), vec![IssueKind::NestedConditional]);
    }

    #[test]
    fn test_invalid_condition() {
        assert_eq!(
            kinds("{if score > 1}x{/if}"),
            vec![IssueKind::InvalidCondition { condition: "score > 1".to_string() }]
        );
    }

    #[test]
    fn test_unknown_formatter_is_warning() {
        let issues = validate("Hi @name | shout");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].kind, IssueKind::UnknownFormatter { name: "shout".to_string() });
        assert_eq!(issues[0].message(), "unknown formatter 'shout'");
    }

    #[test]
    fn test_unknown_formatter_after_known_chain() {
        assert_eq!(
            kinds("@name | trim | bogus"),
            vec![IssueKind::UnknownFormatter { name: "bogus".to_string() }]
        );
    }

    #[test]
    fn test_invalid_formatter_argument() {
        let issues = validate("@bio|truncate:many");
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].message(),
            "invalid argument 'many' for formatter 'truncate'"
        );
    }

    #[test]
    fn test_oversized_decimals_are_errors() {
        let issues = validate("@n | number:70000");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(issues[0].message(), "invalid argument '70000' for formatter 'number'");
    }

    #[test]
    fn test_disabled_features_are_not_checked() {
        let opts = InterpolationOptions {
            enable_conditional_content: false,
            enable_formatting: false,
            ..Default::default()
        };
        let interpolator = VariableInterpolator::new(opts).unwrap();
        assert!(interpolator.validate("{if x}@name | shout").is_empty());
    }

    #[test]
    fn test_issue_serializes_flat() {
        let issues = validate("@name | shout");
        let json = serde_json::to_value(&issues[0]).unwrap();
        assert_eq!(json["kind"], "unknown_formatter");
        assert_eq!(json["name"], "shout");
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["offset"], 0);
    }

    #[test]
    fn test_formatter_error_conversion() {
        let kind: IssueKind = FormatterError::Unknown("x".into()).into();
        assert_eq!(kind, IssueKind::UnknownFormatter { name: "x".into() });
    }
}
