//! Token grammar shared by the interpolator, token extraction and validation.
//!
//! The language is regular apart from `{if}` blocks, which are matched one
//! level deep:
//!
//! - `@name`, `@user.plan` (dotted paths only with nested access)
//! - `@name | uppercase`, `@price|currency:EUR`, `@x | default:"a b"`
//! - `{if @score >= 80}...{else}...{/if}`

use regex::Regex;

use super::formatters::FORMATTER_NAMES;

const IDENT: &str = r"[A-Za-z0-9_]+";

/// Formatter argument: quoted text, or a run of non-space characters that
/// doesn't end in sentence punctuation.
const ARG: &str = r#"(?:"[^"]*"|[^\s|{}<>"]*[^\s|{}<>".,;:!?)\]])"#;

/// Compiled patterns for one combination of feature switches.
#[derive(Debug, Clone)]
pub(crate) struct Syntax {
    /// `@path` plus, when formatting is on, the raw formatter chain.
    pub(crate) token: Regex,
    /// One `| name:arg` element of a formatter chain.
    pub(crate) formatter: Regex,
    /// A whole `{if ...}...{/if}` block.
    pub(crate) conditional: Regex,
    /// The text between `{if` and `}`.
    pub(crate) condition: Regex,
    /// Any `{if ` opener or `{/if}` closer, for structural checks.
    pub(crate) block_marker: Regex,
    /// A `| word` suffix directly after a token, known formatter or not.
    pub(crate) trailing_pipe: Regex,
}

impl Syntax {
    pub(crate) fn new(nested: bool, formatting: bool) -> Result<Self, regex::Error> {
        let path = if nested {
            format!(r"{IDENT}(?:\.{IDENT})*")
        } else {
            IDENT.to_string()
        };

        let mut names: Vec<&str> = FORMATTER_NAMES.to_vec();
        // Longest first so `upper` never shadows `uppercase`.
        names.sort_by_key(|n| std::cmp::Reverse(n.len()));
        let names = names.join("|");

        let token = if formatting {
            format!(
                r"@(?P<path>{path})(?P<filters>(?:[ \t]*\|[ \t]*(?:{names})\b(?::{ARG})?)*)"
            )
        } else {
            format!(r"@(?P<path>{path})")
        };

        let formatter = format!(
            r#"\|[ \t]*(?P<name>{names})\b(?::(?:"(?P<qarg>[^"]*)"|(?P<arg>[^\s|{{}}<>"]*[^\s|{{}}<>".,;:!?)\]])))?"#
        );

        let condition = format!(
            r"^(?P<neg>!)?\s*@(?P<lhs>{IDENT}(?:\.{IDENT})*)\s*(?:(?P<op>==|!=|>=|<=|>|<)\s*(?P<rhs>.+?))?\s*$"
        );

        Ok(Self {
            token: Regex::new(&token)?,
            formatter: Regex::new(&formatter)?,
            conditional: Regex::new(r"(?s)\{if\s+(?P<cond>[^{}]*?)\s*\}(?P<body>.*?)\{/if\}")?,
            condition: Regex::new(&condition)?,
            block_marker: Regex::new(r"\{if\s|\{/if\}")?,
            trailing_pipe: Regex::new(r"^[ \t]*\|[ \t]*(?P<name>[A-Za-z_][A-Za-z0-9_]*)")?,
        })
    }

    /// Split a raw formatter chain into `(name, arg)` pairs.
    pub(crate) fn formatter_specs<'t>(&self, filters: &'t str) -> Vec<(&'t str, Option<&'t str>)> {
        self.formatter
            .captures_iter(filters)
            .filter_map(|caps| {
                let name = caps.name("name")?.as_str();
                let arg = caps.name("qarg").or_else(|| caps.name("arg")).map(|m| m.as_str());
                Some((name, arg))
            })
            .collect()
    }
}

pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// True when the `@` at `at` is glued to a preceding word (`ann@acme.com`).
pub(crate) fn preceded_by_ident(text: &str, at: usize) -> bool {
    text[..at].chars().next_back().is_some_and(is_ident_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syntax() -> Syntax {
        Syntax::new(true, true).unwrap()
    }

    #[test]
    fn test_token_stops_at_non_identifier() {
        let s = syntax();
        let caps = s.token.captures("Hi @first_name, welcome").unwrap();
        assert_eq!(&caps["path"], "first_name");
        assert_eq!(&caps["filters"], "");
    }

    #[test]
    fn test_token_with_nested_path() {
        let s = syntax();
        let caps = s.token.captures("plan: @user.plan.").unwrap();
        assert_eq!(&caps["path"], "user.plan");
    }

    #[test]
    fn test_token_without_nested_access() {
        let s = Syntax::new(false, true).unwrap();
        let caps = s.token.captures("@user.plan").unwrap();
        assert_eq!(&caps["path"], "user");
    }

    #[test]
    fn test_filters_are_captured() {
        let s = syntax();
        let caps = s.token.captures("@price | currency:EUR.").unwrap();
        assert_eq!(&caps["filters"], " | currency:EUR");

        let caps = s.token.captures("@score|uppercase").unwrap();
        assert_eq!(&caps["filters"], "|uppercase");
    }

    #[test]
    fn test_unknown_formatter_not_consumed() {
        let s = syntax();
        let caps = s.token.captures("| @name | Score |").unwrap();
        assert_eq!(&caps[0], "@name");
    }

    #[test]
    fn test_formatter_prefix_word_not_consumed() {
        let s = syntax();
        let caps = s.token.captures("@name | uppercased").unwrap();
        assert_eq!(&caps[0], "@name");
    }

    #[test]
    fn test_formatting_disabled_has_no_filters_group() {
        let s = Syntax::new(true, false).unwrap();
        let caps = s.token.captures("@score|uppercase").unwrap();
        assert_eq!(&caps[0], "@score");
        assert!(caps.name("filters").is_none());
    }

    #[test]
    fn test_formatter_specs() {
        let s = syntax();
        let specs = s.formatter_specs(r#" | trim |truncate:10 | default:"dear reader" | date:%d/%m"#);
        assert_eq!(
            specs,
            vec![
                ("trim", None),
                ("truncate", Some("10")),
                ("default", Some("dear reader")),
                ("date", Some("%d/%m")),
            ]
        );
    }

    #[test]
    fn test_conditional_block() {
        let s = syntax();
        let caps = s.conditional.captures("{if @score > 80}Great!{/if} rest").unwrap();
        assert_eq!(&caps["cond"], "@score > 80");
        assert_eq!(&caps["body"], "Great!");
    }

    #[test]
    fn test_condition_forms() {
        let s = syntax();
        let caps = s.condition.captures("@score >= 80").unwrap();
        assert_eq!(&caps["lhs"], "score");
        assert_eq!(&caps["op"], ">=");
        assert_eq!(&caps["rhs"], "80");

        let caps = s.condition.captures("!@subscribed").unwrap();
        assert!(caps.name("neg").is_some());
        assert!(caps.name("op").is_none());

        assert!(s.condition.captures("score > 80").is_none());
    }

    #[test]
    fn test_preceded_by_ident() {
        assert!(preceded_by_ident("ann@acme.com", 3));
        assert!(!preceded_by_ident("Hi @name", 3));
        assert!(!preceded_by_ident("@name", 0));
    }
}
