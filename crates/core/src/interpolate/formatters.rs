//! Named formatters applied through `@name | formatter:arg` suffixes.

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::vars::value::{VarValue, render_number};

/// Every formatter name the token syntax recognizes.
pub const FORMATTER_NAMES: &[&str] = &[
    "uppercase",
    "upper",
    "lowercase",
    "lower",
    "capitalize",
    "title",
    "trim",
    "slugify",
    "truncate",
    "currency",
    "number",
    "percent",
    "date",
    "default",
    "join",
    "json",
    "urlencode",
    "escape",
    "html",
];

const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y";

/// Largest decimals argument accepted by `number` and `percent`.
pub const MAX_DECIMALS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatterError {
    #[error("unknown formatter: {0}")]
    Unknown(String),

    #[error("formatter '{0}' requires an argument")]
    MissingArgument(String),

    #[error("invalid argument '{arg}' for formatter '{name}'")]
    InvalidArgument { name: String, arg: String },
}

/// A parsed formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatter {
    Uppercase,
    Lowercase,
    Capitalize,
    Title,
    Trim,
    Slugify,
    /// Keep at most N characters, appending `...` when cut.
    Truncate(usize),
    /// Currency code, or the configured default when `None`.
    Currency(Option<String>),
    /// Fixed decimals, or as many as the value needs when `None`.
    Number(Option<usize>),
    Percent(usize),
    /// strftime format, or `%B %-d, %Y` when `None`.
    Date(Option<String>),
    /// Fallback for missing, null or empty values.
    Default(String),
    Join(String),
    Json,
    UrlEncode,
    Escape,
}

impl Formatter {
    /// Parse a formatter from its name and optional argument.
    pub fn parse(name: &str, arg: Option<&str>) -> Result<Self, FormatterError> {
        let invalid = |arg: &str| FormatterError::InvalidArgument {
            name: name.to_string(),
            arg: arg.to_string(),
        };
        let parse_usize = |arg: &str| arg.trim().parse::<usize>().map_err(|_| invalid(arg));
        let parse_decimals = |arg: &str| -> Result<usize, FormatterError> {
            match parse_usize(arg)? {
                d if d <= MAX_DECIMALS => Ok(d),
                _ => Err(invalid(arg)),
            }
        };

        let formatter = match name {
            "uppercase" | "upper" => Formatter::Uppercase,
            "lowercase" | "lower" => Formatter::Lowercase,
            "capitalize" => Formatter::Capitalize,
            "title" => Formatter::Title,
            "trim" => Formatter::Trim,
            "slugify" => Formatter::Slugify,
            "truncate" => match arg {
                Some(a) => Formatter::Truncate(parse_usize(a)?),
                None => return Err(FormatterError::MissingArgument(name.to_string())),
            },
            "currency" => match arg {
                Some(a) if a.len() == 3 && a.chars().all(|c| c.is_ascii_alphabetic()) => {
                    Formatter::Currency(Some(a.to_ascii_uppercase()))
                }
                Some(a) => return Err(invalid(a)),
                None => Formatter::Currency(None),
            },
            "number" => Formatter::Number(arg.map(parse_decimals).transpose()?),
            "percent" => Formatter::Percent(arg.map(parse_decimals).transpose()?.unwrap_or(0)),
            "date" => Formatter::Date(arg.map(ToString::to_string)),
            "default" => match arg {
                Some(a) => Formatter::Default(a.to_string()),
                None => return Err(FormatterError::MissingArgument(name.to_string())),
            },
            "join" => Formatter::Join(arg.unwrap_or(", ").to_string()),
            "json" => Formatter::Json,
            "urlencode" => Formatter::UrlEncode,
            "escape" | "html" => Formatter::Escape,
            other => return Err(FormatterError::Unknown(other.to_string())),
        };
        Ok(formatter)
    }

    /// Apply this formatter to a value.
    ///
    /// Values the formatter cannot handle (text into `currency`, an
    /// unparseable date) come back unchanged.
    #[must_use]
    pub fn apply(&self, value: VarValue, default_currency: &str) -> VarValue {
        match self {
            Formatter::Uppercase => map_text(value, |s| s.to_uppercase()),
            Formatter::Lowercase => map_text(value, |s| s.to_lowercase()),
            Formatter::Capitalize => map_text(value, capitalize),
            Formatter::Title => map_text(value, title_case),
            Formatter::Trim => map_text(value, |s| s.trim().to_string()),
            Formatter::Slugify => map_text(value, slugify),
            Formatter::Truncate(n) => map_text(value, |s| truncate(s, *n)),
            Formatter::Currency(code) => match value.as_number() {
                Some(n) => VarValue::String(format_currency(
                    n,
                    code.as_deref().unwrap_or(default_currency),
                )),
                None => value,
            },
            Formatter::Number(decimals) => match value.as_number() {
                Some(n) => VarValue::String(format_grouped(n, *decimals)),
                None => value,
            },
            Formatter::Percent(decimals) => match value.as_number() {
                Some(n) => VarValue::String(format!("{}%", fixed(n, *decimals))),
                None => value,
            },
            Formatter::Date(fmt) => {
                let fmt = fmt.as_deref().unwrap_or(DEFAULT_DATE_FORMAT);
                match reformat_date(&value.render(), fmt) {
                    Some(s) => VarValue::String(s),
                    None => value,
                }
            }
            Formatter::Default(fallback) => {
                if value.is_blank() {
                    VarValue::String(fallback.clone())
                } else {
                    value
                }
            }
            Formatter::Join(sep) => match value {
                VarValue::List(items) => VarValue::String(
                    items.iter().map(VarValue::render).collect::<Vec<_>>().join(sep),
                ),
                other => other,
            },
            Formatter::Json => {
                VarValue::String(serde_json::to_string(&value).unwrap_or_default())
            }
            Formatter::UrlEncode => map_text(value, url_encode),
            Formatter::Escape => map_text(value, html_escape),
        }
    }
}

/// Run a formatter chain over a value.
#[must_use]
pub fn apply_chain(
    value: VarValue,
    formatters: &[Formatter],
    default_currency: &str,
) -> VarValue {
    formatters.iter().fold(value, |acc, f| f.apply(acc, default_currency))
}

fn map_text(value: VarValue, f: impl FnOnce(&str) -> String) -> VarValue {
    match value {
        VarValue::Null => VarValue::Null,
        other => VarValue::String(f(&other.render())),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            result.push(c);
        } else if at_word_start {
            result.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            result.push(c);
        }
    }
    result
}

/// Convert a string to a URL-friendly slug.
///
/// - Converts to lowercase
/// - Replaces spaces and underscores with hyphens
/// - Removes non-alphanumeric characters (except hyphens)
/// - Collapses multiple hyphens into one
/// - Trims leading/trailing hyphens
fn slugify(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
        } else if (c == ' ' || c == '_' || c == '-') && !result.ends_with('-') {
            result.push('-');
        }
    }

    result.trim_matches('-').to_string()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max).collect();
    cut.push_str("...");
    cut
}

fn fixed(n: f64, decimals: usize) -> String {
    let text = format!("{n:.decimals$}");
    strip_negative_zero(text)
}

fn strip_negative_zero(text: String) -> String {
    match text.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => text,
    }
}

/// Format a number with thousands separators.
fn format_grouped(n: f64, decimals: Option<usize>) -> String {
    let text = match decimals {
        Some(d) => fixed(n.abs(), d),
        None => render_number(n.abs()),
    };
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::new();
    if n < 0.0 && !text.chars().all(|c| c == '0' || c == '.') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn format_currency(n: f64, code: &str) -> String {
    let code = code.to_ascii_uppercase();
    let (symbol, decimals) = match code.as_str() {
        "USD" => (Some("$"), 2),
        "EUR" => (Some("€"), 2),
        "GBP" => (Some("£"), 2),
        "INR" => (Some("₹"), 2),
        "CAD" => (Some("CA$"), 2),
        "AUD" => (Some("A$"), 2),
        "JPY" => (Some("¥"), 0),
        "KRW" => (Some("₩"), 0),
        _ => (None, 2),
    };

    let grouped = format_grouped(n, Some(decimals));
    let (sign, amount) = match grouped.strip_prefix('-') {
        Some(rest) => ("-", rest.to_string()),
        None => ("", grouped),
    };

    match symbol {
        Some(s) => format!("{sign}{s}{amount}"),
        None => format!("{sign}{amount} {code}"),
    }
}

fn reformat_date(text: &str, fmt: &str) -> Option<String> {
    let text = text.trim();
    let parsed: DateTime<FixedOffset> = if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        dt
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        dt.and_utc().fixed_offset()
    } else if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        d.and_hms_opt(0, 0, 0)?.and_utc().fixed_offset()
    } else {
        return None;
    };

    // An invalid strftime item surfaces as a fmt::Error here.
    let mut out = String::new();
    write!(out, "{}", parsed.format(fmt)).ok()?;
    Some(out)
}

/// Encode a value for use inside a URL query string.
#[must_use]
pub fn url_encode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

/// Escape the five HTML-significant characters.
#[must_use]
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn fmt(name: &str, arg: Option<&str>, value: VarValue) -> String {
        Formatter::parse(name, arg).unwrap().apply(value, "USD").render()
    }

    #[rstest]
    #[case("uppercase", None, "pass", "PASS")]
    #[case("upper", None, "pass", "PASS")]
    #[case("lowercase", None, "LOUD", "loud")]
    #[case("capitalize", None, "ann lee", "Ann lee")]
    #[case("title", None, "ann  marie lee", "Ann  Marie Lee")]
    #[case("trim", None, "  spaced  ", "spaced")]
    #[case("slugify", None, "My Big Idea!", "my-big-idea")]
    #[case("truncate", Some("5"), "Hello World", "Hello...")]
    #[case("truncate", Some("20"), "Hello World", "Hello World")]
    #[case("escape", None, "<b>\"Tom\" & 'Jerry'</b>", "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;")]
    #[case("urlencode", None, "a b&c=d", "a+b%26c%3Dd")]
    fn test_text_formatters(
        #[case] name: &str,
        #[case] arg: Option<&str>,
        #[case] input: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(fmt(name, arg, VarValue::from(input)), expected);
    }

    #[rstest]
    #[case(None, 1234.5, "$1,234.50")]
    #[case(Some("EUR"), 99.0, "€99.00")]
    #[case(Some("gbp"), 0.5, "£0.50")]
    #[case(Some("JPY"), 1500.4, "¥1,500")]
    #[case(Some("CHF"), 1234567.891, "1,234,567.89 CHF")]
    #[case(None, -42.0, "-$42.00")]
    #[case(None, -0.001, "$0.00")]
    fn test_currency(#[case] code: Option<&str>, #[case] value: f64, #[case] expected: &str) {
        assert_eq!(fmt("currency", code, VarValue::Number(value)), expected);
    }

    #[test]
    fn test_currency_accepts_numeric_strings() {
        assert_eq!(fmt("currency", None, VarValue::from("19.9")), "$19.90");
    }

    #[test]
    fn test_currency_leaves_text_unchanged() {
        assert_eq!(fmt("currency", None, VarValue::from("free")), "free");
    }

    #[test]
    fn test_currency_uses_configured_default() {
        let out = Formatter::parse("currency", None)
            .unwrap()
            .apply(VarValue::Number(10.0), "GBP")
            .render();
        assert_eq!(out, "£10.00");
    }

    #[rstest]
    #[case(None, 1234567.0, "1,234,567")]
    #[case(None, 1234.25, "1,234.25")]
    #[case(Some("2"), 1234.0, "1,234.00")]
    #[case(Some("0"), 999.6, "1,000")]
    #[case(None, -12345.0, "-12,345")]
    #[case(None, 12.0, "12")]
    fn test_number(#[case] decimals: Option<&str>, #[case] value: f64, #[case] expected: &str) {
        assert_eq!(fmt("number", decimals, VarValue::Number(value)), expected);
    }

    #[rstest]
    #[case(None, 85.0, "85%")]
    #[case(Some("1"), 85.26, "85.3%")]
    #[case(None, 0.4, "0%")]
    fn test_percent(#[case] decimals: Option<&str>, #[case] value: f64, #[case] expected: &str) {
        assert_eq!(fmt("percent", decimals, VarValue::Number(value)), expected);
    }

    #[rstest]
    #[case(None, "2025-03-05", "March 5, 2025")]
    #[case(Some("%d/%m/%Y"), "2025-03-05T14:30:00", "05/03/2025")]
    #[case(Some("%H:%M"), "2025-03-05T14:30:00+02:00", "14:30")]
    #[case(None, "next tuesday", "next tuesday")]
    #[case(Some("%Q"), "2025-03-05", "2025-03-05")]
    fn test_date(#[case] format: Option<&str>, #[case] input: &str, #[case] expected: &str) {
        assert_eq!(fmt("date", format, VarValue::from(input)), expected);
    }

    #[test]
    fn test_default_replaces_blank_values() {
        assert_eq!(fmt("default", Some("friend"), VarValue::from("")), "friend");
        assert_eq!(fmt("default", Some("friend"), VarValue::Null), "friend");
        assert_eq!(fmt("default", Some("friend"), VarValue::from("Ann")), "Ann");
    }

    #[test]
    fn test_join_lists() {
        let list = VarValue::List(vec!["seo".into(), "ads".into()]);
        assert_eq!(fmt("join", Some(" / "), list.clone()), "seo / ads");
        assert_eq!(fmt("join", None, list), "seo, ads");
        assert_eq!(fmt("join", Some("-"), VarValue::from("solo")), "solo");
    }

    #[test]
    fn test_json() {
        assert_eq!(fmt("json", None, VarValue::from("say \"hi\"")), r#""say \"hi\"""#);
        assert_eq!(fmt("json", None, VarValue::Number(3.0)), "3");
    }

    #[test]
    fn test_text_formatters_keep_null() {
        let out = Formatter::parse("uppercase", None).unwrap().apply(VarValue::Null, "USD");
        assert_eq!(out, VarValue::Null);
    }

    #[test]
    fn test_chain_applies_in_order() {
        let chain = vec![
            Formatter::parse("trim", None).unwrap(),
            Formatter::parse("uppercase", None).unwrap(),
            Formatter::parse("truncate", Some("3")).unwrap(),
        ];
        let out = apply_chain(VarValue::from("  hello "), &chain, "USD");
        assert_eq!(out.render(), "HEL...");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Formatter::parse("shout", None),
            Err(FormatterError::Unknown("shout".to_string()))
        );
        assert_eq!(
            Formatter::parse("truncate", None),
            Err(FormatterError::MissingArgument("truncate".to_string()))
        );
        assert!(matches!(
            Formatter::parse("truncate", Some("abc")),
            Err(FormatterError::InvalidArgument { .. })
        ));
        assert!(matches!(
            Formatter::parse("currency", Some("dollars")),
            Err(FormatterError::InvalidArgument { .. })
        ));
        assert_eq!(
            Formatter::parse("default", None),
            Err(FormatterError::MissingArgument("default".to_string()))
        );
    }

    #[rstest]
    #[case("number", "70000")]
    #[case("number", "21")]
    #[case("percent", "70000")]
    #[case("percent", "-1")]
    fn test_decimals_out_of_range(#[case] name: &str, #[case] arg: &str) {
        assert!(matches!(
            Formatter::parse(name, Some(arg)),
            Err(FormatterError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_max_decimals_formats() {
        let out = fmt("number", Some("20"), VarValue::Number(1.5));
        assert_eq!(out, "1.50000000000000000000");
        assert!(fmt("percent", Some("20"), VarValue::Number(1.5)).ends_with('%'));
    }

    #[test]
    fn test_every_listed_name_parses() {
        for name in FORMATTER_NAMES {
            let arg = match *name {
                "truncate" => Some("3"),
                "default" => Some("x"),
                _ => None,
            };
            assert!(Formatter::parse(name, arg).is_ok(), "{name} should parse");
        }
    }
}
