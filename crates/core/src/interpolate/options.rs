//! Interpolation options.

use serde::Deserialize;

/// How substituted values are escaped before they land in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Escaping {
    /// Values are inserted verbatim.
    #[default]
    None,
    /// HTML entity escaping, for values rendered into embed HTML.
    Html,
    /// `application/x-www-form-urlencoded` escaping, for redirect URLs.
    Url,
}

impl Escaping {
    /// Parse an escaping mode name (`none`, `html`, `url`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" | "raw" => Some(Escaping::None),
            "html" => Some(Escaping::Html),
            "url" => Some(Escaping::Url),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Escaping::None => "none",
            Escaping::Html => "html",
            Escaping::Url => "url",
        }
    }
}

/// Feature switches and fallbacks for one interpolator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InterpolationOptions {
    /// Evaluate `{if @x > 1}...{/if}` blocks.
    pub enable_conditional_content: bool,

    /// Apply `| formatter` suffixes.
    pub enable_formatting: bool,

    /// Resolve `@a.b.c` through nested maps.
    pub enable_nested_access: bool,

    /// Text substituted for unresolved tokens.
    ///
    /// `None` leaves the original token in place. A `{name}` inside the
    /// placeholder is replaced by the unresolved identifier.
    pub missing_variable_placeholder: Option<String>,

    /// Currency used by `| currency` without an argument.
    pub default_currency: String,

    /// Escaping applied to substituted values.
    pub escaping: Escaping,
}

impl Default for InterpolationOptions {
    fn default() -> Self {
        Self {
            enable_conditional_content: true,
            enable_formatting: true,
            enable_nested_access: true,
            missing_variable_placeholder: None,
            default_currency: default_currency(),
            escaping: Escaping::None,
        }
    }
}

impl InterpolationOptions {
    /// Set the placeholder for unresolved tokens.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.missing_variable_placeholder = Some(placeholder.into());
        self
    }

    /// Set the escaping mode for substituted values.
    #[must_use]
    pub fn with_escaping(mut self, escaping: Escaping) -> Self {
        self.escaping = escaping;
        self
    }

    /// Text to emit for an unresolved token, or `None` to keep the token.
    pub(crate) fn placeholder_for(&self, name: &str) -> Option<String> {
        self.missing_variable_placeholder.as_ref().map(|p| p.replace("{name}", name))
    }
}

pub(crate) fn default_currency() -> String {
    "USD".to_string()
}
