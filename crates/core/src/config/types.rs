use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::interpolate::options::default_currency;
use crate::interpolate::{Escaping, InterpolationOptions};

#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    pub version: u32,
    pub profile: Option<String>,
    pub profiles: HashMap<String, Profile>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Profile {
    /// Text substituted for unresolved variables. `{name}` is replaced by
    /// the variable name. Unset keeps the original token.
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default = "default_true")]
    pub enable_conditional_content: bool,
    #[serde(default = "default_true")]
    pub enable_formatting: bool,
    #[serde(default = "default_true")]
    pub enable_nested_access: bool,
    #[serde(default = "default_currency")]
    pub default_currency: String,
    #[serde(default)]
    pub escaping: Escaping,
    /// File extensions `mgv check` treats as templates.
    #[serde(default = "default_template_extensions")]
    pub template_extensions: Vec<String>,
    /// Variable files merged, in order, before any given on the command line.
    #[serde(default)]
    pub vars_files: Vec<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            placeholder: None,
            enable_conditional_content: true,
            enable_formatting: true,
            enable_nested_access: true,
            default_currency: default_currency(),
            escaping: Escaping::default(),
            template_extensions: default_template_extensions(),
            vars_files: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file_level: Option<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), file_level: None, file: None }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

pub(crate) fn default_template_extensions() -> Vec<String> {
    ["html", "htm", "md", "txt", "tmpl"].iter().map(ToString::to_string).collect()
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub active_profile: String,
    /// Where the config was read from; `None` when built-in defaults are used.
    pub source: Option<PathBuf>,
    pub placeholder: Option<String>,
    pub enable_conditional_content: bool,
    pub enable_formatting: bool,
    pub enable_nested_access: bool,
    pub default_currency: String,
    pub escaping: Escaping,
    pub template_extensions: Vec<String>,
    /// Expanded paths.
    pub vars_files: Vec<PathBuf>,
    pub logging: LoggingConfig,
}

impl ResolvedConfig {
    /// Interpolation settings for the active profile.
    #[must_use]
    pub fn interpolation_options(&self) -> InterpolationOptions {
        InterpolationOptions {
            enable_conditional_content: self.enable_conditional_content,
            enable_formatting: self.enable_formatting,
            enable_nested_access: self.enable_nested_access,
            missing_variable_placeholder: self.placeholder.clone(),
            default_currency: self.default_currency.clone(),
            escaping: self.escaping,
        }
    }

    /// True when `path` has one of the configured template extensions.
    #[must_use]
    pub fn is_template_file(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.template_extensions.iter().any(|t| t.eq_ignore_ascii_case(ext))
            })
    }
}
