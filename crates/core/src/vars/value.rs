//! Variable values and variable maps.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// A map of variable names to their values.
pub type VariableMap = HashMap<String, VarValue>;

/// A value that can be substituted into a template.
///
/// Answers from form sections and AI logic outputs are normalized into this
/// type at the boundary, so the interpolator never deals with untyped data.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum VarValue {
    /// A null or absent answer.
    #[default]
    Null,
    /// A boolean answer (checkboxes, yes/no questions).
    Bool(bool),
    /// A numeric answer or score.
    Number(f64),
    /// A text answer.
    String(String),
    /// A multi-select answer.
    List(Vec<VarValue>),
    /// A nested object, reachable with `@a.b` when nested access is enabled.
    Map(BTreeMap<String, VarValue>),
}

impl VarValue {
    /// Render this value as the text that replaces a token.
    ///
    /// - String: returned as-is
    /// - Number: integral values without a fractional part (`90`, not `90.0`)
    /// - Bool: `true` or `false`
    /// - Null: empty
    /// - List: rendered items joined with `", "`
    /// - Map: compact JSON
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            VarValue::Null => String::new(),
            VarValue::Bool(b) => b.to_string(),
            VarValue::Number(n) => render_number(*n),
            VarValue::String(s) => s.clone(),
            VarValue::List(items) => {
                items.iter().map(VarValue::render).collect::<Vec<_>>().join(", ")
            }
            VarValue::Map(_) => serde_json::to_string(self).unwrap_or_default(),
        }
    }

    /// Numeric view of this value, if it has one.
    ///
    /// Strings count when they parse as a number after trimming, since form
    /// answers usually arrive as text.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            VarValue::Number(n) => Some(*n),
            VarValue::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
            _ => None,
        }
    }

    /// Check if this value is "truthy" for `{if @var}` blocks.
    ///
    /// - Bool: itself
    /// - Number: non-zero and not NaN
    /// - String, List, Map: non-empty
    /// - Null: false
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            VarValue::Null => false,
            VarValue::Bool(b) => *b,
            VarValue::Number(n) => *n != 0.0 && !n.is_nan(),
            VarValue::String(s) => !s.is_empty(),
            VarValue::List(items) => !items.is_empty(),
            VarValue::Map(m) => !m.is_empty(),
        }
    }

    /// True for `Null` and the empty string.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            VarValue::Null => true,
            VarValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Get a nested value by path.
    ///
    /// Maps are indexed by key and lists by numeric index, so
    /// `get_path(&["answers", "0"])` reaches the first answer.
    #[must_use]
    pub fn get_path(&self, path: &[&str]) -> Option<&VarValue> {
        let Some((first, rest)) = path.split_first() else {
            return Some(self);
        };

        match self {
            VarValue::Map(m) => m.get(*first).and_then(|v| v.get_path(rest)),
            VarValue::List(items) => first
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i))
                .and_then(|v| v.get_path(rest)),
            _ => None,
        }
    }

    /// True for values that can hold children (maps and lists).
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self, VarValue::Map(_) | VarValue::List(_))
    }
}

pub(crate) fn render_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        #[allow(clippy::cast_possible_truncation)]
        let int = n as i64;
        int.to_string()
    } else {
        n.to_string()
    }
}

impl Serialize for VarValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            VarValue::Null => serializer.serialize_unit(),
            VarValue::Bool(b) => serializer.serialize_bool(*b),
            VarValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    #[allow(clippy::cast_possible_truncation)]
                    let int = *n as i64;
                    serializer.serialize_i64(int)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            VarValue::String(s) => serializer.serialize_str(s),
            VarValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            VarValue::Map(m) => {
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl From<&str> for VarValue {
    fn from(s: &str) -> Self {
        VarValue::String(s.to_string())
    }
}

impl From<String> for VarValue {
    fn from(s: String) -> Self {
        VarValue::String(s)
    }
}

impl From<f64> for VarValue {
    fn from(n: f64) -> Self {
        VarValue::Number(n)
    }
}

impl From<i64> for VarValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: i64) -> Self {
        VarValue::Number(n as f64)
    }
}

impl From<bool> for VarValue {
    fn from(b: bool) -> Self {
        VarValue::Bool(b)
    }
}

impl From<Vec<VarValue>> for VarValue {
    fn from(items: Vec<VarValue>) -> Self {
        VarValue::List(items)
    }
}

impl From<BTreeMap<String, VarValue>> for VarValue {
    fn from(m: BTreeMap<String, VarValue>) -> Self {
        VarValue::Map(m)
    }
}

/// Merge variable layers into one map.
///
/// Later layers override earlier ones key by key, so callers pass their
/// context explicitly: e.g. `[defaults, answers, ai_outputs, overrides]`.
pub fn merge_layers<'a, I>(layers: I) -> VariableMap
where
    I: IntoIterator<Item = &'a VariableMap>,
{
    let mut merged = VariableMap::new();
    for layer in layers {
        for (key, value) in layer {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Parse `--var key=value` arguments into a variable map.
///
/// Values stay strings; comparisons and numeric formatters convert on demand.
/// Arguments without `=` are skipped.
pub fn parse_var_args<S: AsRef<str>>(args: &[S]) -> VariableMap {
    let mut map = VariableMap::new();
    for arg in args {
        if let Some((key, value)) = arg.as_ref().split_once('=') {
            let key = key.trim();
            if !key.is_empty() {
                map.insert(key.to_string(), VarValue::String(value.to_string()));
            }
        }
    }
    map
}
