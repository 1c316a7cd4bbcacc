//! `@variable` completion for editors.

use serde::Serialize;

use super::value::{VarValue, VariableMap};
use crate::interpolate::syntax::is_ident_char;

/// Candidates for the `@partial` at the end of the text before the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionSet {
    /// What was typed after the `@`.
    pub partial: String,
    /// Byte offset of the `@`; a completion replaces `text[replace_from..]`.
    pub replace_from: usize,
    pub names: Vec<String>,
}

/// Suggest variable names for a trailing `@partial`.
///
/// Returns `None` when the text does not end in a token being typed.
/// Names starting with the partial come first, then names that only contain
/// it; both groups are sorted and matching ignores case.
pub fn suggest<S: AsRef<str>>(text_before_cursor: &str, available: &[S]) -> Option<SuggestionSet> {
    let tail_len: usize = text_before_cursor
        .chars()
        .rev()
        .take_while(|&c| is_ident_char(c) || c == '.')
        .map(char::len_utf8)
        .sum();
    let at = text_before_cursor.len() - tail_len;

    let before = text_before_cursor[..at].strip_suffix('@')?;
    if before.chars().next_back().is_some_and(is_ident_char) {
        return None;
    }

    let partial = &text_before_cursor[at..];
    let needle = partial.to_lowercase();

    let mut prefixed = Vec::new();
    let mut containing = Vec::new();
    for name in available {
        let name = name.as_ref();
        let lower = name.to_lowercase();
        if lower.starts_with(&needle) {
            prefixed.push(name.to_string());
        } else if lower.contains(&needle) {
            containing.push(name.to_string());
        }
    }
    prefixed.sort();
    prefixed.dedup();
    containing.sort();
    containing.dedup();
    prefixed.extend(containing);

    Some(SuggestionSet {
        partial: partial.to_string(),
        replace_from: before.len(),
        names: prefixed,
    })
}

/// Every addressable path in `vars`: top-level keys plus dotted paths into
/// nested maps. Sorted.
#[must_use]
pub fn available_paths(vars: &VariableMap) -> Vec<String> {
    let mut paths = Vec::new();
    for (key, value) in vars {
        collect_paths(key.clone(), value, &mut paths);
    }
    paths.sort();
    paths
}

fn collect_paths(prefix: String, value: &VarValue, out: &mut Vec<String>) {
    if let VarValue::Map(map) = value {
        for (key, child) in map {
            collect_paths(format!("{prefix}.{key}"), child, out);
        }
    }
    out.push(prefix);
}
