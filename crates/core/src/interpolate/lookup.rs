//! Variable lookup by token path.

use crate::vars::value::{VarValue, VariableMap};

/// Outcome of resolving a token path against a variable map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Lookup<'a> {
    /// The whole path resolved.
    Found(&'a VarValue),
    /// A scalar was reached before the path ended; `rest` (starting with
    /// `.`) is ordinary text that followed the token.
    Partial { value: &'a VarValue, rest: &'a str },
    Missing,
}

/// Resolve `path` against `vars`.
///
/// An exact key always wins, so flat maps with dotted keys keep working.
/// Otherwise, with nested access enabled, the path is walked segment by
/// segment through maps and lists.
pub(crate) fn lookup<'a>(vars: &'a VariableMap, path: &'a str, nested: bool) -> Lookup<'a> {
    if let Some(value) = vars.get(path) {
        return Lookup::Found(value);
    }
    if !nested || !path.contains('.') {
        return Lookup::Missing;
    }

    let mut segments = path.split('.');
    let Some(first) = segments.next() else {
        return Lookup::Missing;
    };
    let Some(mut current) = vars.get(first) else {
        return Lookup::Missing;
    };
    let mut consumed = first.len();

    for segment in segments {
        if !current.is_container() {
            return Lookup::Partial { value: current, rest: &path[consumed..] };
        }
        match current.get_path(&[segment]) {
            Some(next) => {
                current = next;
                consumed += 1 + segment.len();
            }
            None => return Lookup::Missing,
        }
    }

    Lookup::Found(current)
}

/// Resolve a path that must match completely (used by conditions).
pub(crate) fn resolve<'a>(
    vars: &'a VariableMap,
    path: &'a str,
    nested: bool,
) -> Option<&'a VarValue> {
    match lookup(vars, path, nested) {
        Lookup::Found(value) => Some(value),
        Lookup::Partial { .. } | Lookup::Missing => None,
    }
}

/// Unresolved identifiers, deduplicated, in first-encounter order.
#[derive(Debug, Default)]
pub(crate) struct UnresolvedSet(Vec<String>);

impl UnresolvedSet {
    pub(crate) fn record(&mut self, name: &str) {
        if !self.0.iter().any(|n| n == name) {
            tracing::debug!("unresolved variable: @{name}");
            self.0.push(name.to_string());
        }
    }

    pub(crate) fn into_vec(self) -> Vec<String> {
        self.0
    }
}
