//! `{if ...}` conditions: parsing and evaluation.

use std::cmp::Ordering;

use regex::Regex;

use super::lookup::{UnresolvedSet, resolve};
use crate::vars::value::{VarValue, VariableMap};

/// Comparison operators allowed in `{if @var OP value}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl CompareOp {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Ne),
            ">" => Some(CompareOp::Gt),
            "<" => Some(CompareOp::Lt),
            ">=" => Some(CompareOp::Ge),
            "<=" => Some(CompareOp::Le),
            _ => None,
        }
    }

    fn holds(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Ge => ordering != Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
        }
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Operand {
    /// `@other`
    Variable(String),
    /// `"text"` or `'text'`, always compared as a string.
    Quoted(String),
    /// Anything else: a number, `true`/`false`, or a bare word.
    Bare(String),
}

impl Operand {
    fn parse(s: &str) -> Self {
        let s = s.trim();
        if let Some(path) = s.strip_prefix('@') {
            let is_path = !path.is_empty()
                && path.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
            if is_path {
                return Operand::Variable(path.to_string());
            }
        }
        for quote in ['"', '\''] {
            if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
                return Operand::Quoted(s[1..s.len() - 1].to_string());
            }
        }
        Operand::Bare(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Condition {
    /// `{if @var}` or `{if !@var}`
    Truthy { path: String, negate: bool },
    /// `{if @var OP rhs}`
    Compare { path: String, op: CompareOp, rhs: Operand },
}

impl Condition {
    /// Parse the text between `{if` and `}`. `None` means the block is
    /// malformed and must be left as literal text.
    pub(crate) fn parse(text: &str, re: &Regex) -> Option<Self> {
        let caps = re.captures(text.trim())?;
        let path = caps.name("lhs")?.as_str().to_string();
        let negate = caps.name("neg").is_some();

        match (caps.name("op"), caps.name("rhs")) {
            (None, None) => Some(Condition::Truthy { path, negate }),
            (Some(op), Some(rhs)) if !negate => Some(Condition::Compare {
                path,
                op: CompareOp::parse(op.as_str())?,
                rhs: Operand::parse(rhs.as_str()),
            }),
            _ => None,
        }
    }

    /// Evaluate against `vars`. Missing variables make the condition false
    /// and are recorded as unresolved.
    pub(crate) fn evaluate(
        &self,
        vars: &VariableMap,
        nested: bool,
        unresolved: &mut UnresolvedSet,
    ) -> bool {
        match self {
            Condition::Truthy { path, negate } => match resolve(vars, path, nested) {
                Some(value) => value.is_truthy() != *negate,
                None => {
                    unresolved.record(path);
                    false
                }
            },
            Condition::Compare { path, op, rhs } => {
                let Some(lhs) = resolve(vars, path, nested) else {
                    unresolved.record(path);
                    return false;
                };
                match rhs {
                    Operand::Variable(other) => match resolve(vars, other, nested) {
                        Some(rhs) => compare_values(lhs, rhs, *op),
                        None => {
                            unresolved.record(other);
                            false
                        }
                    },
                    Operand::Quoted(text) => op.holds(lhs.render().as_str().cmp(text.as_str())),
                    Operand::Bare(text) => compare_bare(lhs, text, *op),
                }
            }
        }
    }
}

fn compare_values(lhs: &VarValue, rhs: &VarValue, op: CompareOp) -> bool {
    if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
        return compare_numbers(a, b, op);
    }
    if let (VarValue::Bool(a), VarValue::Bool(b)) = (lhs, rhs) {
        return op.holds(a.cmp(b));
    }
    op.holds(lhs.render().cmp(&rhs.render()))
}

fn compare_bare(lhs: &VarValue, text: &str, op: CompareOp) -> bool {
    if let (Some(a), Ok(b)) = (lhs.as_number(), text.parse::<f64>()) {
        return compare_numbers(a, b, op);
    }
    if let VarValue::Bool(a) = lhs {
        match text {
            "true" => return op.holds(a.cmp(&true)),
            "false" => return op.holds(a.cmp(&false)),
            _ => {}
        }
    }
    op.holds(lhs.render().as_str().cmp(text))
}

fn compare_numbers(a: f64, b: f64, op: CompareOp) -> bool {
    a.partial_cmp(&b).is_some_and(|ord| op.holds(ord))
}
