use std::ops::Range;

use serde::Serialize;
use thiserror::Error;

use super::conditional::Condition;
use super::formatters::{Formatter, apply_chain, html_escape, url_encode};
use super::lookup::{Lookup, UnresolvedSet, lookup, resolve};
use super::options::{Escaping, InterpolationOptions};
use super::syntax::{Syntax, preceded_by_ident};
use crate::vars::value::{VarValue, VariableMap};

const ELSE: &str = "{else}";

#[derive(Debug, Error)]
pub enum InterpolationError {
    #[error("invalid regex for template syntax: {0}")]
    Regex(String),
}

/// Result of one interpolation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interpolation {
    /// The substituted text.
    pub content: String,
    /// Identifiers that had no value, in first-encounter order.
    pub unresolved_variables: Vec<String>,
}

impl Interpolation {
    /// True when every token resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved_variables.is_empty()
    }
}

/// Substitutes `@variables` in templates.
///
/// Compiles the token grammar once for its options; `interpolate` is then a
/// pure function of its inputs and never fails. Missing data degrades to
/// placeholders so a live page always renders.
#[derive(Debug, Clone)]
pub struct VariableInterpolator {
    options: InterpolationOptions,
    syntax: Syntax,
}

impl VariableInterpolator {
    pub fn new(options: InterpolationOptions) -> Result<Self, InterpolationError> {
        let syntax = Syntax::new(options.enable_nested_access, options.enable_formatting)
            .map_err(|e| InterpolationError::Regex(e.to_string()))?;
        Ok(Self { options, syntax })
    }

    #[must_use]
    pub fn options(&self) -> &InterpolationOptions {
        &self.options
    }

    pub(crate) fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// The value a token path resolves to, if it resolves completely.
    #[must_use]
    pub fn value_of<'a>(&self, path: &'a str, vars: &'a VariableMap) -> Option<&'a VarValue> {
        resolve(vars, path, self.options.enable_nested_access)
    }

    /// Interpolate `template` with `vars`.
    ///
    /// A conditional block is replaced by its chosen branch, so tokens in
    /// dropped branches are neither substituted nor reported. Tokens are
    /// matched against the original template in one left-to-right pass;
    /// substituted values are never rescanned.
    #[must_use]
    pub fn interpolate(&self, template: &str, vars: &VariableMap) -> Interpolation {
        let mut unresolved = UnresolvedSet::default();
        let mut content = String::with_capacity(template.len());

        if self.options.enable_conditional_content {
            self.render_blocks(&mut content, template, vars, &mut unresolved);
        } else {
            self.substitute_tokens(&mut content, template, 0..template.len(), vars, &mut unresolved);
        }
        let unresolved_variables = unresolved.into_vec();

        tracing::trace!(
            "interpolated {} bytes into {} bytes, {} unresolved",
            template.len(),
            content.len(),
            unresolved_variables.len()
        );

        Interpolation { content, unresolved_variables }
    }

    fn render_blocks(
        &self,
        out: &mut String,
        template: &str,
        vars: &VariableMap,
        unresolved: &mut UnresolvedSet,
    ) {
        let nested = self.options.enable_nested_access;
        let mut pos = 0;

        while let Some(caps) = self.syntax.conditional.captures_at(template, pos) {
            let (Some(block), Some(cond), Some(body)) =
                (caps.get(0), caps.name("cond"), caps.name("body"))
            else {
                break;
            };

            // An opener swallowed a later `{if`: keep the opener as text and
            // retry from the inner block.
            if let Some(inner) = body.as_str().find("{if") {
                let resume = body.start() + inner;
                tracing::debug!(
                    "unclosed conditional left as text: {}",
                    &template[block.start()..resume]
                );
                self.substitute_tokens(out, template, pos..resume, vars, unresolved);
                pos = resume;
                continue;
            }

            self.substitute_tokens(out, template, pos..block.start(), vars, unresolved);
            pos = block.end();

            let Some(condition) = Condition::parse(cond.as_str(), &self.syntax.condition) else {
                tracing::debug!("unparseable condition left as text: {{if {}}}", cond.as_str());
                self.substitute_tokens(out, template, block.range(), vars, unresolved);
                continue;
            };

            let (then_branch, else_branch) = match body.as_str().find(ELSE) {
                Some(i) => {
                    let split = body.start() + i;
                    (body.start()..split, split + ELSE.len()..body.end())
                }
                None => (body.range(), body.end()..body.end()),
            };
            let branch = if condition.evaluate(vars, nested, unresolved) {
                then_branch
            } else {
                else_branch
            };
            self.substitute_tokens(out, template, branch, vars, unresolved);
        }

        self.substitute_tokens(out, template, pos..template.len(), vars, unresolved);
    }

    /// Substitute the tokens in `template[range]` into `out`.
    ///
    /// Gluing to a preceding word is judged on `template`, so a collapsed
    /// block never turns a token into part of an email address.
    fn substitute_tokens(
        &self,
        out: &mut String,
        template: &str,
        range: Range<usize>,
        vars: &VariableMap,
        unresolved: &mut UnresolvedSet,
    ) {
        let offset = range.start;
        let text = &template[range];
        let mut last = 0;

        for caps in self.syntax.token.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if preceded_by_ident(template, offset + whole.start()) {
                continue;
            }

            let path = caps.name("path").map_or("", |m| m.as_str());
            let formatters = caps
                .name("filters")
                .map(|m| self.parse_formatters(m.as_str()))
                .unwrap_or_default();

            out.push_str(&text[last..whole.start()]);
            out.push_str(&self.resolve_token(path, whole.as_str(), &formatters, vars, unresolved));
            last = whole.end();
        }
        out.push_str(&text[last..]);
    }

    fn resolve_token(
        &self,
        path: &str,
        raw: &str,
        formatters: &[Formatter],
        vars: &VariableMap,
        unresolved: &mut UnresolvedSet,
    ) -> String {
        let currency = self.options.default_currency.as_str();

        match lookup(vars, path, self.options.enable_nested_access) {
            Lookup::Found(value) => self.emit(apply_chain(value.clone(), formatters, currency)),
            Lookup::Partial { value, rest } => {
                let mut out = self.emit(apply_chain(value.clone(), formatters, currency));
                out.push_str(rest);
                out
            }
            Lookup::Missing => {
                // A `default` formatter resolves the token; later formatters
                // still run on the fallback text.
                if let Some(pos) =
                    formatters.iter().position(|f| matches!(f, Formatter::Default(_)))
                {
                    return self.emit(apply_chain(VarValue::Null, &formatters[pos..], currency));
                }
                unresolved.record(path);
                self.options.placeholder_for(path).unwrap_or_else(|| raw.to_string())
            }
        }
    }

    fn parse_formatters(&self, filters: &str) -> Vec<Formatter> {
        self.syntax
            .formatter_specs(filters)
            .into_iter()
            .filter_map(|(name, arg)| match Formatter::parse(name, arg) {
                Ok(formatter) => Some(formatter),
                Err(e) => {
                    tracing::debug!("skipping formatter: {e}");
                    None
                }
            })
            .collect()
    }

    fn emit(&self, value: VarValue) -> String {
        let text = value.render();
        match self.options.escaping {
            Escaping::None => text,
            Escaping::Html => html_escape(&text),
            Escaping::Url => url_encode(&text),
        }
    }
}

/// One-shot interpolation.
///
/// The only possible error is a failure to compile the token grammar; data
/// problems never fail, they show up in `unresolved_variables`.
pub fn interpolate_variables(
    template: &str,
    vars: &VariableMap,
    options: &InterpolationOptions,
) -> Result<Interpolation, InterpolationError> {
    let interpolator = VariableInterpolator::new(options.clone())?;
    Ok(interpolator.interpolate(template, vars))
}
