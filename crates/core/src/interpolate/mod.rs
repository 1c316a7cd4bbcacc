//! `@variable` interpolation for generated output HTML and text.
//!
//! Supports:
//! - Simple variables: `@first_name`
//! - Nested access: `@user.plan`, `@answers.0`
//! - Formatters: `@score | uppercase`, `@price|currency:EUR`, chained left to right
//! - Conditional content: `{if @score > 80}...{else}...{/if}`
//!
//! Missing variables never fail a render; they are substituted with a
//! placeholder and reported in [`Interpolation::unresolved_variables`].

pub mod conditional;
pub mod engine;
pub mod formatters;
mod lookup;
pub mod options;
pub(crate) mod syntax;
pub mod validate;

pub use conditional::CompareOp;
pub use engine::{
    Interpolation, InterpolationError, VariableInterpolator, interpolate_variables,
};
pub use formatters::{FORMATTER_NAMES, Formatter, FormatterError};
pub use options::{Escaping, InterpolationOptions};
pub use validate::{IssueKind, Severity, TemplateIssue};
