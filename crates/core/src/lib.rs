#![deny(clippy::all)]
#![allow(clippy::module_name_repetitions)]

//! Variable interpolation for lead-magnet output pages.
//!
//! Templates reference variables as `@name`, with optional nested access
//! (`@user.plan`), formatters (`@price | currency:EUR`) and conditional
//! blocks (`{if @score > 80}...{/if}`). See [`interpolate`] for the engine
//! and [`embed`] for the scripts used when pages run inside an iframe.

pub mod config;
pub mod embed;
pub mod interpolate;
pub mod vars;

pub use interpolate::{
    Interpolation, InterpolationError, InterpolationOptions, VariableInterpolator,
    interpolate_variables,
};
pub use vars::{VarValue, VariableMap};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
