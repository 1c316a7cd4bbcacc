//! Variable values and the maps templates are rendered against.
//!
//! Values come from several layers (answer files, AI results, `--var`
//! overrides) that are merged in order, later layers winning.

pub mod loader;
pub mod suggest;
pub mod tokens;
pub mod value;

pub use loader::{VariablesError, load_variable_layers, load_variables};
pub use suggest::{SuggestionSet, available_paths, suggest};
pub use tokens::{FormatterSpec, TokenRef};
pub use value::{VarValue, VariableMap, merge_layers, parse_var_args};
