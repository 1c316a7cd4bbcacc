//! Interactive prompts for variables a render left unresolved.

use dialoguer::{Input, theme::ColorfulTheme};
use magnetvars_core::vars::{VarValue, VariableMap};
use std::io::{self, IsTerminal};

/// Error type for variable collection.
#[derive(Debug)]
pub enum PromptError {
    /// IO error during prompting.
    Io(io::Error),
    /// User cancelled input.
    Cancelled,
}

impl std::fmt::Display for PromptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromptError::Io(e) => write!(f, "IO error: {e}"),
            PromptError::Cancelled => write!(f, "input cancelled by user"),
        }
    }
}

impl std::error::Error for PromptError {}

impl From<io::Error> for PromptError {
    fn from(e: io::Error) -> Self {
        PromptError::Io(e)
    }
}

/// Ask for a value for each of `names`.
///
/// Empty answers are skipped so the variable stays unresolved. Without a
/// terminal on stdin nothing is asked and the map is empty.
pub fn ask_for(names: &[String]) -> Result<VariableMap, PromptError> {
    let mut values = VariableMap::new();
    if !io::stdin().is_terminal() {
        tracing::warn!("stdin is not a terminal; not prompting for {} variables", names.len());
        return Ok(values);
    }

    let theme = ColorfulTheme::default();
    for name in names {
        let answer = Input::<String>::with_theme(&theme)
            .with_prompt(format!("@{name}"))
            .allow_empty(true)
            .interact_text()
            .map_err(dialoguer_error_to_prompt_error)?;
        if !answer.is_empty() {
            values.insert(name.clone(), VarValue::String(answer));
        }
    }
    Ok(values)
}

/// Convert dialoguer error to our PromptError.
fn dialoguer_error_to_prompt_error(e: dialoguer::Error) -> PromptError {
    match e {
        dialoguer::Error::IO(io_err) => {
            if io_err.kind() == io::ErrorKind::UnexpectedEof {
                PromptError::Cancelled
            } else {
                PromptError::Io(io_err)
            }
        }
    }
}
