//! Loading variable maps from answer files.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::value::{VarValue, VariableMap};

#[derive(Debug, Error)]
pub enum VariablesError {
    #[error("failed to read variables file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("variables file {0} must contain a mapping at the top level")]
    NotAMap(PathBuf),

    #[error("unsupported variables file extension for {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),
}

/// Load a variable map from a `.json`, `.yaml` or `.yml` file.
pub fn load_variables(path: &Path) -> Result<VariableMap, VariablesError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let content = fs::read_to_string(path)
        .map_err(|e| VariablesError::Io { path: path.to_path_buf(), source: e })?;

    let value: VarValue = match ext.as_str() {
        "json" => serde_json::from_str(&content)
            .map_err(|e| VariablesError::Json { path: path.to_path_buf(), source: e })?,
        "yaml" | "yml" => {
            if content.trim().is_empty() {
                return Ok(VariableMap::new());
            }
            serde_yaml::from_str(&content)
                .map_err(|e| VariablesError::Yaml { path: path.to_path_buf(), source: e })?
        }
        _ => return Err(VariablesError::UnsupportedFormat(path.to_path_buf())),
    };

    match value {
        VarValue::Map(m) => {
            tracing::debug!("loaded {} variables from {}", m.len(), path.display());
            Ok(m.into_iter().collect())
        }
        _ => Err(VariablesError::NotAMap(path.to_path_buf())),
    }
}

/// Load several variable files and merge them in order (later files win).
pub fn load_variable_layers<P: AsRef<Path>>(
    paths: &[P],
) -> Result<VariableMap, VariablesError> {
    let mut merged = VariableMap::new();
    for path in paths {
        merged.extend(load_variables(path.as_ref())?);
    }
    Ok(merged)
}
