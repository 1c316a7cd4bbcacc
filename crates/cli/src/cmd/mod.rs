pub mod check;
pub mod doctor;
pub mod embed;
pub mod output;
pub mod render;
pub mod snippet;
pub mod suggest;
pub mod vars;

use std::fmt::Display;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use magnetvars_core::config::loader::{ConfigLoader, default_config_path};
use magnetvars_core::config::types::ResolvedConfig;
use magnetvars_core::vars::{VariableMap, load_variable_layers, merge_layers, parse_var_args};

use crate::VarSources;

/// Load the config for `command` and start logging, or exit with a
/// `FAIL` report.
pub fn load_config(config: Option<&Path>, profile: Option<&str>, command: &str) -> ResolvedConfig {
    match ConfigLoader::load(config, profile) {
        Ok(rc) => {
            crate::logging::init(&rc);
            rc
        }
        Err(e) => {
            println!("FAIL mgv {command}");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    }
}

/// Print a `FAIL` report for `command` and exit 1.
pub fn fail(command: &str, err: impl Display) -> ! {
    println!("FAIL mgv {command}");
    println!("{err}");
    std::process::exit(1);
}

/// Variables for a command: the profile's `vars_files`, then `--vars` files
/// in order, then `--var` overrides.
pub fn load_vars(cfg: &ResolvedConfig, sources: &VarSources) -> Result<VariableMap> {
    let files: Vec<PathBuf> =
        cfg.vars_files.iter().chain(sources.vars_files.iter()).cloned().collect();

    let from_files = load_variable_layers(&files).wrap_err("failed to load variables")?;
    let overrides = parse_var_args(&sources.vars);
    tracing::debug!(
        files = files.len(),
        overrides = overrides.len(),
        "loaded variable layers"
    );

    Ok(merge_layers([&from_files, &overrides]))
}
