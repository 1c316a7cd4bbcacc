//! List the variables a template references.

use color_eyre::eyre::{Result, WrapErr};
use magnetvars_core::config::types::ResolvedConfig;
use magnetvars_core::interpolate::VariableInterpolator;
use magnetvars_core::vars::{TokenRef, VariableMap};
use serde::Serialize;
use std::fs;
use tabled::{Table, Tabled, settings::Style};

use super::{fail, load_vars, output};
use crate::VarsArgs;

/// One variable for JSON output.
#[derive(Debug, Serialize)]
struct VariableInfo {
    name: String,
    formatters: Vec<String>,
    occurrences: usize,
    resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

/// Row for the variables table.
#[derive(Tabled)]
struct VariableRow {
    #[tabled(rename = "Variable")]
    name: String,
    #[tabled(rename = "Formatters")]
    formatters: String,
    #[tabled(rename = "Uses")]
    occurrences: usize,
    #[tabled(rename = "Resolved")]
    resolved: String,
    #[tabled(rename = "Value")]
    value: String,
}

pub fn run(cfg: &ResolvedConfig, args: &VarsArgs) {
    let infos = match collect(cfg, args) {
        Ok(infos) => infos,
        Err(e) => fail("vars", format!("{e:#}")),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&infos).unwrap_or_default());
        return;
    }

    if infos.is_empty() {
        println!("(no variables found)");
        return;
    }

    let rows: Vec<VariableRow> = infos
        .iter()
        .map(|info| VariableRow {
            name: format!("@{}", info.name),
            formatters: if info.formatters.is_empty() {
                "-".to_string()
            } else {
                info.formatters.join(" | ")
            },
            occurrences: info.occurrences,
            resolved: if info.resolved { "yes" } else { "no" }.to_string(),
            value: info.value.as_deref().map_or_else(|| "-".to_string(), |v| output::truncate(v, 40)),
        })
        .collect();

    let unresolved = infos.iter().filter(|i| !i.resolved).count();
    println!("{}", Table::new(&rows).with(Style::rounded()));
    println!("-- {} variables, {} unresolved --", infos.len(), unresolved);
}

fn collect(cfg: &ResolvedConfig, args: &VarsArgs) -> Result<Vec<VariableInfo>> {
    let template = fs::read_to_string(&args.template)
        .wrap_err_with(|| format!("failed to read template {}", args.template.display()))?;
    let vars = load_vars(cfg, &args.sources)?;
    let interpolator = VariableInterpolator::new(cfg.interpolation_options())?;

    Ok(summarize(&interpolator, &interpolator.extract_tokens(&template), &vars))
}

/// Group tokens by path, in first-appearance order.
fn summarize(
    interpolator: &VariableInterpolator,
    tokens: &[TokenRef],
    vars: &VariableMap,
) -> Vec<VariableInfo> {
    let mut infos: Vec<VariableInfo> = Vec::new();
    for token in tokens {
        let formatters = token.formatters.iter().map(|f| match &f.arg {
            Some(arg) => format!("{}:{arg}", f.name),
            None => f.name.clone(),
        });

        if let Some(info) = infos.iter_mut().find(|i| i.name == token.path) {
            info.occurrences += 1;
            for formatter in formatters {
                if !info.formatters.contains(&formatter) {
                    info.formatters.push(formatter);
                }
            }
            continue;
        }

        let value = interpolator.value_of(&token.path, vars).map(|v| v.render());
        infos.push(VariableInfo {
            name: token.path.clone(),
            formatters: formatters.collect(),
            occurrences: 1,
            resolved: value.is_some(),
            value,
        });
    }
    infos
}
