use color_eyre::eyre::{Result, WrapErr, eyre};
use magnetvars_core::config::types::ResolvedConfig;
use magnetvars_core::interpolate::{Escaping, InterpolationOptions, VariableInterpolator};
use std::fs;

use super::{fail, load_vars, output};
use crate::{RenderArgs, prompt};

pub fn run(cfg: &ResolvedConfig, args: &RenderArgs) {
    if let Err(e) = render(cfg, args) {
        fail("render", format!("{e:#}"));
    }
}

fn render(cfg: &ResolvedConfig, args: &RenderArgs) -> Result<()> {
    let template = fs::read_to_string(&args.template)
        .wrap_err_with(|| format!("failed to read template {}", args.template.display()))?;
    let mut vars = load_vars(cfg, &args.sources)?;

    let interpolator = VariableInterpolator::new(options_for(cfg, args)?)?;
    let mut result = interpolator.interpolate(&template, &vars);

    if args.prompt && !result.is_complete() {
        let answers = prompt::ask_for(&result.unresolved_variables)?;
        if !answers.is_empty() {
            vars.extend(answers);
            result = interpolator.interpolate(&template, &vars);
        }
    }

    for name in &result.unresolved_variables {
        tracing::warn!("unresolved variable @{name}");
    }
    if args.strict && !result.is_complete() {
        return Err(eyre!("unresolved variables: {}", result.unresolved_variables.join(", ")));
    }

    let body = if args.json {
        serde_json::to_string_pretty(&result)?
    } else {
        result.content
    };
    output::emit(args.output.as_deref(), &body)
        .wrap_err("failed to write rendered output")?;
    Ok(())
}

/// Profile options with command-line overrides applied.
fn options_for(cfg: &ResolvedConfig, args: &RenderArgs) -> Result<InterpolationOptions> {
    let mut options = cfg.interpolation_options();
    if let Some(placeholder) = &args.placeholder {
        options.missing_variable_placeholder = Some(placeholder.clone());
    }
    if args.no_conditionals {
        options.enable_conditional_content = false;
    }
    if args.no_formatting {
        options.enable_formatting = false;
    }
    if args.no_nested {
        options.enable_nested_access = false;
    }
    if let Some(mode) = &args.escape {
        options.escaping = Escaping::from_name(mode)
            .ok_or_else(|| eyre!("unknown escaping mode '{mode}' (expected none, html or url)"))?;
    }
    Ok(options)
}
