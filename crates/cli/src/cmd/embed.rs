//! Render an output page for embedding.

use color_eyre::eyre::{Result, WrapErr};
use magnetvars_core::config::types::ResolvedConfig;
use magnetvars_core::embed::{
    MessageKind, RedirectOptions, build_redirect_url, inject_script, redirect_script,
    resize_script,
};
use magnetvars_core::interpolate::{Escaping, VariableInterpolator};
use std::fs;

use super::{fail, load_vars, output};
use crate::EmbedArgs;

pub fn run(cfg: &ResolvedConfig, args: &EmbedArgs) {
    if let Err(e) = embed(cfg, args) {
        fail("embed", format!("{e:#}"));
    }
}

fn embed(cfg: &ResolvedConfig, args: &EmbedArgs) -> Result<()> {
    let template = fs::read_to_string(&args.html)
        .wrap_err_with(|| format!("failed to read page {}", args.html.display()))?;
    let vars = load_vars(cfg, &args.sources)?;

    let options = cfg.interpolation_options().with_escaping(Escaping::Html);
    let page = VariableInterpolator::new(options.clone())?.interpolate(&template, &vars);
    for name in &page.unresolved_variables {
        tracing::warn!("unresolved variable @{name} in page");
    }

    let mut html =
        inject_script(&page.content, &resize_script(&MessageKind::Resize.message_type(&args.message_prefix)));

    if let Some(url_template) = &args.redirect {
        let redirect = build_redirect_url(url_template, &vars, &options)
            .wrap_err("failed to build redirect url")?;
        for name in &redirect.unresolved_variables {
            tracing::warn!("unresolved variable @{name} in redirect url");
        }
        let options = RedirectOptions::for_prefix(&args.message_prefix).with_delay(args.delay_ms);
        html = inject_script(&html, &redirect_script(&redirect.url, &options));
    }

    output::emit(args.output.as_deref(), &html).wrap_err("failed to write page")?;
    Ok(())
}
