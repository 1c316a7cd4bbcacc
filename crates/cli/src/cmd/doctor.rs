use magnetvars_core::config::loader::{ConfigLoader, default_config_path};
use std::path::Path;

pub fn run(config: Option<&Path>, profile: Option<&str>) {
    match ConfigLoader::load(config, profile) {
        Ok(rc) => {
            crate::logging::init(&rc);
            tracing::debug!("config resolved for profile {}", rc.active_profile);

            println!("OK   mgv doctor");
            println!(
                "path: {}",
                rc.source.as_ref().map_or_else(
                    || format!("{} (not found, using defaults)", default_config_path().display()),
                    |p| p.display().to_string()
                )
            );
            println!("profile: {}", rc.active_profile);
            println!("placeholder: {}", rc.placeholder.as_deref().unwrap_or("(keep token)"));
            println!("conditionals: {}", rc.enable_conditional_content);
            println!("formatting: {}", rc.enable_formatting);
            println!("nested_access: {}", rc.enable_nested_access);
            println!("default_currency: {}", rc.default_currency);
            println!("escaping: {}", rc.escaping.as_str());
            println!("template_extensions: {}", rc.template_extensions.join(", "));
            for file in &rc.vars_files {
                let state = if file.exists() { "" } else { " (missing)" };
                println!("vars_file: {}{state}", file.display());
            }
            println!("logging.level: {}", rc.logging.level);
            if let Some(file) = &rc.logging.file {
                println!("logging.file: {}", file.display());
            }
        }
        Err(e) => {
            println!("FAIL mgv doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    }
}
