use magnetvars_core::config::types::ResolvedConfig;
use magnetvars_core::vars::{available_paths, suggest};

use super::{fail, load_vars};
use crate::SuggestArgs;

pub fn run(cfg: &ResolvedConfig, args: &SuggestArgs) {
    let vars = match load_vars(cfg, &args.sources) {
        Ok(vars) => vars,
        Err(e) => fail("suggest", format!("{e:#}")),
    };
    let names = available_paths(&vars);

    let Some(set) = suggest(&args.text, &names) else {
        if args.json {
            println!("null");
        } else {
            println!("(not typing a variable)");
        }
        return;
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&set).unwrap_or_default());
        return;
    }

    if set.names.is_empty() {
        println!("(no variables match @{})", set.partial);
        return;
    }
    for name in &set.names {
        println!("@{name}");
    }
}
