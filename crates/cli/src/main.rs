mod cmd;
mod completions;
mod logging;
mod prompt;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mgv", version, about = "Render and check @variable templates for lead-magnet pages")]
struct Cli {
    /// Config file (default: ~/.config/magnetvars/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Profile to use instead of the one named in the config
    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print resolved settings
    Doctor,

    /// Interpolate a template with variables
    Render(RenderArgs),

    /// List the variables a template references
    Vars(VarsArgs),

    /// Validate every template under a directory
    Check(CheckArgs),

    /// Suggest variable names for a trailing @partial
    Suggest(SuggestArgs),

    /// Render an output page and inject its embed scripts
    Embed(EmbedArgs),

    /// Print the host-page snippet for an embedded output page
    Snippet(SnippetArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Variable sources shared by the commands that resolve tokens.
#[derive(Debug, Args, Default)]
pub struct VarSources {
    /// JSON or YAML variable file; repeat to layer, later files win
    #[arg(long = "vars", value_name = "FILE")]
    pub vars_files: Vec<PathBuf>,

    /// Variable override as key=value; wins over every file
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Template file to render
    pub template: PathBuf,

    #[command(flatten)]
    pub sources: VarSources,

    /// Text for unresolved variables; `{name}` expands to the variable name
    #[arg(long)]
    pub placeholder: Option<String>,

    /// Leave {if} blocks as literal text
    #[arg(long)]
    pub no_conditionals: bool,

    /// Ignore | formatter suffixes
    #[arg(long)]
    pub no_formatting: bool,

    /// Treat @a.b as @a followed by ".b"
    #[arg(long)]
    pub no_nested: bool,

    /// Escaping for substituted values: none, html or url
    #[arg(long, value_name = "MODE")]
    pub escape: Option<String>,

    /// Fail when any variable stays unresolved
    #[arg(long)]
    pub strict: bool,

    /// Print content and unresolved variables as JSON
    #[arg(long)]
    pub json: bool,

    /// Write the result to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Ask for unresolved variables, then render again
    #[arg(long)]
    pub prompt: bool,
}

#[derive(Debug, Args)]
pub struct VarsArgs {
    /// Template file to inspect
    pub template: PathBuf,

    #[command(flatten)]
    pub sources: VarSources,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Directory to scan
    pub dir: PathBuf,

    #[command(flatten)]
    pub sources: VarSources,

    /// Only report syntax problems, not unresolved variables
    #[arg(long)]
    pub syntax_only: bool,
}

#[derive(Debug, Args)]
pub struct SuggestArgs {
    /// Text up to the cursor, e.g. "Hello @na"
    pub text: String,

    #[command(flatten)]
    pub sources: VarSources,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct EmbedArgs {
    /// Output page HTML template
    pub html: PathBuf,

    #[command(flatten)]
    pub sources: VarSources,

    /// Redirect target, may contain @variables
    #[arg(long, value_name = "URL")]
    pub redirect: Option<String>,

    /// Prefix of postMessage types
    #[arg(long, default_value = "magnet")]
    pub message_prefix: String,

    /// Delay before redirecting, in milliseconds
    #[arg(long, default_value_t = 0)]
    pub delay_ms: u64,

    /// Write the page to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SnippetArgs {
    /// URL of the published output page
    pub url: String,

    /// iframe id attribute
    #[arg(long, default_value = "magnet-frame")]
    pub id: String,

    /// Initial iframe height in pixels
    #[arg(long, default_value_t = 600)]
    pub height: u32,

    /// Prefix of postMessage types
    #[arg(long, default_value = "magnet")]
    pub message_prefix: String,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Doctor => cmd::doctor::run(config, profile),
        Commands::Completions { shell } => completions::run(shell),
        Commands::Snippet(args) => cmd::snippet::run(&args),
        Commands::Render(args) => {
            let cfg = cmd::load_config(config, profile, "render");
            cmd::render::run(&cfg, &args);
        }
        Commands::Vars(args) => {
            let cfg = cmd::load_config(config, profile, "vars");
            cmd::vars::run(&cfg, &args);
        }
        Commands::Check(args) => {
            let cfg = cmd::load_config(config, profile, "check");
            cmd::check::run(&cfg, &args);
        }
        Commands::Suggest(args) => {
            let cfg = cmd::load_config(config, profile, "suggest");
            cmd::suggest::run(&cfg, &args);
        }
        Commands::Embed(args) => {
            let cfg = cmd::load_config(config, profile, "embed");
            cmd::embed::run(&cfg, &args);
        }
    }

    Ok(())
}
