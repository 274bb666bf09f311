mod cmd;
mod output;
mod root;
mod tools;

use clap::{Parser, Subcommand};
use cmd::{
    decision::DecisionSubcommand, feature::FeatureSubcommand, featureset::FeatureSetSubcommand,
    prompt::PromptSubcommand, spec::SpecSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "glam",
    about = "Structured design documents for AI-assisted development — decisions, features, specs, contexts, tasks",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from ai/ or .git/)
    #[arg(long, global = true, env = "GLAM_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the ai/ document tree in the current project
    Init,

    /// Show workspace document counts
    Status,

    /// Manage feature sets (folders of related feature files)
    Featureset {
        #[command(subcommand)]
        subcommand: FeatureSetSubcommand,
    },

    /// Manage feature files and their scenarios
    Feature {
        #[command(subcommand)]
        subcommand: FeatureSubcommand,
    },

    /// List and show spec files
    Spec {
        #[command(subcommand)]
        subcommand: SpecSubcommand,
    },

    /// List decision files
    Decision {
        #[command(subcommand)]
        subcommand: DecisionSubcommand,
    },

    /// Print the schema document for a file kind
    Schema {
        /// decision, feature, spec, context, or task
        kind: String,
    },

    /// Generate prompts for the AI coding agent
    Prompt {
        #[command(subcommand)]
        subcommand: PromptSubcommand,
    },

    /// Run as an MCP stdio server exposing the schema and research tools
    Mcp,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Mcp => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let root_path = cli.root.as_deref();
    let root = root::resolve_root(root_path);

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Status => cmd::status::run(&root, cli.json),
        Commands::Featureset { subcommand } => cmd::featureset::run(&root, subcommand, cli.json),
        Commands::Feature { subcommand } => cmd::feature::run(&root, subcommand, cli.json),
        Commands::Spec { subcommand } => cmd::spec::run(&root, subcommand, cli.json),
        Commands::Decision { subcommand } => cmd::decision::run(&root, subcommand, cli.json),
        Commands::Schema { kind } => cmd::schema::run(&kind),
        Commands::Prompt { subcommand } => cmd::prompt::run(&root, subcommand),
        Commands::Mcp => cmd::mcp::run(&root),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
