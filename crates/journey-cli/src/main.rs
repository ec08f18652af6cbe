mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    feature::FeatureSubcommand, idea::IdeaSubcommand, note::NoteSubcommand,
    project::ProjectSubcommand, skill::SkillSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "journey",
    about = "Track projects, features, skills, ideas and notes on your developer journey",
    version,
    propagate_version = true
)]
struct Cli {
    /// Journey root (default: auto-detect from .journey/)
    #[arg(long, global = true, env = "JOURNEY_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a journey in the current directory
    Init {
        /// Storage backend: kv, redb or memory
        #[arg(long, default_value = "kv")]
        backend: String,
        /// Journey name (defaults to the directory name)
        #[arg(long)]
        name: Option<String>,
    },

    /// Show counts for every collection
    State,

    /// Show your level and per-project progress
    Journey,

    /// Manage projects
    Project {
        #[command(subcommand)]
        subcommand: ProjectSubcommand,
    },

    /// Manage the features of a project
    Feature {
        #[command(subcommand)]
        subcommand: FeatureSubcommand,
    },

    /// Manage skills and their links to projects
    Skill {
        #[command(subcommand)]
        subcommand: SkillSubcommand,
    },

    /// Manage project ideas
    Idea {
        #[command(subcommand)]
        subcommand: IdeaSubcommand,
    },

    /// Manage notes
    Note {
        #[command(subcommand)]
        subcommand: NoteSubcommand,
    },

    /// Serve the HTTP API
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "3141")]
        port: u16,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init { backend, name } => cmd::init::run(&root, &backend, name.as_deref()),
        Commands::State => cmd::state::run(&root, cli.json),
        Commands::Journey => cmd::journey::run(&root, cli.json),
        Commands::Project { subcommand } => cmd::project::run(&root, subcommand, cli.json),
        Commands::Feature { subcommand } => cmd::feature::run(&root, subcommand, cli.json),
        Commands::Skill { subcommand } => cmd::skill::run(&root, subcommand, cli.json),
        Commands::Idea { subcommand } => cmd::idea::run(&root, subcommand, cli.json),
        Commands::Note { subcommand } => cmd::note::run(&root, subcommand, cli.json),
        Commands::Serve { port } => cmd::serve::run(&root, port),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
