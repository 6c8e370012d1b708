use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod paths;
mod ui;

use commands::TargetArgs;

#[derive(Parser)]
#[command(name = "hetgraph")]
#[command(about = "Load a Neo4j property graph as per-type id lists and remapped edge indices.")]
#[command(version)]
struct Cli {
    /// Loader config file (default: $HETGRAPH_CONFIG or ./hetgraph.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Show progress logs
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the whole graph and print a summary
    Load {
        #[command(flatten)]
        target: TargetArgs,

        /// Also fetch per-node property maps
        #[arg(long)]
        features: bool,

        /// Output the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Discover node and edge types only
    Schema {
        #[command(flatten)]
        target: TargetArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.unwrap_or_else(paths::get_config_path);

    match cli.command {
        Commands::Load {
            target,
            features,
            json,
        } => commands::load::run(&config_path, target, features, json).await,
        Commands::Schema { target, json } => commands::schema::run(&config_path, target, json).await,
    }
}
