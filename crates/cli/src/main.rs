//! fewshot CLI — the main entry point.
//!
//! Commands:
//! - `stats`    — Summarize a corpus file
//! - `retrieve` — Rank corpus exemplars against a target skeleton
//! - `prompt`   — Assemble a budgeted few-shot prompt for a target skeleton
//! - `config`   — Show the effective configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::QueryArgs;

#[derive(Parser)]
#[command(
    name = "fewshot",
    about = "fewshot — exemplar retrieval and few-shot prompt assembly",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ~/.fewshot/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a corpus file
    Stats {
        /// JSONL corpus file (overrides config)
        #[arg(long)]
        corpus: Option<PathBuf>,
    },

    /// Rank exemplars by similarity to a target skeleton
    Retrieve {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Build a few-shot prompt for a target skeleton
    Prompt {
        #[command(flatten)]
        query: QueryArgs,

        /// Maximum combined content length (overrides config)
        #[arg(long)]
        budget: Option<usize>,

        /// Write the messages as JSON to this file instead of printing them
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Print the config file path instead
        #[arg(long)]
        path: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Stats { corpus } => commands::stats::run(config_path, corpus.as_deref()).await?,
        Commands::Retrieve { query } => commands::retrieve::run(config_path, &query).await?,
        Commands::Prompt {
            query,
            budget,
            output,
        } => commands::prompt::run(config_path, &query, budget, output.as_deref()).await?,
        Commands::Config { path } => {
            if path {
                commands::config_cmd::path(config_path)?
            } else {
                commands::config_cmd::show(config_path)?
            }
        }
    }

    Ok(())
}
