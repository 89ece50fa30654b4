//! ctxpack CLI: the main entry point.
//!
//! Commands:
//! - `agent`  : Print a budget-aware context packet
//! - `status` : Show context files and their token cost
//! - `config` : Show, locate, validate or initialize configuration

use clap::{Parser, Subcommand};
use ctxpack_agent::OutputFormat;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "ctxpack",
    about = "ctxpack: budget-aware context packets for AI coding agents",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a context packet for an AI agent
    Agent {
        /// Token budget for the packet
        #[arg(short, long)]
        budget: Option<usize>,

        /// Output format (md or json)
        #[arg(short, long, default_value = "md")]
        format: OutputFormat,

        /// Context directory (defaults to the configured one)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Session ID; repeated calls within the cooldown print nothing
        #[arg(short, long)]
        session: Option<String>,

        /// Cooldown window in seconds (0 disables)
        #[arg(long)]
        cooldown: Option<u64>,

        /// Print the per-tier token breakdown to stderr
        #[arg(long)]
        explain: bool,
    },

    /// Show context files with token estimates
    Status {
        /// Context directory (defaults to the configured one)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
    /// Validate the configuration file
    Validate,
    /// Write a default configuration file
    Init {
        /// Write the global config instead of ./.ctxpack.toml
        #[arg(long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the packet
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Agent {
            budget,
            format,
            dir,
            session,
            cooldown,
            explain,
        } => commands::agent::run(commands::agent::AgentArgs {
            budget,
            format,
            dir,
            session,
            cooldown,
            explain,
        })?,
        Commands::Status { dir } => commands::status::run(dir)?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show()?,
            ConfigAction::Path => commands::config_cmd::path()?,
            ConfigAction::Validate => commands::config_cmd::validate()?,
            ConfigAction::Init { global, force } => commands::config_cmd::init(global, force)?,
        },
    }

    Ok(())
}
