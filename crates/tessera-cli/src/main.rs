//! Tessera CLI
//!
//! Operator tooling for the trust registry: write a configuration, replay
//! transaction scripts against a persisted snapshot, and query entries.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod script;

use commands::{init, query, run};

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Tessera - hierarchical trust registry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, default_value = "tessera.toml")]
    config: PathBuf,

    /// Registry snapshot path
    #[arg(short, long, global = true, default_value = "tessera-state.json")]
    state: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a registry configuration file
    InitConfig {
        /// The registry's own address (hex)
        #[arg(long)]
        registry: String,

        /// Initial superuser (hex)
        #[arg(long)]
        superuser: String,

        /// Fee threshold for opening a zone, in base units
        #[arg(long)]
        threshold: Option<String>,
    },

    /// Execute a transaction script against the snapshot
    Run {
        /// TOML transaction script
        script: PathBuf,

        /// Stop at the first rejected transaction
        #[arg(long)]
        fail_fast: bool,
    },

    /// Read a metadata entry
    Get {
        /// Zone identifier (hex)
        #[arg(long)]
        zone: String,

        /// Location principal (hex)
        #[arg(long)]
        location: String,

        /// Action selector (hex)
        #[arg(long)]
        selector: String,
    },

    /// Print the snapshot as JSON
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    match cli.command {
        Commands::InitConfig {
            registry,
            superuser,
            threshold,
        } => init::run(&cli.config, &registry, &superuser, threshold.as_deref()),

        Commands::Run { script, fail_fast } => {
            run::run(&cli.config, &cli.state, &script, fail_fast)
        }

        Commands::Get {
            zone,
            location,
            selector,
        } => query::get(&cli.config, &cli.state, &zone, &location, &selector),

        Commands::Show => query::show(&cli.state),
    }
}
