//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod config_cmd;
mod find;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::load_settings;

#[derive(Parser)]
#[command(name = "gamesource")]
#[command(about = "Find the playable game behind a browser game listing page")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API and web console
    Serve {
        /// Address to bind: port, host, or host:port (default from config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Look up the game source for a listing page
    Find {
        /// Listing page URL
        url: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the candidate URLs that would be probed for a page
    Candidates {
        /// Listing page URL
        url: String,
        /// Numeric game id to fill id-based templates
        #[arg(long)]
        id: Option<String>,
    },

    /// Print the effective configuration as TOML
    Config,
}

/// Parse arguments, load configuration and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (settings, config) = load_settings(cli.config.as_deref()).await?;

    match cli.command {
        Commands::Serve { bind } => serve::cmd_serve(&settings, bind.as_deref()).await,
        Commands::Find { url, json } => find::cmd_find(&settings, &url, json).await,
        Commands::Candidates { url, id } => {
            find::cmd_candidates(&settings, &url, id.as_deref())
        }
        Commands::Config => config_cmd::cmd_config_show(&settings, &config),
    }
}
