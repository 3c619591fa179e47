//! # dialtone CLI
//!
//! Command-line interface for dialtone - a configuration-driven agent whose
//! tools are REST endpoints described in a stored document.
//!
//! ## Usage
//!
//! - `dialtone` - Start a console conversation (same as `dialtone run`)
//! - `dialtone tools` - Show the resolved toolset
//! - `dialtone show` - Show the effective configuration
//! - `dialtone validate <FILE>` - Check a configuration document
//! - `dialtone save <FILE>` - Store a configuration document
//! - `dialtone invoke <TOOL> --args '{...}'` - Call one tool

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod output;
mod runtime;

use commands::{
    invoke_command, run_command, save_command, show_command, tools_command, validate_command,
};
use config::CliConfigLoader;

/// dialtone - configuration-driven REST tools for conversational agents
#[derive(Parser)]
#[command(name = "dialtone")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run an agent whose tools are configured REST endpoints")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory of a file-backed configuration store
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    /// Base URL of a REST configuration store
    #[arg(long, global = true, conflicts_with = "store_dir")]
    store_url: Option<String>,

    /// Per-call timeout for tool requests, in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a console conversation with the configured agent
    Run,

    /// Show the resolved toolset
    Tools,

    /// Show the effective configuration and where it came from
    Show,

    /// Validate a configuration document file
    Validate {
        /// JSON document to check
        file: PathBuf,
    },

    /// Validate and store a configuration document file
    Save {
        /// JSON document to store
        file: PathBuf,
    },

    /// Invoke a single tool and print the result
    Invoke {
        /// Tool name
        tool: String,

        /// Arguments as a JSON object
        #[arg(long)]
        args: Option<String>,
    },
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }

    if let Some(store_dir) = &cli.store_dir {
        loader = loader.with_store_dir_override(store_dir.clone());
    }

    if let Some(store_url) = &cli.store_url {
        loader = loader.with_store_url_override(store_url.clone());
    }

    if let Some(timeout) = cli.timeout {
        loader = loader.with_timeout_override(timeout);
    }

    loader
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    dialtone_core::init_tracing_with_debug(cli.verbose);

    let config_loader = build_config_loader(&cli);

    match cli.command {
        None | Some(Commands::Run) => run_command(config_loader).await,
        Some(Commands::Tools) => tools_command(config_loader).await,
        Some(Commands::Show) => show_command(config_loader).await,
        Some(Commands::Validate { file }) => validate_command(&file).await,
        Some(Commands::Save { file }) => save_command(&file, config_loader).await,
        Some(Commands::Invoke { tool, args }) => {
            invoke_command(&tool, args.as_deref(), config_loader).await
        }
    }
}
