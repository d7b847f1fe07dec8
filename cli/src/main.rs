// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # docpoc
//!
//! Command-line client for the LLM Document PoC services.
//!
//! ## Commands
//!
//! - `docpoc admin [create|get|validate|refresh-token|add-qa|history|delete|list-users]` - User management (Admin API)
//! - `docpoc agent` - Interactive question answering and document operations (Agent API)
//! - `docpoc config show|validate|generate` - Configuration management
//!
//! The `docpoc-admin` and `docpoc-agent` launchers print a startup advisory and
//! then hand over to `docpoc admin` / `docpoc agent`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::debug;

use docpoc::commands::{self, AdminArgs, AgentArgs, ConfigCommand};
use docpoc::config::{ClientConfig, CONFIG_PATH_ENV};
use docpoc::logging::{init_logging, DEFAULT_LOG_LEVEL};

/// LLM Document PoC client
#[derive(Parser)]
#[command(name = "docpoc")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, env = CONFIG_PATH_ENV, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "DOCPOC_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// User management against the Admin API
    #[command(name = "admin")]
    Admin(AdminArgs),

    /// Interactive session with the Agent API
    #[command(name = "agent")]
    Agent(AgentArgs),

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level) {
        eprintln!("{}", format!("❌ {:#}", e).red());
        return ExitCode::FAILURE;
    }

    let Some(command) = cli.command else {
        eprintln!("{}", "No command specified. Use --help for usage.".yellow());
        return ExitCode::FAILURE;
    };

    match run(command, cli.config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("Command failed: {:?}", e);
            eprintln!("{}", format!("❌ {:#}", e).red());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Config { command } => commands::config::handle_command(command, config_path).await,
        Commands::Admin(args) => {
            let config = ClientConfig::load_or_default(config_path)?;
            commands::admin::handle_command(args, &config).await
        }
        Commands::Agent(args) => {
            let config = ClientConfig::load_or_default(config_path)?;
            commands::agent::handle_command(args, &config).await
        }
    }
}
