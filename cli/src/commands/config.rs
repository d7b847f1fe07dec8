// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::config::{ClientConfig, ADMIN_URL_ENV, AGENT_URL_ENV, CONFIG_PATH_ENV, TOKEN_ENV};

pub const SAMPLE_CONFIG: &str = include_str!("../../templates/config.yaml");

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./docpoc.yaml)
        #[arg(short, long, default_value = "./docpoc.yaml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, force } => generate(&output, force).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = ClientConfig::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. {}: {}",
            CONFIG_PATH_ENV,
            std::env::var(CONFIG_PATH_ENV)
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        for (i, path) in ClientConfig::search_paths().iter().enumerate() {
            println!("  {}. {}", i + 3, path.display());
        }
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();
    println!("{}", "Endpoints:".bold());
    println!("  Admin API: {}", config.admin_url);
    println!("  Agent API: {}", config.agent_url);
    println!();

    println!("{}", "Overrides:".bold());
    for key in [ADMIN_URL_ENV, AGENT_URL_ENV] {
        match std::env::var(key) {
            Ok(value) if !value.trim().is_empty() => println!("  {}: {}", key, value),
            _ => println!("  {}: {}", key, "(not set)".dimmed()),
        }
    }
    println!();

    println!("{}", "Agent:".bold());
    println!("  Request timeout: {}s", config.request_timeout_secs);
    println!("  Config token: {}", token_state(config.file_token()));
    println!(
        "  {}: {}",
        TOKEN_ENV,
        token_state(std::env::var(TOKEN_ENV).ok().as_deref().filter(|t| !t.is_empty()))
    );
    println!();

    Ok(())
}

/// Never print the token itself.
fn token_state(token: Option<&str>) -> colored::ColoredString {
    match token {
        Some(_) => "set".green(),
        None => "(not set)".dimmed(),
    }
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = ClientConfig::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    std::fs::write(output, SAMPLE_CONFIG)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_parses_to_defaults() {
        let parsed: ClientConfig = serde_yaml::from_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(parsed, ClientConfig::default());
        parsed.validate().unwrap();
    }

    #[tokio::test]
    async fn test_generate_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docpoc.yaml");

        generate(&path, false).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SAMPLE_CONFIG);

        assert!(generate(&path, false).await.is_err());
        generate(&path, true).await.unwrap();
    }

    #[tokio::test]
    async fn test_validate_rejects_bad_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "admin_url: \"ftp://nowhere\"\n").unwrap();

        let err = validate(Some(path)).await.unwrap_err();
        assert!(format!("{:#}", err).contains("validation failed"));
    }
}
