// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Client configuration
//!
//! Resolution order, highest first:
//!
//! 1. Command-line flags (applied by the command handlers)
//! 2. Environment (`DOCPOC_ADMIN_URL`, `DOCPOC_AGENT_URL`)
//! 3. YAML file: `--config` / `DOCPOC_CONFIG_PATH`, `./docpoc.yaml`, `~/.docpoc/config.yaml`
//! 4. Built-in defaults
//!
//! The bearer token is resolved separately by the agent command because its
//! source is reported to the user.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use docpoc_sdk::admin::DEFAULT_ADMIN_URL;
use docpoc_sdk::client::DEFAULT_AGENT_URL;

pub const CONFIG_PATH_ENV: &str = "DOCPOC_CONFIG_PATH";
pub const ADMIN_URL_ENV: &str = "DOCPOC_ADMIN_URL";
pub const AGENT_URL_ENV: &str = "DOCPOC_AGENT_URL";
pub const TOKEN_ENV: &str = "APP_API_TOKEN";

const LOCAL_CONFIG: &str = "./docpoc.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Admin API base URL (without the `/admin` prefix)
    pub admin_url: String,
    /// Agent API base URL
    pub agent_url: String,
    /// Bearer token for the Agent API, used when neither `--token` nor `APP_API_TOKEN` is set
    pub token: Option<String>,
    /// Timeout for Admin API calls and plain Agent API lookups
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            admin_url: DEFAULT_ADMIN_URL.to_string(),
            agent_url: DEFAULT_AGENT_URL.to_string(),
            token: None,
            request_timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Search the implicit locations, first hit wins.
    pub fn discover_config() -> Option<PathBuf> {
        let cwd = PathBuf::from(LOCAL_CONFIG);
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs_next::home_dir() {
            let user_config = home.join(".docpoc").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }

    /// Candidate paths in discovery order, for `config show --paths`.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(home) = dirs_next::home_dir() {
            paths.push(home.join(".docpoc").join("config.yaml"));
        }
        paths
    }

    /// Load configuration with discovery, fallback to default.
    ///
    /// An explicit path must exist and parse.
    pub fn load_or_default(cli_path: Option<PathBuf>) -> Result<Self> {
        let mut config = if let Some(path) = cli_path {
            info!("Loading configuration from explicit path: {:?}", path);
            Self::from_yaml_file(&path)?
        } else if let Some(path) = Self::discover_config() {
            info!("Loading configuration from discovered path: {:?}", path);
            Self::from_yaml_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ADMIN_URL_ENV) {
            info!("Environment override: {}={}", ADMIN_URL_ENV, url);
            self.admin_url = url;
        }
        if let Some(url) = get(AGENT_URL_ENV) {
            info!("Environment override: {}={}", AGENT_URL_ENV, url);
            self.agent_url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_url("admin_url", &self.admin_url)?;
        validate_url("agent_url", &self.agent_url)?;

        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than zero");
        }

        if matches!(&self.token, Some(t) if t.trim().is_empty()) {
            warn!("Config token is set but empty; it will be ignored");
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Config-file token, if non-empty.
    pub fn file_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    let url = reqwest::Url::parse(value)
        .with_context(|| format!("Invalid {}: '{}'", field, value))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => anyhow::bail!(
            "Invalid {}: scheme '{}' is not supported (use http or https)",
            field,
            other
        ),
    }
}
