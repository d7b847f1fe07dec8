// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `docpoc-admin`: warn when the Admin API is down, then run `docpoc admin`.

use std::ffi::OsString;
use std::process::ExitCode;

use colored::Colorize;
use tracing::debug;

use docpoc::config::{ClientConfig, CONFIG_PATH_ENV};
use docpoc::launcher::{probe_admin_api, Delegate, EXIT_NOT_FOUND, PROBE_TIMEOUT};
use docpoc::logging::{init_logging, DEFAULT_LOG_LEVEL};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let _ = init_logging(DEFAULT_LOG_LEVEL);

    let args: Vec<OsString> = std::env::args_os().skip(1).collect();

    // A broken config file is reported by `docpoc admin` itself.
    let config_path = std::env::var_os(CONFIG_PATH_ENV).map(Into::into);
    let config = ClientConfig::load_or_default(config_path).unwrap_or_else(|e| {
        debug!("Probing default Admin API: {:#}", e);
        let mut config = ClientConfig::default();
        config.apply_env_overrides();
        config
    });

    if let Some(advisory) = probe_admin_api(&config.admin_url, PROBE_TIMEOUT).await {
        println!("{}", advisory.to_string().yellow());
    }

    match Delegate::resolve("admin") {
        Ok(delegate) => delegate.run(&args),
        Err(e) => {
            eprintln!("{}", format!("❌ {}", e).red());
            ExitCode::from(EXIT_NOT_FOUND)
        }
    }
}
