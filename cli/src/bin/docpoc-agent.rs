// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! `docpoc-agent`: hint at token setup when none is given, then run `docpoc agent`.

use std::ffi::OsString;
use std::process::ExitCode;

use colored::Colorize;

use docpoc::config::TOKEN_ENV;
use docpoc::launcher::{agent_advisory, Delegate, EXIT_NOT_FOUND};
use docpoc::logging::{init_logging, DEFAULT_LOG_LEVEL};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let _ = init_logging(DEFAULT_LOG_LEVEL);

    let args: Vec<OsString> = std::env::args_os().skip(1).collect();

    if let Some(advisory) = agent_advisory(&args, std::env::var_os(TOKEN_ENV).as_deref()) {
        println!("{}", advisory.to_string().cyan());
    }

    match Delegate::resolve("agent") {
        Ok(delegate) => delegate.run(&args),
        Err(e) => {
            eprintln!("{}", format!("❌ {}", e).red());
            ExitCode::from(EXIT_NOT_FOUND)
        }
    }
}
