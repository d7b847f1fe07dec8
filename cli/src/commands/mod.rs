// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the docpoc CLI

pub mod admin;
pub mod agent;
pub mod config;

pub use self::admin::{AdminArgs, AdminCommand};
pub use self::agent::AgentArgs;
pub use self::config::ConfigCommand;
