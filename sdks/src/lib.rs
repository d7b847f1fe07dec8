// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! docpoc Rust SDK
//!
//! Typed async clients for the two services behind the docpoc tooling:
//!
//! - [`AdminClient`] talks to the Admin API (users, tokens, Q/A history).
//! - [`AgentClient`] talks to the Agent API (question answering and documents).

pub mod admin;
pub mod client;
mod endpoint;
pub mod error;
pub mod types;

pub use admin::AdminClient;
pub use client::AgentClient;
pub use error::{ApiError, Result};
pub use types::*;
