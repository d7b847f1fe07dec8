// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! docpoc CLI library - exposes testable components
//!
//! # Architecture
//!
//! - **Layer:** Interface / Presentation Layer
//! - **Purpose:** Command handlers, launchers and rendering for the `docpoc` binaries

pub mod commands;
pub mod config;
pub mod launcher;
pub mod logging;
pub mod output;
pub mod prompt;
pub mod repl;
