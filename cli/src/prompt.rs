// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! User input for the interactive modes
//!
//! Handlers take `&mut dyn Prompt` so menus and the REPL can be driven by a
//! script in tests instead of a terminal.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use async_trait::async_trait;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Password};

#[async_trait]
pub trait Prompt: Send {
    /// Free text; `default` is used when the user just presses Enter.
    fn text(&mut self, prompt: &str, default: Option<&str>) -> Result<String>;

    fn number(&mut self, prompt: &str, default: u32) -> Result<u32>;

    /// Text entry with hidden input.
    fn secret(&mut self, prompt: &str) -> Result<String>;

    fn confirm(&mut self, prompt: &str) -> Result<bool>;

    /// Wait for the user before redrawing a menu.
    async fn pause(&mut self) -> Result<()>;

    /// Read one raw line. `None` means end of input.
    ///
    /// Dropping the future abandons the read, so callers can race it against Ctrl-C.
    async fn line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Terminal-backed prompts (dialoguer for forms, plain stdin for the REPL so piped input works).
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prompt for TerminalPrompt {
    fn text(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme).with_prompt(prompt);
        if let Some(d) = default {
            input = input.default(d.to_string());
        }
        input.interact_text().context("Failed to read input")
    }

    fn number(&mut self, prompt: &str, default: u32) -> Result<u32> {
        Input::<u32>::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact_text()
            .context("Failed to read number")
    }

    fn secret(&mut self, prompt: &str) -> Result<String> {
        Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .interact()
            .context("Failed to read secret")
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .context("Failed to read confirmation")
    }

    async fn pause(&mut self) -> Result<()> {
        self.line("Press Enter to continue...").await.map(|_| ())
    }

    async fn line(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{}", prompt);
        std::io::stdout().flush().context("Failed to flush stdout")?;
        read_stdin_line().await
    }
}

/// Read one line of stdin on a detached thread, so an abandoned read never
/// holds up runtime shutdown.
async fn read_stdin_line() -> Result<Option<String>> {
    let (tx, rx) = tokio::sync::oneshot::channel();
    std::thread::spawn(move || {
        let mut buf = String::new();
        let read = std::io::stdin().lock().read_line(&mut buf);
        let _ = tx.send(read.map(|n| (n > 0).then_some(buf)));
    });

    let line = rx
        .await
        .context("stdin reader stopped")?
        .context("Failed to read from stdin")?;
    Ok(line.map(|l| l.trim_end_matches(['\r', '\n']).to_string()))
}

/// Prompt that replays canned answers, in order.
///
/// Running out of answers behaves like end of input: `line` yields `None`,
/// everything else errors.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, prompt: &str) -> Result<String> {
        self.answers
            .pop_front()
            .with_context(|| format!("No scripted answer left for '{}'", prompt))
    }
}

#[async_trait]
impl Prompt for ScriptedPrompt {
    fn text(&mut self, prompt: &str, default: Option<&str>) -> Result<String> {
        let answer = self.next(prompt)?;
        match default {
            Some(d) if answer.is_empty() => Ok(d.to_string()),
            _ => Ok(answer),
        }
    }

    fn number(&mut self, prompt: &str, default: u32) -> Result<u32> {
        let answer = self.next(prompt)?;
        if answer.trim().is_empty() {
            return Ok(default);
        }
        answer
            .trim()
            .parse()
            .with_context(|| format!("'{}' is not a number", answer))
    }

    fn secret(&mut self, prompt: &str) -> Result<String> {
        self.next(prompt)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer = self.next(prompt)?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }

    async fn pause(&mut self) -> Result<()> {
        Ok(())
    }

    async fn line(&mut self, _prompt: &str) -> Result<Option<String>> {
        Ok(self.answers.pop_front())
    }
}
