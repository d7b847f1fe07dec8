// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Interactive question-answering session against the Agent API
//!
//! `docpoc agent` checks the API, greets the agent, then reads REPL commands
//! (see [`crate::repl`]) until the user quits, input ends or Ctrl-C is pressed.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressFinish, ProgressStyle};
use tracing::debug;

use docpoc_sdk::{AgentClient, ApiError};

use crate::config::{ClientConfig, TOKEN_ENV};
use crate::output;
use crate::prompt::{Prompt, TerminalPrompt};
use crate::repl::{self, ReplCommand};

pub const GREETING: &str = "Hello! Please tell me what capabilities do you have?";

#[derive(Args)]
pub struct AgentArgs {
    /// API base URL (default: from config, else http://localhost:8000)
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Authentication token for API access (falls back to APP_API_TOKEN)
    #[arg(short, long)]
    pub token: Option<String>,

    /// Skip startup greeting
    #[arg(long)]
    pub no_greeting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Flag,
    Environment,
    ConfigFile,
}

/// Pick the first non-empty token: flag, then environment, then config file.
pub fn resolve_token(
    flag: Option<String>,
    env: Option<String>,
    config: Option<&str>,
) -> Option<(String, TokenSource)> {
    let non_empty = |t: &String| !t.trim().is_empty();

    flag.filter(non_empty)
        .map(|t| (t, TokenSource::Flag))
        .or_else(|| env.filter(non_empty).map(|t| (t, TokenSource::Environment)))
        .or_else(|| {
            config
                .filter(|t| !t.trim().is_empty())
                .map(|t| (t.to_string(), TokenSource::ConfigFile))
        })
}

pub async fn handle_command(args: AgentArgs, config: &ClientConfig) -> Result<()> {
    println!("{}", output::header());

    let resolved = resolve_token(args.token, std::env::var(TOKEN_ENV).ok(), config.file_token());
    match &resolved {
        Some((_, TokenSource::Environment)) => {
            println!("🔑 Using token from {} environment variable", TOKEN_ENV)
        }
        Some((_, source)) => debug!("Using token from {:?}", source),
        None => {}
    }

    let base_url = args.url.unwrap_or_else(|| config.agent_url.clone());
    let mut client = AgentClient::new(base_url)?.with_timeout(config.request_timeout());
    if let Some((token, _)) = resolved {
        client = client.with_token(token);
    }

    let session = AgentSession::new(client);
    let mut prompt = TerminalPrompt::new();
    until_interrupted(async {
        if !args.no_greeting {
            session.startup_greeting().await?;
        }
        session.interactive_loop(&mut prompt).await
    })
    .await
}

/// Run `work` to completion, or stop it and say goodbye on Ctrl-C.
pub async fn until_interrupted<F>(work: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    // The handler must be installed before `work` can print the first prompt.
    tokio::select! {
        biased;

        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            println!("\n👋 Goodbye!");
            Ok(())
        }
        result = work => result,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// What a REPL request was trying to do, for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Ask,
    ListDocuments,
    Upload { path: String },
    Summary { doc_id: String },
    Topics { doc_id: String },
    Delete { filename: String },
}

impl Operation {
    fn requires_token(&self) -> bool {
        !matches!(self, Operation::Ask)
    }

    pub fn auth_required_message(&self) -> String {
        let what = match self {
            Operation::Ask => "for this operation",
            Operation::ListDocuments => "to list documents",
            Operation::Upload { .. } => "for file upload",
            Operation::Summary { .. } => "for document summary",
            Operation::Topics { .. } => "for document topics",
            Operation::Delete { .. } => "for document deletion",
        };
        format!("❌ Authentication required {}. Please provide a token.", what)
    }

    /// Map a failed request to the line shown to the user.
    pub fn failure_message(&self, err: &ApiError) -> String {
        if err.is_unauthorized() {
            return match self {
                Operation::Ask => "❌ Authentication required. Please provide a valid token.".to_string(),
                _ => "❌ Authentication failed. Please check your token.".to_string(),
            };
        }

        match (self, err) {
            (Operation::Summary { doc_id } | Operation::Topics { doc_id }, e) if e.is_not_found() => {
                format!("❌ Document not found: {}", doc_id)
            }
            (Operation::Delete { filename }, e) if e.is_not_found() => {
                format!("❌ File not found: {}", filename)
            }
            (Operation::Upload { .. }, e) if e.is_payload_too_large() => {
                "❌ File too large (max 2 MiB).".to_string()
            }
            (Operation::Upload { path }, ApiError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                format!("❌ File not found: {}", path)
            }
            (Operation::Ask, ApiError::Status { .. }) => format!("❌ HTTP Error: {}", err),
            (Operation::Ask, _) => format!("❌ Error: {}", err),
            (Operation::ListDocuments, _) => format!("❌ Error fetching documents: {}", err),
            (Operation::Upload { .. }, ApiError::Status { .. }) => format!("❌ Upload failed: {}", err),
            (Operation::Upload { .. }, _) => format!("❌ Upload error: {}", err),
            (Operation::Summary { .. }, ApiError::Status { .. }) => {
                format!("❌ Summary request failed: {}", err)
            }
            (Operation::Summary { .. }, _) => format!("❌ Summary error: {}", err),
            (Operation::Topics { .. }, ApiError::Status { .. }) => {
                format!("❌ Topics request failed: {}", err)
            }
            (Operation::Topics { .. }, _) => format!("❌ Topics error: {}", err),
            (Operation::Delete { .. }, ApiError::Status { .. }) => format!("❌ Deletion failed: {}", err),
            (Operation::Delete { .. }, _) => format!("❌ Deletion error: {}", err),
        }
    }
}

pub struct AgentSession {
    client: AgentClient,
}

impl AgentSession {
    pub fn new(client: AgentClient) -> Self {
        Self { client }
    }

    /// Health check, optional token check, then the capability greeting.
    ///
    /// Fails when the API is down or the supplied token is rejected.
    pub async fn startup_greeting(&self) -> Result<()> {
        println!("🚀 Initializing connection...");
        println!("⏳ Checking API connection...");

        if !self.client.health_check().await {
            anyhow::bail!(
                "Could not connect to API. Please ensure the server is running.\nExpected API at: {}",
                self.client.base_url()
            );
        }
        println!("{}", "✅ Connected to API successfully!".green());

        // With a token the greeting doubles as the authentication check.
        let greeting = if self.client.has_token() {
            println!("🔑 Checking authentication...");
            match self.client.ask_question(GREETING, None).await {
                Ok(response) => {
                    println!("{}", "✅ Authentication successful!".green());
                    Some(Ok(response))
                }
                Err(e) if e.is_unauthorized() => {
                    anyhow::bail!("Authentication failed. Please check your token.")
                }
                Err(e) => anyhow::bail!("Error during authentication check: {}", e),
            }
        } else {
            println!("{}", "⚠️  No authentication token provided.".yellow());
            println!("    Set {} environment variable or use --token argument.", TOKEN_ENV);
            println!("    Some features may not work without authentication.");
            None
        };
        println!();

        println!("⏳ Asking about capabilities...");
        let greeting = match greeting {
            Some(result) => result,
            None => self.client.ask_question(GREETING, None).await,
        };

        match greeting {
            Ok(response) => {
                println!("{}", output::agent_response(&response));
                println!();
            }
            Err(e) if e.is_unauthorized() => {
                println!(
                    "{}",
                    "❌ Authentication required for this operation. Please provide a valid token."
                        .red()
                );
                println!();
            }
            Err(e) => {
                println!("{}", format!("❌ Error during startup greeting: {}", e).red());
                println!();
            }
        }

        Ok(())
    }

    /// Read and run REPL commands until `quit` or end of input.
    pub async fn interactive_loop(&self, prompt: &mut dyn Prompt) -> Result<()> {
        println!("💡 Type your questions below. Use 'help' for commands or 'quit' to exit.");
        println!();

        loop {
            let line = match prompt.line("🤔 Your question: ").await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    println!("\n👋 Goodbye!");
                    break;
                }
                Err(e) => {
                    debug!("Input ended: {:#}", e);
                    println!("\n👋 Goodbye!");
                    break;
                }
            };

            if self.execute(repl::parse(&line)).await == Flow::Quit {
                break;
            }
        }

        Ok(())
    }

    pub async fn execute(&self, command: ReplCommand) -> Flow {
        match command {
            ReplCommand::Empty => {}
            ReplCommand::Quit => {
                println!("👋 Goodbye!");
                return Flow::Quit;
            }
            ReplCommand::Help => {
                println!("{}", output::separator());
                println!("{}", repl::help_text());
                println!("{}", output::separator());
                println!();
            }
            ReplCommand::Clear => {
                print!("\x1b[2J\x1b[H");
                println!("{}", output::header());
            }
            ReplCommand::Usage(usage) => println!("{}", usage.red()),
            ReplCommand::Documents => self.show_documents().await,
            ReplCommand::Upload(path) => self.upload(&path).await,
            ReplCommand::Summary { doc_id, length } => self.summary(&doc_id, length).await,
            ReplCommand::Topics(doc_id) => self.topics(&doc_id).await,
            ReplCommand::Delete(filename) => self.delete(&filename).await,
            ReplCommand::Ask { question, doc_id } => self.ask(&question, doc_id.as_deref()).await,
        }
        Flow::Continue
    }

    /// Print the auth message and return false when `op` needs a token we do not have.
    fn authorized(&self, op: &Operation) -> bool {
        if op.requires_token() && !self.client.has_token() {
            println!("{}", op.auth_required_message().red());
            println!();
            return false;
        }
        true
    }

    fn report(&self, op: &Operation, err: &ApiError) {
        debug!("{:?} failed: {:?}", op, err);
        println!("{}", op.failure_message(err).red());
        println!();
    }

    async fn ask(&self, question: &str, doc_id: Option<&str>) {
        let spinner = thinking_spinner();
        let result = self.client.ask_question(question, doc_id).await;
        spinner.finish_and_clear();

        match result {
            Ok(response) => {
                println!("{}", output::agent_response(&response));
                println!();
            }
            Err(e) => self.report(&Operation::Ask, &e),
        }
    }

    async fn show_documents(&self) {
        let op = Operation::ListDocuments;
        if !self.authorized(&op) {
            return;
        }

        println!("⏳ Fetching documents...");
        match self.client.list_documents().await {
            Ok(docs) => {
                println!("{}", output::separator());
                if docs.documents.is_empty() {
                    println!("📄 No documents available");
                } else {
                    println!("📚 Available Documents:");
                    println!();
                    for doc in &docs.documents {
                        println!("  • {}: {}", doc.id, doc.filename);
                    }
                }
                println!("{}", output::separator());
                println!();
            }
            Err(e) => self.report(&op, &e),
        }
    }

    async fn upload(&self, path: &str) {
        let op = Operation::Upload {
            path: path.to_string(),
        };
        if !self.authorized(&op) {
            return;
        }

        println!("⏳ Uploading file: {}", path);
        match self.client.upload_document(Path::new(path)).await {
            Ok(result) => {
                println!(
                    "{}",
                    format!(
                        "✅ File uploaded successfully! Path: {}, Status: {}",
                        result.file_path.as_deref().unwrap_or("Unknown"),
                        result.status.as_deref().unwrap_or("Unknown")
                    )
                    .green()
                );
                println!("⌛ The file will be automatically ingested by the document watcher");
                println!("{}", output::separator());
                println!();
            }
            Err(e) => self.report(&op, &e),
        }
    }

    async fn summary(&self, doc_id: &str, length: u32) {
        let op = Operation::Summary {
            doc_id: doc_id.to_string(),
        };
        if !self.authorized(&op) {
            return;
        }

        println!("⏳ Generating summary for document {} ({} words)...", doc_id, length);
        match self.client.get_document_summary(doc_id, length).await {
            Ok(summary) => {
                println!("{}", output::separator());
                println!("📄 Summary for Document: {}", doc_id);
                println!("📏 Length: {} words", length);
                println!();
                println!(
                    "{}",
                    summary.summary.as_deref().unwrap_or("No summary available")
                );
                println!("{}", output::separator());
                println!();
            }
            Err(e) => self.report(&op, &e),
        }
    }

    async fn topics(&self, doc_id: &str) {
        let op = Operation::Topics {
            doc_id: doc_id.to_string(),
        };
        if !self.authorized(&op) {
            return;
        }

        println!("⏳ Fetching topics for document {}...", doc_id);
        match self.client.get_document_topics(doc_id).await {
            Ok(topics) => {
                println!("{}", output::separator());
                println!("🏷️  Topics for Document: {}", doc_id);
                println!();
                if topics.topics.is_empty() {
                    println!("  No topics found");
                } else {
                    for topic in &topics.topics {
                        println!("  • {}", topic);
                    }
                }
                println!("{}", output::separator());
                println!();
            }
            Err(e) => self.report(&op, &e),
        }
    }

    async fn delete(&self, filename: &str) {
        let op = Operation::Delete {
            filename: filename.to_string(),
        };
        if !self.authorized(&op) {
            return;
        }

        println!("⏳ Deleting document: {}...", filename);
        match self.client.delete_document(filename).await {
            Ok(result) => {
                println!("{}", output::separator());
                println!("🗑️  Document deleted: {}", filename);
                println!("Status: {}", result.status.as_deref().unwrap_or("completed"));
                println!("{}", output::separator());
                println!();
            }
            Err(e) => self.report(&op, &e),
        }
    }
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner().with_finish(ProgressFinish::AndClear);
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("⏳ Thinking...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
