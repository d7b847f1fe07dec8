// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! User management commands against the Admin API
//!
//! Commands: interactive, create, get, validate, refresh-token, add-qa, history, delete, list-users
//!
//! Running `docpoc admin` without a subcommand opens the interactive menu.

use anyhow::{Context, Result};
use clap::{ArgGroup, Args, Subcommand};
use colored::Colorize;
use tracing::debug;

use docpoc_sdk::admin::{DEFAULT_HISTORY_LIMIT, DEFAULT_TOKEN_HOURS};
use docpoc_sdk::{AdminClient, CreatedUser, QaAdded, RefreshedToken, User, UserHistory};

use crate::config::ClientConfig;
use crate::output;
use crate::prompt::{Prompt, TerminalPrompt};

#[derive(Args)]
pub struct AdminArgs {
    /// Admin API base URL (default: from config, else http://127.0.0.1:8001)
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Option<AdminCommand>,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Launch interactive user management mode
    Interactive,

    /// Create a new user
    Create {
        /// User email address
        #[arg(long)]
        email: String,

        /// User display name
        #[arg(long)]
        name: String,

        /// Token validity in hours
        #[arg(long, default_value_t = DEFAULT_TOKEN_HOURS)]
        token_hours: u32,
    },

    /// Get user by ID or email
    #[command(group(ArgGroup::new("lookup").required(true).args(["user_id", "email"])))]
    Get {
        /// User ID
        #[arg(long)]
        user_id: Option<String>,

        /// User email
        #[arg(long)]
        email: Option<String>,
    },

    /// Validate an access token
    Validate {
        /// Access token to validate
        #[arg(long)]
        token: String,
    },

    /// Refresh a user's access token
    RefreshToken {
        #[arg(long)]
        user_id: String,

        /// Token validity in hours
        #[arg(long, default_value_t = DEFAULT_TOKEN_HOURS)]
        token_hours: u32,
    },

    /// Add a Q/A pair to a user's history
    AddQa {
        #[arg(long)]
        user_id: String,

        #[arg(long)]
        question: String,

        #[arg(long)]
        answer: String,
    },

    /// Show a user's Q/A history
    History {
        #[arg(long)]
        user_id: String,
    },

    /// Delete a user
    Delete {
        #[arg(long)]
        user_id: String,

        /// Skip confirmation prompt
        #[arg(long)]
        confirm: bool,
    },

    /// List all users
    ListUsers {
        /// Maximum number of users to list
        #[arg(long, default_value_t = 50)]
        limit: u32,

        /// Number of users to skip
        #[arg(long, default_value_t = 0)]
        skip: u32,
    },
}

pub async fn handle_command(args: AdminArgs, config: &ClientConfig) -> Result<()> {
    let base_url = args.url.unwrap_or_else(|| config.admin_url.clone());
    debug!("Using Admin API at {}", base_url);

    let manager = UserManager::new(AdminClient::with_timeout(
        base_url,
        config.request_timeout(),
    )?);

    match args.command.unwrap_or(AdminCommand::Interactive) {
        AdminCommand::Interactive => manager.interactive(&mut TerminalPrompt::new()).await,
        AdminCommand::Create {
            email,
            name,
            token_hours,
        } => manager.create_user(&email, &name, token_hours).await.map(drop),
        AdminCommand::Get { user_id, email } => match (user_id, email) {
            (Some(id), _) => manager.get_user(&id).await.map(drop),
            (None, Some(email)) => manager.get_user_by_email(&email).await.map(drop),
            (None, None) => anyhow::bail!("Please provide either --user-id or --email"),
        },
        AdminCommand::Validate { token } => manager.validate_token(&token).await.map(drop),
        AdminCommand::RefreshToken {
            user_id,
            token_hours,
        } => manager.refresh_token(&user_id, token_hours).await.map(drop),
        AdminCommand::AddQa {
            user_id,
            question,
            answer,
        } => manager.add_qa(&user_id, &question, &answer).await.map(drop),
        AdminCommand::History { user_id } => manager.show_history(&user_id).await.map(drop),
        AdminCommand::Delete { user_id, confirm } => {
            if !confirm && !confirm_delete(&mut TerminalPrompt::new(), &user_id)? {
                println!("Operation cancelled.");
                return Ok(());
            }
            manager.delete_user(&user_id).await.map(drop)
        }
        AdminCommand::ListUsers { limit, skip } => manager.list_users(limit, skip).await.map(drop),
    }
}

fn confirm_delete(prompt: &mut dyn Prompt, user_id: &str) -> Result<bool> {
    prompt.confirm(&format!(
        "Are you sure you want to delete user {}?",
        user_id
    ))
}

/// Interactive menu entries, numbered as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Exit,
    CreateUser,
    GetUserById,
    GetUserByEmail,
    ValidateToken,
    RefreshToken,
    AddQa,
    ShowHistory,
    DeleteUser,
    ListUsers,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 10] = [
        MenuChoice::Exit,
        MenuChoice::CreateUser,
        MenuChoice::GetUserById,
        MenuChoice::GetUserByEmail,
        MenuChoice::ValidateToken,
        MenuChoice::RefreshToken,
        MenuChoice::AddQa,
        MenuChoice::ShowHistory,
        MenuChoice::DeleteUser,
        MenuChoice::ListUsers,
    ];

    pub fn from_number(n: u32) -> Option<Self> {
        Self::ALL.get(n as usize).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Exit => "Exit",
            MenuChoice::CreateUser => "Create user",
            MenuChoice::GetUserById => "Get user by ID",
            MenuChoice::GetUserByEmail => "Get user by email",
            MenuChoice::ValidateToken => "Validate token",
            MenuChoice::RefreshToken => "Refresh token",
            MenuChoice::AddQa => "Add Q/A to history",
            MenuChoice::ShowHistory => "Show user history",
            MenuChoice::DeleteUser => "Delete user",
            MenuChoice::ListUsers => "List all users",
        }
    }
}

fn section(title: &str) {
    println!("\n{}", title);
    println!("{}", "-".repeat(title.chars().count().saturating_sub(1)));
}

/// Admin operations with their terminal rendering.
///
/// Each method prints its own result. `Ok(None)`/`Ok(false)` means the
/// service had no such user; transport and API failures come back as `Err`.
pub struct UserManager {
    client: AdminClient,
}

impl UserManager {
    pub fn new(client: AdminClient) -> Self {
        Self { client }
    }

    pub async fn create_user(
        &self,
        email: &str,
        name: &str,
        token_hours: u32,
    ) -> Result<Option<CreatedUser>> {
        let created = self
            .client
            .create_user(email, name, token_hours)
            .await
            .context("Error creating user")?;

        match &created {
            Some(user) => {
                println!("{}", "✅ User created successfully!".green());
                println!("   ID: {}", user.user_id);
                println!("   Email: {}", user.email);
                println!("   Name: {}", user.name);
                println!("   Token: {}", user.token);
                println!("   Expires: {}", user.expires_at);
            }
            None => println!("{}", "❌ Failed to create user".red()),
        }
        Ok(created)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let user = self
            .client
            .get_user_by_id(user_id)
            .await
            .context("Error getting user")?;

        match &user {
            Some(user) => println!("{}", output::user_card(user)),
            None => println!("{}", format!("❌ User with ID {} not found", user_id).red()),
        }
        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = self
            .client
            .get_user_by_email(email)
            .await
            .context("Error getting user")?;

        match &user {
            Some(user) => println!("{}", output::user_card(user)),
            None => println!("{}", format!("❌ User with email {} not found", email).red()),
        }
        Ok(user)
    }

    pub async fn validate_token(&self, token: &str) -> Result<bool> {
        let validation = self
            .client
            .validate_token(token)
            .await
            .context("Error validating token")?;

        match validation.filter(|v| v.valid) {
            Some(v) => {
                let owner = v.user.unwrap_or_default();
                println!("{}", "✅ Token is valid".green());
                println!(
                    "   Belongs to: {} ({})",
                    owner.name.as_deref().unwrap_or("None"),
                    owner.email.as_deref().unwrap_or("None")
                );
                println!(
                    "   Expires: {}",
                    owner.token_expires.as_deref().unwrap_or("None")
                );
                Ok(true)
            }
            None => {
                println!("{}", "❌ Token is invalid or expired".red());
                Ok(false)
            }
        }
    }

    pub async fn refresh_token(
        &self,
        user_id: &str,
        token_hours: u32,
    ) -> Result<Option<RefreshedToken>> {
        let refreshed = self
            .client
            .refresh_token(user_id, token_hours)
            .await
            .context("Error refreshing token")?;

        match &refreshed {
            Some(token) => {
                println!("{}", "✅ Token refreshed successfully!".green());
                println!("   New Token: {}", token.new_token);
                println!("   Expires: {}", token.expires_at);
            }
            None => println!("{}", format!("❌ User with ID {} not found", user_id).red()),
        }
        Ok(refreshed)
    }

    pub async fn add_qa(
        &self,
        user_id: &str,
        question: &str,
        answer: &str,
    ) -> Result<Option<QaAdded>> {
        let added = self
            .client
            .add_qa(user_id, question, answer)
            .await
            .context("Error adding Q/A")?;

        match &added {
            Some(added) => {
                println!("{}", "✅ Q/A added to history!".green());
                println!("   Total history items: {}", added.total_history_items);
            }
            None => println!("{}", format!("❌ User with ID {} not found", user_id).red()),
        }
        Ok(added)
    }

    pub async fn show_history(&self, user_id: &str) -> Result<Option<UserHistory>> {
        let history = self
            .client
            .get_user_history(user_id, DEFAULT_HISTORY_LIMIT)
            .await
            .context("Error getting history")?;

        match &history {
            Some(h) if !h.history.is_empty() => {
                println!("📚 User history ({} items):", h.total());
                println!();
                println!("{}", output::history_table(&h.history));
            }
            Some(_) => println!("📚 User history is empty"),
            None => println!("{}", format!("❌ User with ID {} not found", user_id).red()),
        }
        Ok(history)
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<bool> {
        let deleted = self
            .client
            .delete_user(user_id)
            .await
            .context("Error deleting user")?;

        match deleted {
            Some(result) => {
                println!("{}", "✅ User deleted successfully!".green());
                if let Some(user) = result.deleted_user {
                    println!(
                        "   Deleted: {} ({})",
                        user.name.as_deref().unwrap_or("None"),
                        user.email.as_deref().unwrap_or("None")
                    );
                }
                Ok(true)
            }
            None => {
                println!("{}", format!("❌ User with ID {} not found", user_id).red());
                Ok(false)
            }
        }
    }

    pub async fn list_users(&self, limit: u32, skip: u32) -> Result<Option<serde_json::Value>> {
        let users = self
            .client
            .list_users(limit, skip)
            .await
            .context("Error listing users")?;

        match &users {
            Some(listing) => {
                println!("👥 List All Users:");
                let pretty = serde_json::to_string_pretty(listing)
                    .unwrap_or_else(|_| listing.to_string());
                for line in pretty.lines() {
                    println!("   {}", line);
                }
            }
            None => println!("{}", "❌ Error listing users".red()),
        }
        Ok(users)
    }

    /// Run the numbered menu until the user picks 0 or input ends.
    pub async fn interactive(&self, prompt: &mut dyn Prompt) -> Result<()> {
        println!("🚀 Welcome to the User Management CLI");
        println!("   Using Admin API: {}", self.client.base_url());
        println!("{}", "=".repeat(50));

        loop {
            println!();
            println!("Available commands:");
            for (n, choice) in MenuChoice::ALL.iter().enumerate().skip(1) {
                println!("  {}. {}", n, choice.label());
            }
            println!("  0. {}", MenuChoice::Exit.label());
            println!();

            let number = match prompt.number("Select an option", 0) {
                Ok(n) => n,
                Err(e) => {
                    debug!("Menu input ended: {:#}", e);
                    println!("\n👋 Goodbye!");
                    break;
                }
            };

            match MenuChoice::from_number(number) {
                Some(MenuChoice::Exit) => {
                    println!("👋 Goodbye!");
                    break;
                }
                Some(choice) => {
                    if let Err(e) = self.run_menu_action(choice, prompt).await {
                        println!("{}", format!("❌ {:#}", e).red());
                    }
                }
                None => println!("{}", "❌ Invalid option. Please try again.".red()),
            }

            if prompt.pause().await.is_err() {
                break;
            }
        }

        Ok(())
    }

    async fn run_menu_action(&self, choice: MenuChoice, prompt: &mut dyn Prompt) -> Result<()> {
        match choice {
            MenuChoice::Exit => Ok(()),
            MenuChoice::CreateUser => {
                section("📝 Create New User");
                let email = prompt.text("Email address", None)?;
                let name = prompt.text("Display name", None)?;
                let hours = prompt.number("Token validity (hours)", DEFAULT_TOKEN_HOURS)?;
                self.create_user(&email, &name, hours).await.map(drop)
            }
            MenuChoice::GetUserById => {
                section("🔍 Get User by ID");
                let user_id = prompt.text("User ID", None)?;
                self.get_user(&user_id).await.map(drop)
            }
            MenuChoice::GetUserByEmail => {
                section("🔍 Get User by Email");
                let email = prompt.text("Email address", None)?;
                self.get_user_by_email(&email).await.map(drop)
            }
            MenuChoice::ValidateToken => {
                section("🔐 Validate Token");
                let token = prompt.secret("Access token")?;
                self.validate_token(&token).await.map(drop)
            }
            MenuChoice::RefreshToken => {
                section("🔄 Refresh Token");
                let user_id = prompt.text("User ID", None)?;
                let hours = prompt.number("Token validity (hours)", DEFAULT_TOKEN_HOURS)?;
                self.refresh_token(&user_id, hours).await.map(drop)
            }
            MenuChoice::AddQa => {
                section("💬 Add Q/A to History");
                let user_id = prompt.text("User ID", None)?;
                let question = prompt.text("Question", None)?;
                let answer = prompt.text("Answer", None)?;
                self.add_qa(&user_id, &question, &answer).await.map(drop)
            }
            MenuChoice::ShowHistory => {
                section("📚 Show User History");
                let user_id = prompt.text("User ID", None)?;
                self.show_history(&user_id).await.map(drop)
            }
            MenuChoice::DeleteUser => {
                section("🗑️  Delete User");
                let user_id = prompt.text("User ID", None)?;
                if confirm_delete(prompt, &user_id)? {
                    self.delete_user(&user_id).await.map(drop)
                } else {
                    println!("Operation cancelled.");
                    Ok(())
                }
            }
            MenuChoice::ListUsers => {
                section("👥 List All Users");
                let limit = prompt.number("Limit (max users to show)", 50)?;
                let skip = prompt.number("Skip (users to skip)", 0)?;
                self.list_users(limit, skip).await.map(drop)
            }
        }
    }
}
