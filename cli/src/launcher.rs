// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Launchers for the admin and agent commands
//!
//! A launcher prints at most one non-fatal advisory, then replaces itself
//! with `docpoc <subcommand> <args...>`. Arguments are forwarded untouched and
//! the launcher's exit status is the delegate's.
//!
//! - `docpoc-admin`: probes the Admin API `/health` and warns if it is down.
//! - `docpoc-agent`: hints at `APP_API_TOKEN` when no token is supplied.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;
use std::process::{Command, ExitCode};
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::config::TOKEN_ENV;

/// Overrides delegate discovery.
pub const DELEGATE_ENV: &str = "DOCPOC_BIN";
pub const DELEGATE_NAME: &str = "docpoc";
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Exit status when the delegate cannot be started, as a shell reports it.
pub const EXIT_NOT_FOUND: u8 = 127;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Could not locate the '{}' binary (set {} to its path)", DELEGATE_NAME, DELEGATE_ENV)]
    NotFound,

    #[error("Failed to run {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    AdminApiUnreachable { url: String },
    MissingToken,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::AdminApiUnreachable { url } => write!(
                f,
                "⚠️  Warning: Admin API is not reachable at {}. Start it before running admin commands.",
                url
            ),
            Advisory::MissingToken => write!(
                f,
                "💡 Tip: Set {} or pass --token/-t to authenticate with the API.",
                TOKEN_ENV
            ),
        }
    }
}

/// Best-effort GET on `{base_url}/health`; `Some` only when it fails.
pub async fn probe_admin_api(base_url: &str, timeout: Duration) -> Option<Advisory> {
    let base_url = base_url.trim_end_matches('/');
    let health_url = format!("{}/health", base_url);

    let reachable = match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => match client.get(&health_url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("Health probe {} failed: {}", health_url, e);
                false
            }
        },
        Err(e) => {
            debug!("Could not build probe client: {}", e);
            false
        }
    };

    (!reachable).then(|| Advisory::AdminApiUnreachable {
        url: base_url.to_string(),
    })
}

/// True when the arguments contain `--token`, `--token=...` or `-t`.
pub fn token_flag_present(args: &[OsString]) -> bool {
    args.iter().any(|arg| {
        let arg = arg.to_string_lossy();
        arg == "--token" || arg == "-t" || arg.starts_with("--token=")
    })
}

/// An empty environment value counts as unset.
pub fn agent_advisory(args: &[OsString], env_token: Option<&OsStr>) -> Option<Advisory> {
    let env_set = env_token.is_some_and(|v| !v.is_empty());
    (!env_set && !token_flag_present(args)).then_some(Advisory::MissingToken)
}

/// The program a launcher hands over to, plus the arguments it always passes first.
#[derive(Debug, Clone)]
pub struct Delegate {
    program: PathBuf,
    leading: Vec<OsString>,
}

impl Delegate {
    pub fn new<I, S>(program: impl Into<PathBuf>, leading: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            leading: leading.into_iter().map(Into::into).collect(),
        }
    }

    /// Find `docpoc`: `$DOCPOC_BIN`, then next to the running launcher, then `PATH`.
    pub fn resolve(subcommand: &str) -> Result<Self, LaunchError> {
        let program = std::env::var_os(DELEGATE_ENV)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or_else(sibling_binary)
            .or_else(|| which::which(DELEGATE_NAME).ok())
            .ok_or(LaunchError::NotFound)?;

        debug!("Delegating to {:?} {}", program, subcommand);
        Ok(Self::new(program, [subcommand]))
    }

    pub fn command(&self, args: &[OsString]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading).args(args);
        cmd
    }

    /// Replace the current process with the delegate. Returns only on failure.
    #[cfg(unix)]
    pub fn exec(&self, args: &[OsString]) -> LaunchError {
        use std::os::unix::process::CommandExt;

        let source = self.command(args).exec();
        LaunchError::Spawn {
            program: self.program.clone(),
            source,
        }
    }

    /// Run the delegate to completion and return its exit code.
    ///
    /// A delegate killed by a signal reports `128 + signal` on Unix.
    pub fn wait(&self, args: &[OsString]) -> Result<i32, LaunchError> {
        let status = self
            .command(args)
            .status()
            .map_err(|source| LaunchError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(code) = status.code() {
            return Ok(code);
        }

        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Ok(128 + signal);
            }
        }

        Ok(1)
    }

    /// Hand over to the delegate: `exec` on Unix, spawn-and-wait elsewhere.
    pub fn run(&self, args: &[OsString]) -> ExitCode {
        #[cfg(unix)]
        let result: Result<i32, LaunchError> = Err(self.exec(args));
        #[cfg(not(unix))]
        let result = self.wait(args);

        match result {
            Ok(code) => exit_code(code),
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::from(EXIT_NOT_FOUND)
            }
        }
    }
}

fn sibling_binary() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let candidate = exe
        .parent()?
        .join(format!("{}{}", DELEGATE_NAME, std::env::consts::EXE_SUFFIX));
    candidate.is_file().then_some(candidate)
}

/// Clamp a child's exit code into the `u8` range a process can return.
pub fn clamp_exit_code(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

pub fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(clamp_exit_code(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_token_flag_forms() {
        assert!(token_flag_present(&args(&["--token", "abc"])));
        assert!(token_flag_present(&args(&["--url", "x", "-t", "abc"])));
        assert!(token_flag_present(&args(&["--token=abc"])));
        assert!(!token_flag_present(&args(&["--no-greeting", "--tokens"])));
        assert!(!token_flag_present(&[]));
    }

    #[test]
    fn test_agent_advisory_only_without_any_token() {
        assert_eq!(agent_advisory(&[], None), Some(Advisory::MissingToken));
        assert_eq!(
            agent_advisory(&[], Some(OsStr::new(""))),
            Some(Advisory::MissingToken)
        );
        assert_eq!(agent_advisory(&[], Some(OsStr::new("tok"))), None);
        assert_eq!(agent_advisory(&args(&["--token", "tok"]), None), None);
    }

    #[test]
    fn test_advisory_messages_name_what_to_fix() {
        assert!(Advisory::MissingToken.to_string().contains("APP_API_TOKEN"));
        let warning = Advisory::AdminApiUnreachable {
            url: "http://127.0.0.1:8001".to_string(),
        };
        assert!(warning.to_string().contains("Admin API"));
        assert!(warning.to_string().contains("http://127.0.0.1:8001"));
    }

    #[tokio::test]
    async fn test_probe_reports_unreachable_api() {
        let advisory = probe_admin_api("http://127.0.0.1:1/", Duration::from_millis(500)).await;
        assert_eq!(
            advisory,
            Some(Advisory::AdminApiUnreachable {
                url: "http://127.0.0.1:1".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_probe_is_silent_when_healthy() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(200)
            .create_async()
            .await;

        assert_eq!(probe_admin_api(&server.url(), PROBE_TIMEOUT).await, None);
    }

    #[test]
    fn test_command_forwards_arguments_in_order() {
        let delegate = Delegate::new("/usr/bin/docpoc", ["agent"]);
        let cmd = delegate.command(&args(&["--url", "http://x", "-t", "a b", "--no-greeting"]));

        let forwarded: Vec<&OsStr> = cmd.get_args().collect();
        assert_eq!(
            forwarded,
            ["agent", "--url", "http://x", "-t", "a b", "--no-greeting"]
                .map(OsStr::new)
                .to_vec()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_wait_propagates_exit_code() {
        let delegate = Delegate::new("sh", ["-c", "exit \"$1\"", "sh"]);
        assert_eq!(delegate.wait(&args(&["3"])).unwrap(), 3);
        assert_eq!(delegate.wait(&args(&["0"])).unwrap(), 0);
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let delegate = Delegate::new("/nonexistent/docpoc", Vec::<OsString>::new());
        assert!(matches!(
            delegate.wait(&[]),
            Err(LaunchError::Spawn { .. })
        ));
    }

    #[test]
    fn test_exit_code_clamps_out_of_range() {
        assert_eq!(clamp_exit_code(3), 3);
        assert_eq!(clamp_exit_code(-1), 1);
        assert_eq!(clamp_exit_code(300), 1);
    }
}
