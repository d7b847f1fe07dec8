// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Runs the launcher binaries against a stand-in delegate script.
#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Writes a fake `docpoc` that prints its arguments one per line and exits 7.
fn fake_delegate(dir: &Path) -> PathBuf {
    let path = dir.join("docpoc");
    std::fs::write(
        &path,
        "#!/bin/sh\nfor arg in \"$@\"; do echo \"ARG:$arg\"; done\nexit 7\n",
    )
    .unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn run(bin: &str, delegate: &Path, args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(bin);
    cmd.args(args)
        .env("DOCPOC_BIN", delegate)
        .env_remove("APP_API_TOKEN")
        .env_remove("DOCPOC_CONFIG_PATH")
        .env_remove("RUST_LOG");
    for (key, value) in env {
        cmd.env(key, value);
    }
    cmd.output().unwrap()
}

fn forwarded(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter_map(|l| l.strip_prefix("ARG:").map(str::to_string))
        .collect()
}

#[test]
fn test_agent_launcher_hints_without_token() {
    let dir = tempfile::tempdir().unwrap();
    let delegate = fake_delegate(dir.path());

    let output = run(env!("CARGO_BIN_EXE_docpoc-agent"), &delegate, &["--no-greeting"], &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("APP_API_TOKEN"));
    assert_eq!(forwarded(&output), ["agent", "--no-greeting"]);
    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn test_agent_launcher_quiet_with_token() {
    let dir = tempfile::tempdir().unwrap();
    let delegate = fake_delegate(dir.path());

    let output = run(
        env!("CARGO_BIN_EXE_docpoc-agent"),
        &delegate,
        &["--token", "secret value", "--url", "http://localhost:9000"],
        &[],
    );
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Tip"));
    assert_eq!(
        forwarded(&output),
        ["agent", "--token", "secret value", "--url", "http://localhost:9000"]
    );

    let output = run(
        env!("CARGO_BIN_EXE_docpoc-agent"),
        &delegate,
        &[],
        &[("APP_API_TOKEN", "tok")],
    );
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Tip"));
    assert_eq!(forwarded(&output), ["agent"]);
}

#[test]
fn test_admin_launcher_warns_when_api_down() {
    let dir = tempfile::tempdir().unwrap();
    let delegate = fake_delegate(dir.path());

    let output = run(
        env!("CARGO_BIN_EXE_docpoc-admin"),
        &delegate,
        &["get", "--email", "ada@example.com"],
        &[("DOCPOC_ADMIN_URL", "http://127.0.0.1:1")],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("Admin API is not reachable at http://127.0.0.1:1"));
    assert_eq!(forwarded(&output), ["admin", "get", "--email", "ada@example.com"]);
    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn test_missing_delegate_exits_127() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("not-there");

    let output = run(env!("CARGO_BIN_EXE_docpoc-agent"), &missing, &["-t", "x"], &[]);
    assert_eq!(output.status.code(), Some(127));
}
