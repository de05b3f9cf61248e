// tests/common/mod.rs
// Shared test utilities for integration tests
#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Sample server log with a preamble line and three matches
pub const SAMPLE_LOG: &str = include_str!("../data/qgames.log");

fn quakelog_command(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_quakelog"));
    cmd.args(args)
        // Keep the developer's config files out of test runs
        .arg("--ignore-config")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper function to run quakelog with given arguments and input via stdin
pub fn run_quakelog_with_input(args: &[&str], input: &str) -> (String, String, i32) {
    let mut child = quakelog_command(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start quakelog");

    if let Some(stdin) = child.stdin.as_mut() {
        stdin
            .write_all(input.as_bytes())
            .expect("Failed to write to stdin");
    }

    let output = child.wait_with_output().expect("Failed to read output");
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Helper function to run quakelog on a file
pub fn run_quakelog_with_file(args: &[&str], path: &Path) -> (String, String, i32) {
    let mut full_args = args.to_vec();
    full_args.push(path.to_str().expect("temp path should be UTF-8"));

    let output = quakelog_command(&full_args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute quakelog");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Run quakelog with config loading enabled, isolated to `home`.
/// HOME, XDG_CONFIG_HOME and the working directory all point inside it.
pub fn run_quakelog_in_home(args: &[&str], home: &Path) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_quakelog"))
        .args(args)
        .current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute quakelog");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Write `content` to `name` inside a fresh temp dir
pub fn temp_log(name: &str, content: &[u8]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write temp file");
    (dir, path)
}

/// Parse quakelog's stdout as a JSON array
pub fn parse_report(stdout: &str) -> Vec<serde_json::Value> {
    let value: serde_json::Value =
        serde_json::from_str(stdout).expect("stdout should be a JSON report");
    value
        .as_array()
        .expect("report should be a JSON array")
        .clone()
}
