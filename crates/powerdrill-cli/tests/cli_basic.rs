//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary and verify outputs. Each test that touches
//! configuration gets its own HOME so nothing leaks between runs.

use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command with `home` as HOME and return (stdout, stderr, code).
fn run_cli_in(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_powerdrill"))
        .args(args)
        .env("HOME", home)
        .env_remove("POWERDRILL_ENV")
        .env_remove("POWERDRILL_LOG")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli(args: &[&str]) -> (String, String, i32) {
    let home = tempfile::tempdir().expect("tempdir");
    run_cli_in(home.path(), args)
}

#[test]
fn test_reward_breakpoints() {
    let (out, _, code) = run_cli(&["reward", "12", "20"]);
    assert_eq!(code, 0);
    assert_eq!(out.trim(), "15");

    let (out, _, _) = run_cli(&["reward", "16", "20"]);
    assert_eq!(out.trim(), "30");

    let (out, _, _) = run_cli(&["reward", "20", "20"]);
    assert_eq!(out.trim(), "60");

    let (out, _, _) = run_cli(&["reward", "11", "20"]);
    assert_eq!(out.trim(), "0");
}

#[test]
fn test_reward_rejects_impossible_score() {
    let (_, err, code) = run_cli(&["reward", "5", "4"]);
    assert_ne!(code, 0);
    assert!(err.contains("cannot exceed"), "stderr: {err}");
}

#[test]
fn test_rewards_table() {
    let (out, _, code) = run_cli(&["rewards"]);
    assert_eq!(code, 0);
    assert_eq!(out.lines().count(), 4);
    assert!(out.contains("1 full hour"));
}

#[test]
fn test_simulate_perfect_squares_json() {
    let (out, _, code) = run_cli(&[
        "simulate", "squares", "--seed", "7", "--accuracy", "1.0", "--think-ms", "1000", "--json",
    ]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&out).expect("valid JSON");
    assert_eq!(json["seed"], 7);
    assert_eq!(json["summary"]["score"], 20);
    assert_eq!(json["summary"]["total"], 20);
    assert_eq!(json["summary"]["reward_minutes"], 60);
    assert_eq!(json["summary"]["reason"], "done");
}

#[test]
fn test_simulate_is_reproducible() {
    let args = ["simulate", "cubes", "--seed", "31", "--json"];
    let (a, _, _) = run_cli(&args);
    let (b, _, _) = run_cli(&args);
    let a: serde_json::Value = serde_json::from_str(&a).unwrap();
    let b: serde_json::Value = serde_json::from_str(&b).unwrap();
    assert_eq!(a["summary"]["score"], b["summary"]["score"]);
    assert_eq!(a["summary"]["wrong"], b["summary"]["wrong"]);
}

#[test]
fn test_simulate_events_output() {
    let (out, _, code) = run_cli(&[
        "simulate", "cubes", "--seed", "3", "--accuracy", "0", "--json", "--events",
    ]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    let events = json["events"].as_array().unwrap();
    assert_eq!(events.first().unwrap()["type"], "RoundStarted");
    assert_eq!(events.last().unwrap()["type"], "RoundEnded");
    assert_eq!(json["summary"]["score"], 0);
}

#[test]
fn test_simulate_rejects_bad_accuracy() {
    let (_, _, code) = run_cli(&["simulate", "squares", "--accuracy", "1.5"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_roundtrip() {
    let home = tempfile::tempdir().unwrap();

    let (out, _, code) = run_cli_in(home.path(), &["config", "get", "gate.countdown"]);
    assert_eq!(code, 0);
    assert_eq!(out.trim(), "true");

    let (_, _, code) = run_cli_in(home.path(), &["config", "set", "gate.countdown", "false"]);
    assert_eq!(code, 0);
    let (out, _, _) = run_cli_in(home.path(), &["config", "get", "gate.countdown"]);
    assert_eq!(out.trim(), "false");

    assert!(home.path().join(".config/powerdrill/config.toml").exists());

    let (_, _, code) = run_cli_in(home.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (out, _, _) = run_cli_in(home.path(), &["config", "list"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["gate"]["countdown"], true);
    assert_eq!(json["pacing"]["wrong_delay_ms"], 1600);
}

#[test]
fn test_config_seed_can_be_cleared() {
    let home = tempfile::tempdir().unwrap();

    let (_, _, code) = run_cli_in(home.path(), &["config", "set", "seed", "42"]);
    assert_eq!(code, 0);
    let (out, _, _) = run_cli_in(home.path(), &["config", "get", "seed"]);
    assert_eq!(out.trim(), "42");

    let (_, err, code) = run_cli_in(home.path(), &["config", "set", "seed", "none"]);
    assert_eq!(code, 0, "stderr: {err}");
    let (out, _, _) = run_cli_in(home.path(), &["config", "get", "seed"]);
    assert_eq!(out.trim(), "none");
}

#[test]
fn test_config_unknown_key_fails() {
    let (_, err, code) = run_cli(&["config", "get", "pacing.nope"]);
    assert_ne!(code, 0);
    assert!(err.contains("unknown key"));

    let (_, _, code) = run_cli(&["config", "set", "pacing.nope", "1"]);
    assert_ne!(code, 0);
}

#[test]
fn test_play_with_closed_stdin_ends_cleanly() {
    let (out, _, code) = run_cli(&["play", "cubes", "--seed", "1", "--no-countdown"]);
    assert_eq!(code, 0);
    assert!(out.contains("Mode: Cubes (1–12)"));
    assert!(out.contains("Score: 0 / 0"));
}

#[test]
fn test_completions() {
    let (out, _, code) = run_cli(&["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(out.contains("powerdrill"));
}
