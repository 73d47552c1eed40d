//! Integration tests for the shimtrace binary
//!
//! These tests drive the CLI end to end:
//! - Replaying probe scripts (text and JSON output)
//! - Dispatching structured and raw events
//! - Listener failure propagation
//! - Policy inspection under different configs

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const PLAYER_SCRIPT: &str = r#"type: Windows.Media.Playback.MediaPlayer
identity: MediaPlayer
members:
  volume: 0.5
  source: null
  play: { fn: play }
  _handle: 3
steps:
  - get: volume
  - get: source
  - get: playbackSession
  - get: _handle
  - set: { member: volume, value: 1 }
  - call: play
"#;

/// Helper to get the shimtrace binary path
fn shimtrace_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_shimtrace"))
}

/// Helper to run shimtrace isolated from any user config
fn run_shimtrace(dir: &Path, args: &[&str]) -> Output {
    Command::new(shimtrace_binary())
        .current_dir(dir)
        .env("SHIMTRACE_DIR", dir)
        .env_remove("SHIMTRACE_CONFIG")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute shimtrace")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Helper to write a shimtrace.yaml into the isolated config dir
fn write_config(dir: &Path, content: &str) {
    fs::write(dir.join("shimtrace.yaml"), content).unwrap();
}

#[test]
fn test_probe_json_report() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("player.yaml");
    fs::write(&script, PLAYER_SCRIPT).unwrap();

    let output = run_shimtrace(temp.path(), &["probe", script.to_str().unwrap(), "-o", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let reports: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let report = &reports[0];
    assert_eq!(report["identity"], "MediaPlayer");
    assert_eq!(report["steps"], 6);
    assert_eq!(report["errors"], 1);
    assert_eq!(report["warnings"], 1);
    assert_eq!(report["infos"], 3);

    let lines: Vec<&str> = report["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["line"].as_str().unwrap())
        .collect();
    assert_eq!(
        lines,
        vec![
            "get: MediaPlayer.volume -> 0.5",
            "get: MediaPlayer.source -> null",
            "get: MediaPlayer.playbackSession -> undefined",
            "set: MediaPlayer.volume -> 1",
            "get: MediaPlayer.play -> play",
        ]
    );
    assert_eq!(report["records"][2]["severity"], "error");
}

#[test]
fn test_probe_text_streams_access_lines() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), "output:\n  color: false\n");
    let probes = temp.path().join("probes");
    fs::create_dir_all(&probes).unwrap();
    fs::write(probes.join("player.yaml"), PLAYER_SCRIPT).unwrap();

    let output = run_shimtrace(temp.path(), &["probe", probes.to_str().unwrap(), "-o", "text"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let err = stderr(&output);
    assert!(err.contains("[error] get: MediaPlayer.playbackSession -> undefined"));
    assert!(err.contains("[warning] get: MediaPlayer.source -> null"));
    assert!(err.contains("[info] set: MediaPlayer.volume -> 1"));
    assert!(!err.contains("_handle"));
    assert!(stdout(&output).contains("MediaPlayer"));
}

#[test]
fn test_probe_permissive_config_logs_private_members() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), "policy:\n  mode: permissive\n");
    let script = temp.path().join("player.yaml");
    fs::write(&script, PLAYER_SCRIPT).unwrap();

    let output = run_shimtrace(temp.path(), &["probe", script.to_str().unwrap(), "-o", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let reports: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(reports[0]["warnings"], 0);
    assert_eq!(reports[0]["records"].as_array().unwrap().len(), 6);
}

#[test]
fn test_probe_empty_directory_fails() {
    let temp = TempDir::new().unwrap();
    let empty = temp.path().join("empty");
    fs::create_dir_all(&empty).unwrap();

    let output = run_shimtrace(temp.path(), &["probe", empty.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("No probe scripts found"));
}

#[test]
fn test_dispatch_structured_in_order() {
    let temp = TempDir::new().unwrap();
    let output = run_shimtrace(temp.path(), &["dispatch", "x", "--fields", r#"{"a":1}"#, "-n", "3"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    for (idx, line) in lines.iter().enumerate() {
        assert!(line.starts_with(&format!("listener #{} <- ", idx)), "{}", line);
        assert!(line.contains(r#""name":"x""#));
        assert!(line.contains(r#""detail":{"a":1}"#));
        assert!(line.contains(r#""a":1"#));
    }
}

#[test]
fn test_dispatch_detail_field_overrides() {
    let temp = TempDir::new().unwrap();
    let output = run_shimtrace(temp.path(), &["dispatch", "x", "--fields", r#"{"detail":"override"}"#]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains(r#""detail":"override""#));
}

#[test]
fn test_dispatch_raw_passes_payload_through() {
    let temp = TempDir::new().unwrap();
    let output = run_shimtrace(temp.path(), &["dispatch", "y", "--raw", "--fields", "[1,2]", "-n", "2"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "listener #0 <- [1,2]\nlistener #1 <- [1,2]\n");
}

#[test]
fn test_dispatch_failure_stops_remaining_listeners() {
    let temp = TempDir::new().unwrap();
    let output = run_shimtrace(temp.path(), &["dispatch", "x", "-n", "3", "--fail-at", "1"]);

    assert!(!output.status.success());
    let out = stdout(&output);
    assert!(out.contains("listener #0"));
    assert!(!out.contains("listener #1"));
    assert!(!out.contains("listener #2"));
    assert!(stderr(&output).contains("failed on purpose"));
}

#[test]
fn test_dispatch_rejects_non_object_fields() {
    let temp = TempDir::new().unwrap();
    let output = run_shimtrace(temp.path(), &["dispatch", "x", "--fields", "42"]);
    assert!(!output.status.success());
}

#[test]
fn test_policy_check() {
    let temp = TempDir::new().unwrap();
    let output = run_shimtrace(
        temp.path(),
        &["policy", "check", "volume", "_handle", "then", "Symbol.toPrimitive"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("volume (loggable)"));
    assert!(out.contains("_handle (private by convention)"));
    assert!(out.contains("then (excluded)"));
    assert!(out.contains("Symbol.toPrimitive (meta symbol)"));
}

#[test]
fn test_policy_show_json_uses_config() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), "policy:\n  mode: permissive\n  extra_exclusions: [width]\n");

    let output = run_shimtrace(temp.path(), &["policy", "show", "-o", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let view: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(view["mode"], "permissive");
    assert!(view["private_prefix"].is_null());
    let exclusions = view["exclusions"].as_array().unwrap();
    assert_eq!(exclusions.len(), 7);
    assert!(exclusions.contains(&serde_json::json!("targetElement")));
    assert!(exclusions.contains(&serde_json::json!("width")));
}

#[test]
fn test_config_get_unknown_key_fails() {
    let temp = TempDir::new().unwrap();
    let output = run_shimtrace(temp.path(), &["config", "get", "nope"]);
    assert!(!output.status.success());

    let output = run_shimtrace(temp.path(), &["config", "get", "policy.mode"]);
    assert_eq!(stdout(&output).trim(), "strict");
}

#[test]
fn test_probe_text_prints_each_access_once_with_debug_logging() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), "output:\n  color: false\n");
    let script = temp.path().join("player.yaml");
    fs::write(&script, PLAYER_SCRIPT).unwrap();

    let output = Command::new(shimtrace_binary())
        .current_dir(temp.path())
        .env("SHIMTRACE_DIR", temp.path())
        .env_remove("SHIMTRACE_CONFIG")
        .env("RUST_LOG", "debug")
        .args(["probe", script.to_str().unwrap(), "-o", "text"])
        .output()
        .expect("Failed to execute shimtrace");
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let err = stderr(&output);
    assert_eq!(err.matches("get: MediaPlayer.playbackSession -> undefined").count(), 1);
    assert_eq!(err.matches("set: MediaPlayer.volume -> 1").count(), 1);
}
