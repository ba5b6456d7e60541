//! Integration tests for the `labkeep` CLI binary.
//!
//! Argument parsing, help output, completions, and error exit codes run
//! without a server; the session round trip runs against wiremock.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `labkeep` binary with env isolation.
///
/// Clears all `LABKEEP_*` env vars and points config directories at
/// `home` so tests never touch the user's real configuration.
fn labkeep_cmd_in(home: &str) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("labkeep");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("LABKEEP_PROFILE")
        .env_remove("LABKEEP_API_URL")
        .env_remove("LABKEEP_ACCESS_KEY")
        .env_remove("LABKEEP_OUTPUT")
        .env_remove("LABKEEP_INSECURE")
        .env_remove("LABKEEP_TIMEOUT")
        .env_remove("LABKEEP_LOG_JSON");
    cmd
}

fn labkeep_cmd() -> assert_cmd::Command {
    labkeep_cmd_in("/tmp/labkeep-cli-test-nonexistent")
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Flags that let a command run without a config file. Port 9 is never
/// contacted by the tests that use these.
const OFFLINE: [&str; 4] = [
    "--api-url",
    "http://127.0.0.1:9",
    "--access-key",
    "test-key",
];

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = labkeep_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    labkeep_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("labs")
            .and(predicate::str::contains("machines"))
            .and(predicate::str::contains("tasks"))
            .and(predicate::str::contains("login")),
    );
}

#[test]
fn test_version_flag() {
    labkeep_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("labkeep"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    labkeep_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    labkeep_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = labkeep_cmd().arg("foobar").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("foobar"), "Expected subcommand in error:\n{text}");
}

#[test]
fn test_labs_list_without_config() {
    let output = labkeep_cmd().args(["labs", "list"]).output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("Configuration file not found"),
        "Expected missing-config error:\n{text}"
    );
}

#[test]
fn test_task_list_requires_a_scope() {
    labkeep_cmd()
        .args(["tasks", "list"])
        .args(OFFLINE)
        .assert()
        .code(2);
}

#[test]
fn test_impossible_check_date_is_a_usage_error() {
    let output = labkeep_cmd()
        .args(["machines", "check", "KEY-1", "31/02/2025"])
        .args(OFFLINE)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("last_checked"), "Expected field name:\n{text}");
}

#[test]
fn test_unknown_cleanliness_is_a_usage_error() {
    labkeep_cmd()
        .args(["machines", "clean", "KEY-1", "SUJO"])
        .args(OFFLINE)
        .assert()
        .code(2);
}

#[test]
fn test_task_list_without_login_is_an_auth_error() {
    let output = labkeep_cmd()
        .args(["tasks", "list", "--lab", "LAB01"])
        .args(OFFLINE)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("labkeep login"));
}

#[test]
fn test_logout_without_session() {
    labkeep_cmd()
        .arg("logout")
        .assert()
        .success()
        .stderr(predicate::str::contains("No stored session"));
}

#[test]
fn test_logout_rejects_path_like_profile() {
    let output = labkeep_cmd()
        .args(["logout", "--profile", "../outside"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("session file name"));
}

// ── Against a mock server ───────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_machines_list_plain_prints_keys() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lab/LAB01/machines"))
        .and(header("api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"machine_key": "KEY-1", "machine_name": "PC-01", "state_cleanliness": "BOM"},
            {"machine_key": "KEY-2", "machine_name": "PC-02", "state_cleanliness": "URGENTE"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    labkeep_cmd()
        .args(["machines", "list", "LAB01", "-o", "plain"])
        .args(["--api-url", &server.uri(), "--access-key", "test-key"])
        .assert()
        .success()
        .stdout("KEY-1\nKEY-2\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_persists_session_for_whoami() {
    let home = tempfile::tempdir().unwrap();
    let home_str = home.path().to_str().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .and(body_string_contains("username=prof"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok-123", "token_type": "bearer"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me/"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"user_id": 7, "username": "prof", "is_active": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let remote = ["--api-url", uri.as_str(), "--access-key", "test-key"];

    labkeep_cmd_in(home_str)
        .args(["login", "-u", "prof", "--password-stdin"])
        .args(remote)
        .write_stdin("s3cret\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Signed in as prof"));

    // No further requests: whoami reads the stored session
    labkeep_cmd_in(home_str)
        .args(["whoami", "-o", "plain"])
        .args(remote)
        .assert()
        .success()
        .stdout("prof\n");

    labkeep_cmd_in(home_str)
        .arg("logout")
        .assert()
        .success()
        .stderr(predicate::str::contains("Signed out"));
}
