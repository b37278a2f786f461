//! Integration tests for the `sphere` CLI binary.
//!
//! Parsing, help, completions and error paths run without a service. The
//! service-bound tests stand up a wiremock server and point `--api-url` at it.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `sphere` binary with env isolation.
///
/// Clears all `SPHERE_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn sphere_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("sphere");
    cmd.env("HOME", "/tmp/sphere-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/sphere-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("SPHERE_PROFILE")
        .env_remove("SPHERE_API_URL")
        .env_remove("SPHERE_TOKEN")
        .env_remove("SPHERE_API_KEY")
        .env_remove("SPHERE_OUTPUT")
        .env_remove("SPHERE_INSECURE")
        .env_remove("SPHERE_TIMEOUT");
    cmd
}

/// Same as [`sphere_cmd`], with config directories under `home`.
fn sphere_cmd_in(home: &Path) -> assert_cmd::Command {
    let mut cmd = sphere_cmd();
    cmd.env("HOME", home).env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

/// Write `contents` to wherever the binary expects its config under `home`.
fn write_config(home: &Path, contents: &str) {
    let output = sphere_cmd_in(home).args(["config", "path"]).output().unwrap();
    assert!(output.status.success());
    let path = PathBuf::from(String::from_utf8(output.stdout).unwrap().trim());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

/// Same as [`sphere_cmd`], already pointed at `uri` with a bearer token.
fn service_cmd(uri: &str) -> assert_cmd::Command {
    let mut cmd = sphere_cmd();
    cmd.args(["--api-url", uri, "--token", "test-token"]);
    cmd
}

/// Run a command off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn record_json(id: i64, uuid: &str, title: &str, conference_date: &str) -> serde_json::Value {
    json!({
        "id": id,
        "uuid": uuid,
        "title": title,
        "description": "Peer-reviewed track",
        "publicationType": "Conference",
        "paperSubmissionDate": "2024-03-15",
        "conferenceDate": conference_date,
        "location": "Colombo",
        "externalLink": null,
        "conferenceRank": "A"
    })
}

async fn mount_listing(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/publications"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = sphere_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    sphere_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("publications")
            .and(predicate::str::contains("list"))
            .and(predicate::str::contains("purge-expired")),
    );
}

#[test]
fn test_version_flag() {
    sphere_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sphere"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    sphere_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    sphere_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = sphere_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_list_without_service_configured() {
    sphere_cmd()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No publications service configured"));
}

#[test]
fn test_api_url_without_credentials() {
    sphere_cmd()
        .args(["list", "--api-url", "http://127.0.0.1:9"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No credentials"));
}

#[test]
fn test_token_and_api_key_conflict() {
    sphere_cmd()
        .args(["list", "--token", "a", "--api-key", "b"])
        .assert()
        .code(2);
}

#[test]
fn test_create_missing_fields_fails_before_any_request() {
    // Port 9 is never contacted: validation rejects the form first.
    service_cmd("http://127.0.0.1:9")
        .args(["create", "--title", "Only a title"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("publicationType"));
}

#[test]
fn test_create_bad_date_is_usage_error() {
    service_cmd("http://127.0.0.1:9")
        .args(["create", "--conference-date", "01/07/2024"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

#[test]
fn test_date_flags_reject_timestamps() {
    service_cmd("http://127.0.0.1:9")
        .args(["purge-expired", "--today", "2024-06-01T00:00:00Z", "--dry-run"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("YYYY-MM-DD"));
}

#[test]
fn test_config_path() {
    let output = sphere_cmd().args(["config", "path"]).output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("config.toml"));
}

#[test]
fn test_config_show_without_file() {
    sphere_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_config_show_masks_profile_token() {
    let home = tempfile::tempdir().unwrap();
    write_config(
        home.path(),
        r#"
default_profile = "lab"

[profiles.lab]
api_url = "https://sphere.example.org/api"
token = "plaintext-secret"
timeout = 5
"#,
    );

    sphere_cmd_in(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[profiles.lab]")
                .and(predicate::str::contains("token = \"****\""))
                .and(predicate::str::contains("plaintext-secret").not()),
        );
}

#[test]
fn test_unknown_profile_lists_available_ones() {
    let home = tempfile::tempdir().unwrap();
    write_config(
        home.path(),
        "[profiles.lab]\napi_url = \"https://sphere.example.org\"\n",
    );

    sphere_cmd_in(home.path())
        .args(["list", "--profile", "prod"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile 'prod' not found"));
}

// ── Against a mock service ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_list_through_configured_profile() {
    let server = MockServer::start().await;
    mount_listing(&server, json!([record_json(1, "u-1", "Profiled", "2024-07-01")])).await;

    let home = tempfile::tempdir().unwrap();
    write_config(
        home.path(),
        &format!(
            "default_profile = \"lab\"\n\n[profiles.lab]\napi_url = \"{}\"\ntoken_env = \"CLI_TEST_PUBLICATIONS_TOKEN\"\n",
            server.uri()
        ),
    );

    let mut cmd = sphere_cmd_in(home.path());
    cmd.env("CLI_TEST_PUBLICATIONS_TOKEN", "test-token")
        .args(["list", "-o", "plain"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "u-1\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_search_json() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        json!([
            record_json(1, "u-1", "Tech Innovate 2024", "2024-07-01"),
            record_json(2, "u-2", "Data Summit", "2024-09-10"),
        ]),
    )
    .await;

    let mut cmd = service_cmd(&server.uri());
    cmd.args(["list", "--search", "TECH", "-o", "json"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["uuid"], "u-1");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_plain_preserves_server_order() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        json!([
            record_json(2, "u-2", "Second", "2024-09-10"),
            record_json(1, "u-1", "First", "2024-07-01"),
        ]),
    )
    .await;

    let mut cmd = service_cmd(&server.uri());
    cmd.args(["list", "-o", "plain"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "u-2\nu-1\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_with_yes() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        json!([record_json(5, "u-5", "Old Conference", "2023-01-01")]),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/publication/u-5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = service_cmd(&server.uri());
    cmd.args(["delete", "u-5", "--yes"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("✓"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_without_yes_refuses_when_not_interactive() {
    let server = MockServer::start().await;
    mount_listing(&server, json!([record_json(5, "u-5", "Kept", "2024-07-01")])).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = service_cmd(&server.uri());
    cmd.args(["delete", "u-5"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("--yes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_unknown_uuid_is_not_found() {
    let server = MockServer::start().await;
    mount_listing(&server, json!([record_json(5, "u-5", "Kept", "2024-07-01")])).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = service_cmd(&server.uri());
    cmd.args(["delete", "nope", "--yes"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("nope"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_purge_expired_dry_run_lists_only_past_conferences() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        json!([
            record_json(1, "u-past", "Past", "2024-01-01"),
            record_json(2, "u-future", "Future", "2024-12-01"),
        ]),
    )
    .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let mut cmd = service_cmd(&server.uri());
    cmd.args(["purge-expired", "--today", "2024-06-01", "--dry-run", "-o", "plain"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "u-past\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_replaces_unreadable_stored_date() {
    let server = MockServer::start().await;
    mount_listing(&server, json!([record_json(3, "u-3", "Undecided", "TBD")])).await;
    Mock::given(method("PUT"))
        .and(path("/publication/u-3"))
        .and(body_partial_json(json!({
            "uuid": "u-3",
            "conferenceDate": "2024-11-20",
            "paperSubmissionDate": "2024-03-15"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(record_json(3, "u-3", "Undecided", "2024-11-20")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = service_cmd(&server.uri());
    cmd.args(["update", "u-3", "--conference-date", "2024-11-20"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unauthorized_listing_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/publications"))
        .respond_with(ResponseTemplate::new(401).set_body_string("expired token"))
        .mount(&server)
        .await;

    let mut cmd = service_cmd(&server.uri());
    cmd.arg("list");
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(3), "{}", combined_output(&output));
}
