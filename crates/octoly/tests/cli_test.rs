//! Integration tests for the `octoly` CLI binary.
//!
//! Argument parsing, help output and shell completions run without a
//! server; the end-to-end cases drive the binary against a wiremock
//! Octopus API.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `octoly` binary with env isolation.
///
/// Clears the `OCTOLY_*` / `OCTOPUS_*` env vars and points config
/// directories at a nonexistent path so tests never touch the user's
/// real configuration.
fn octoly_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("octoly");
    cmd.env("HOME", "/tmp/octoly-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/octoly-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("OCTOLY_PROFILE")
        .env_remove("OCTOLY_OUTPUT")
        .env_remove("OCTOLY_INSECURE")
        .env_remove("OCTOLY_TIMEOUT")
        .env_remove("OCTOLY_AZURE_SECRET")
        .env_remove("OCTOPUS_URL")
        .env_remove("OCTOPUS_SPACE")
        .env_remove("OCTOPUS_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

/// `octoly` pointed at `server` with a test API key.
fn against(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = octoly_cmd();
    cmd.args(["--server", &server.uri(), "--api-key", "API-TEST"]);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn page(items: &serde_json::Value) -> serde_json::Value {
    let total = items.as_array().map_or(0, Vec::len);
    json!({ "Items": items, "TotalResults": total, "ItemsPerPage": 100 })
}

/// A runtime that serves the mock server from background worker threads
/// while the test blocks on the child process.
fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap()
}

/// A server that accepts `API-TEST` and knows the `Default` space.
async fn octopus() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/me"))
        .and(header("X-Octopus-ApiKey", "API-TEST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Id": "Users-1",
            "Username": "ci"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/spaces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(&json!([
            { "Id": "Spaces-1", "Name": "Default", "IsDefault": true },
            { "Id": "Spaces-2", "Name": "Default Archive" }
        ]))))
        .mount(&server)
        .await;

    server
}

fn accounts() -> serde_json::Value {
    json!([
        {
            "Id": "Accounts-1",
            "Name": "azure-prod",
            "AccountType": "AzureServicePrincipal",
            "SpaceId": "Spaces-1",
            "TenantedDeploymentParticipation": "Untenanted"
        },
        {
            "Id": "Accounts-3",
            "Name": "aws-dev",
            "AccountType": "AmazonWebServicesAccount",
            "SpaceId": "Spaces-1",
            "TenantedDeploymentParticipation": "Tenanted"
        }
    ])
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = octoly_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    octoly_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Octopus Deploy")
            .and(predicate::str::contains("accounts"))
            .and(predicate::str::contains("certificates"))
            .and(predicate::str::contains("lifecycles")),
    );
}

#[test]
fn test_version_flag() {
    octoly_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("octoly"));
}

#[test]
fn test_get_help_lists_selection_modes() {
    octoly_cmd()
        .args(["tag-sets", "get", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--all")
                .and(predicate::str::contains("--names"))
                .and(predicate::str::contains("--where")),
        );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    octoly_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    octoly_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases without a server ────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = octoly_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_accounts_get_without_config() {
    let output = octoly_cmd()
        .args(["accounts", "get", "--all"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(
        text.contains("No server configured"),
        "Expected missing config hint:\n{text}"
    );
}

#[test]
fn test_server_without_api_key() {
    let output = octoly_cmd()
        .args(["--server", "https://octopus.invalid", "users", "get", "--all"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("No credentials"));
}

#[test]
fn test_unknown_profile() {
    let output = octoly_cmd()
        .args(["--profile", "staging", "connect"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Profile 'staging' not found"));
}

// ── Selection validation: rejected before any request ───────────────
//
// Matches on error identifiers; message text may be wrapped by the
// diagnostic renderer.

fn assert_rejected_without_requests(args: &[&str], expected: &str) {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        server
    });

    let output = against(&server).args(args).output().unwrap();
    let text = combined_output(&output);
    assert_eq!(output.status.code(), Some(2), "unexpected exit:\n{text}");
    assert!(text.contains(expected), "Expected '{expected}' in:\n{text}");

    rt.block_on(server.verify());
}

#[test]
fn test_get_without_selection_mode() {
    assert_rejected_without_requests(&["accounts", "get"], "GetAccount-Configuration");
}

#[test]
fn test_get_with_two_selection_modes() {
    assert_rejected_without_requests(
        &["certificates", "get", "--all", "--name", "wildcard"],
        "GetCertificate-Configuration",
    );
}

#[test]
fn test_filter_without_first_or_many() {
    assert_rejected_without_requests(
        &["lifecycles", "get", "--all", "--where", "Name=Default"],
        "GetLifecycle-Configuration",
    );
}

#[test]
fn test_malformed_filter() {
    assert_rejected_without_requests(
        &["users", "get", "--many", "--where", "IsActive"],
        "invalid filter",
    );
}

// ── End-to-end against a mock server ────────────────────────────────

#[test]
fn test_accounts_get_all_json() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = octopus().await;
        Mock::given(method("GET"))
            .and(path("/api/Spaces-1/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(&accounts())))
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    let output = against(&server)
        .args(["accounts", "get", "--all", "-o", "json-compact"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["Name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["azure-prod", "aws-dev"]);

    rt.block_on(server.verify());
}

#[test]
fn test_accounts_get_many_with_filter_plain() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = octopus().await;
        Mock::given(method("GET"))
            .and(path("/api/Spaces-1/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(&accounts())))
            .mount(&server)
            .await;
        server
    });

    against(&server)
        .args([
            "accounts",
            "get",
            "--many",
            "-w",
            "TenantedDeploymentParticipation=tenanted",
            "-o",
            "plain",
        ])
        .assert()
        .success()
        .stdout("Accounts-3\n");
}

#[test]
fn test_get_by_name_not_found() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = octopus().await;
        Mock::given(method("GET"))
            .and(path("/api/Spaces-1/certificates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(&json!([]))))
            .mount(&server)
            .await;
        server
    });

    let output = against(&server)
        .args(["certificates", "get", "--name", "wildcard"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("GetCertificate-NotFound"));
}

#[test]
fn test_unknown_space_is_not_found() {
    let rt = runtime();
    let server = rt.block_on(octopus());

    let output = against(&server)
        .args(["--space", "Nowhere", "tag-sets", "get", "--all"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("GetTagSet-NotFound"));
}

#[test]
fn test_rejected_api_key_exits_with_auth_code() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        server
    });

    let output = against(&server).arg("connect").output().unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("TestConnection-Authentication"));
}

#[test]
fn test_connect_reports_space() {
    let rt = runtime();
    let server = rt.block_on(octopus());

    against(&server)
        .args(["connect", "-o", "plain"])
        .assert()
        .success()
        .stdout("Spaces-1\n");
}

#[test]
fn test_users_ignore_space_segment() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = octopus().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(&json!([
                { "Id": "Users-1", "Username": "ci", "IsService": true }
            ]))))
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    against(&server)
        .args(["users", "get", "--all", "-o", "plain"])
        .assert()
        .success()
        .stdout("Users-1\n");

    rt.block_on(server.verify());
}

#[test]
fn test_remove_requires_yes_when_not_interactive() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = octopus().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        server
    });

    let output = against(&server)
        .args(["accounts", "remove", "Accounts-3"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));

    rt.block_on(server.verify());
}

#[test]
fn test_remove_by_id_with_yes() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = octopus().await;
        Mock::given(method("DELETE"))
            .and(path("/api/Spaces-1/accounts/Accounts-3"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    against(&server)
        .args(["accounts", "remove", "Accounts-3", "--yes", "-o", "plain"])
        .assert()
        .success()
        .stdout("Accounts-3\n")
        .stderr(predicate::str::contains("Removed account Accounts-3"));

    rt.block_on(server.verify());
}

#[test]
fn test_new_from_file_conflict() {
    let rt = runtime();
    let server = rt.block_on(async {
        let server = octopus().await;
        Mock::given(method("POST"))
            .and(path("/api/Spaces-1/lifecycles"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ErrorMessage": "There was a problem with your request.",
                "Errors": ["The lifecycle name 'Hotfix' is already in use."]
            })))
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(
        &mut file,
        json!({ "Name": "Hotfix", "Phases": [] }).to_string().as_bytes(),
    )
    .unwrap();

    let output = against(&server)
        .args(["lifecycles", "new", "--yes", "--from-file"])
        .arg(file.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(6));
    assert!(combined_output(&output).contains("NewLifecycle-Conflict"));

    rt.block_on(server.verify());
}
