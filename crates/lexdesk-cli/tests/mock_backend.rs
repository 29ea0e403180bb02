//! CLI tests against a mock backend.
//!
//! The binary runs as a child process, so the mock server needs the
//! multi-threaded runtime to keep serving while the test thread waits.

mod common;

use common::{Sandbox, run_cli, run_cli_success, stderr};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn help_lists_commands() {
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_lexdesk"))
        .arg("--help")
        .output()
        .expect("Failed to execute CLI");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["login", "logout", "whoami", "refresh-token", "list", "request"] {
        assert!(stdout.contains(command), "missing {command} in help");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn login_creates_session_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .and(body_json(json!({"username": "avery", "password": "hunter2"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access": "a1", "refresh": "r1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sandbox = Sandbox::new();
    run_cli_success(
        &["login", "--username", "avery", "--password", "hunter2"],
        &sandbox,
        &server.uri(),
    );

    let stored = sandbox.stored().expect("session file written");
    assert_eq!(stored["accessToken"], "a1");
    assert_eq!(stored["refreshToken"], "r1");
}

#[tokio::test(flavor = "multi_thread")]
async fn login_with_bad_password_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "No active account found"})),
        )
        .mount(&server)
        .await;

    let sandbox = Sandbox::new();
    let output = run_cli(
        &["login", "--username", "avery", "--password", "wrong"],
        &sandbox,
        &server.uri(),
    );

    assert!(!output.status.success());
    assert!(stderr(&output).contains("No active account found"));
    assert!(sandbox.stored().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn list_refreshes_expired_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/case/"))
        .and(header("authorization", "Bearer expired-abc"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .and(body_json(json!({"refresh": "valid-xyz"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "fresh-123"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/case/"))
        .and(header("authorization", "Bearer fresh-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Estate of Harlow"},
            {"id": 2, "title": "Birch v. Linden"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let sandbox = Sandbox::new();
    sandbox.seed("expired-abc", "valid-xyz");

    let stdout = run_cli_success(&["list", "case"], &sandbox, &server.uri());
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Estate of Harlow"));

    let stored = sandbox.stored().expect("session kept");
    assert_eq!(stored["accessToken"], "fresh-123");
    assert_eq!(stored["refreshToken"], "valid-xyz");
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_refresh_ends_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/invoice/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Token is blacklisted"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let sandbox = Sandbox::new();
    sandbox.seed("stale", "revoked");

    let output = run_cli(&["list", "invoice"], &sandbox, &server.uri());

    assert!(!output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains("Session expired. Please log in again."));
    assert!(stderr.contains("lexdesk login"));
    assert!(!sandbox.session_path().exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn list_without_session_requires_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let sandbox = Sandbox::new();
    let output = run_cli(&["list", "case"], &sandbox, &server.uri());

    assert!(!output.status.success());
    assert!(stderr(&output).contains("lexdesk login"));
}

#[tokio::test(flavor = "multi_thread")]
async fn list_search_filters_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/client/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3,
            "results": [
                {"id": 1, "name": "Mira Okafor"},
                {"id": 2, "name": "Jonas Birch"},
                {"id": 3, "name": "okafor holdings"}
            ]
        })))
        .mount(&server)
        .await;

    let sandbox = Sandbox::new();
    sandbox.seed("a1", "r1");

    let stdout = run_cli_success(
        &["list", "client", "--search", "OKAFOR"],
        &sandbox,
        &server.uri(),
    );
    let ids: Vec<i64> = stdout
        .lines()
        .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap()["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn whoami_reports_missing_session() {
    let sandbox = Sandbox::new();
    let output = run_cli(&["whoami"], &sandbox, "http://localhost:8000");

    assert!(!output.status.success());
    assert!(stderr(&output).contains("No active session"));
}

#[test]
fn logout_removes_session_file() {
    let sandbox = Sandbox::new();
    sandbox.seed("a1", "r1");

    run_cli_success(&["whoami"], &sandbox, "http://localhost:8000");
    run_cli_success(&["logout"], &sandbox, "http://localhost:8000");

    assert!(!sandbox.session_path().exists());
}
