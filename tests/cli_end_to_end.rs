#![deny(clippy::all, clippy::pedantic)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use httpmock::MockServer;
use predicates::str::contains;
use tempfile::TempDir;

const SESSION: &str = r#"{"admin_token":"tok","admin_username":"admin"}"#;

fn session_file(dir: &TempDir, contents: Option<&str>) -> PathBuf {
    let path = dir.path().join("session.json");
    if let Some(contents) = contents {
        std::fs::write(&path, contents).expect("write session");
    }
    path
}

fn blog_admin(server: &MockServer, session: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("blog-admin"));
    cmd.env("BLOG_ADMIN_API_BASE", server.base_url())
        .env("BLOG_ADMIN_SESSION_FILE", session)
        .env_remove("BLOG_ADMIN_CONFIG_FILE")
        .env_remove("BLOG_ADMIN_PASSWORD")
        .env_remove("BLOG_ADMIN_USERNAME")
        .env_remove("RUST_LOG");
    cmd
}

fn accept_token(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method("GET")
            .path("/api/auth/me")
            .header("authorization", "Bearer tok");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"_id":"u1","username":"admin"}"#);
    })
}

#[test]
fn wrong_password_shows_server_message() {
    let server = MockServer::start();
    let login = server.mock(|when, then| {
        when.method("POST").path("/api/auth/login");
        then.status(401)
            .header("content-type", "application/json")
            .body(r#"{"message":"Invalid credentials"}"#);
    });
    let dir = TempDir::new().expect("tempdir");
    let session = session_file(&dir, None);

    blog_admin(&server, &session)
        .env("BLOG_ADMIN_PASSWORD", "wrong")
        .args(["login", "--username", "admin"])
        .assert()
        .failure()
        .stderr(contains("Invalid credentials"));
    login.assert();
    assert!(!session.exists());
}

#[test]
fn login_stores_the_session() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("POST")
            .path("/api/auth/login")
            .json_body_includes(r#"{"username":"admin","password":"pw"}"#);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"token":"tok","admin":{"_id":"u1","username":"admin"}}"#);
    });
    let dir = TempDir::new().expect("tempdir");
    let session = session_file(&dir, None);

    blog_admin(&server, &session)
        .env("BLOG_ADMIN_PASSWORD", "pw")
        .args(["login", "--username", "admin"])
        .assert()
        .success()
        .stdout(contains("Signed in as admin."));

    let stored = std::fs::read_to_string(&session).expect("session written");
    assert!(stored.contains("\"admin_token\""));
    assert!(stored.contains("\"tok\""));
}

#[test]
fn protected_command_without_session_asks_for_login() {
    let server = MockServer::start();
    let listing = server.mock(|when, then| {
        when.method("GET").path("/api/admin/comments");
        then.status(200).body("[]");
    });
    let dir = TempDir::new().expect("tempdir");
    let session = session_file(&dir, None);

    blog_admin(&server, &session)
        .args(["comments", "list"])
        .assert()
        .failure()
        .stderr(contains("sign in required to open /comments"));
    listing.assert_hits(0);
}

#[test]
fn pending_filter_lists_only_unapproved_comments() {
    let server = MockServer::start();
    accept_token(&server);
    server.mock(|when, then| {
        when.method("GET")
            .path("/api/admin/comments")
            .header("authorization", "Bearer tok");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"[{"_id":"a","message":"first","approved":false},{"_id":"b","message":"second","approved":true}]"#);
    });
    let dir = TempDir::new().expect("tempdir");
    let session = session_file(&dir, Some(SESSION));

    let assert = blog_admin(&server, &session)
        .args(["comments", "list", "--status", "pending", "--json"])
        .assert()
        .success();
    let out: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("json output");
    assert_eq!(out["total"], 1);
    assert_eq!(out["items"][0]["_id"], "a");
    assert_eq!(out["page"], 1);
}

#[test]
fn empty_blog_list_prints_empty_message() {
    let server = MockServer::start();
    accept_token(&server);
    server.mock(|when, then| {
        when.method("GET").path("/api/blogs");
        then.status(200)
            .header("content-type", "application/json")
            .body("[]");
    });
    let dir = TempDir::new().expect("tempdir");
    let session = session_file(&dir, Some(SESSION));

    blog_admin(&server, &session)
        .args(["blogs", "list"])
        .assert()
        .success()
        .stdout(contains("No blogs found."));
}

#[test]
fn partial_delete_reports_failures_and_reloads_once() {
    let server = MockServer::start();
    accept_token(&server);
    let listing = server.mock(|when, then| {
        when.method("GET").path("/api/admin/comments");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"[{"_id":"b","approved":false}]"#);
    });
    server.mock(|when, then| {
        when.method("DELETE").path("/api/admin/comments/a");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"message":"Deleted"}"#);
    });
    server.mock(|when, then| {
        when.method("DELETE").path("/api/admin/comments/b");
        then.status(500)
            .header("content-type", "application/json")
            .body(r#"{"message":"db down"}"#);
    });
    let dir = TempDir::new().expect("tempdir");
    let session = session_file(&dir, Some(SESSION));

    blog_admin(&server, &session)
        .args(["comments", "delete", "a", "b", "--yes"])
        .assert()
        .failure()
        .stdout(contains("deleted: a"))
        .stderr(contains("failed to delete b: db down"))
        .stderr(contains("1 of 2 delete requests failed"));
    listing.assert_hits(1);
}

#[test]
fn rejected_token_ends_the_session() {
    let server = MockServer::start();
    accept_token(&server);
    server.mock(|when, then| {
        when.method("GET").path("/api/categories");
        then.status(401)
            .header("content-type", "application/json")
            .body(r#"{"message":"Token expired"}"#);
    });
    let dir = TempDir::new().expect("tempdir");
    let session = session_file(&dir, Some(SESSION));

    blog_admin(&server, &session)
        .args(["categories", "list"])
        .assert()
        .failure()
        .stderr(contains("session ended: Token expired"));
    assert!(!session.exists());
}

#[test]
fn route_check_redirects_without_session() {
    let server = MockServer::start();
    let dir = TempDir::new().expect("tempdir");
    let session = session_file(&dir, None);

    blog_admin(&server, &session)
        .args(["route", "/blogs/b1/edit"])
        .assert()
        .success()
        .stdout(contains("redirect /login"));
}

#[test]
fn logout_forgets_the_session() {
    let server = MockServer::start();
    let dir = TempDir::new().expect("tempdir");
    let session = session_file(&dir, Some(SESSION));

    blog_admin(&server, &session)
        .arg("logout")
        .assert()
        .success()
        .stdout(contains("Signed out."));
    assert!(!session.exists());
}

#[test]
fn logout_works_without_api_base() {
    let dir = TempDir::new().expect("tempdir");
    let session = session_file(&dir, Some(SESSION));

    Command::new(assert_cmd::cargo::cargo_bin!("blog-admin"))
        .arg("logout")
        .env_remove("BLOG_ADMIN_API_BASE")
        .env_remove("BLOG_ADMIN_CONFIG_FILE")
        .env("BLOG_ADMIN_SESSION_FILE", &session)
        .assert()
        .success()
        .stdout(contains("Signed out."));
    assert!(!session.exists());
}

#[test]
fn missing_api_base_fails_fast() {
    let dir = TempDir::new().expect("tempdir");
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("blog-admin"));
    cmd.arg("whoami")
        .env_remove("BLOG_ADMIN_API_BASE")
        .env_remove("BLOG_ADMIN_CONFIG_FILE")
        .env("BLOG_ADMIN_SESSION_FILE", dir.path().join("session.json"))
        .assert()
        .failure()
        .stderr(contains("API base URL is required"));
}
