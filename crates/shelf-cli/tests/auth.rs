use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn stored(home: &TempDir) -> serde_json::Value {
    let raw = fs::read_to_string(home.path().join("storage.json")).unwrap_or_default();
    serde_json::from_str(&raw).unwrap_or(json!({}))
}

#[tokio::test]
async fn test_login_persists_tokens() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_partial_json(json!({"username": "emilys", "password": "emilyspass"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "username": "emilys",
            "accessToken": "access-1",
            "refreshToken": "refresh-1",
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("shelf")
        .env("SHELF_HOME", home.path())
        .env("SHELF_API_BASE_URL", server.uri())
        .args(["login", "--username", "emilys", "--password", "emilyspass"])
        .assert()
        .success()
        .stdout(predicate::str::contains("You're signed in!"));

    let storage = stored(&home);
    assert_eq!(storage["userToken"], "access-1");
    assert_eq!(storage["refreshToken"], "refresh-1");
}

#[tokio::test]
async fn test_login_wrong_password_shows_server_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    cargo_bin_cmd!("shelf")
        .env("SHELF_HOME", home.path())
        .env("SHELF_API_BASE_URL", server.uri())
        .args(["login", "--username", "emilys", "--password", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid credentials"));

    assert!(stored(&home).get("userToken").is_none());
}

#[tokio::test]
async fn test_whoami_sends_bearer_token() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join("storage.json"),
        json!({"userToken": "access-1", "refreshToken": "refresh-1"}).to_string(),
    )
    .unwrap();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "username": "emilys",
            "email": "emily@x.dummyjson.com",
            "firstName": "Emily",
            "lastName": "Johnson",
        })))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("shelf")
        .env("SHELF_HOME", home.path())
        .env("SHELF_API_BASE_URL", server.uri())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Emily Johnson"));
}

#[test]
fn test_whoami_without_session() {
    let home = TempDir::new().unwrap();

    cargo_bin_cmd!("shelf")
        .env("SHELF_HOME", home.path())
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));
}

#[test]
fn test_logout_clears_tokens_and_keeps_preferences() {
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join("storage.json"),
        json!({
            "userToken": "access-1",
            "refreshToken": "refresh-1",
            "products-table-preferences": "{\"sortField\":\"price\",\"sortOrder\":\"desc\"}",
        })
        .to_string(),
    )
    .unwrap();

    cargo_bin_cmd!("shelf")
        .env("SHELF_HOME", home.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed out"));

    let storage = stored(&home);
    assert!(storage.get("userToken").is_none());
    assert!(storage.get("refreshToken").is_none());
    assert!(storage.get("products-table-preferences").is_some());
}
