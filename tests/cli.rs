use assert_cmd::prelude::*;
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

const FIXTURE_TOKEN: &str = "eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9.\
    eyJ1c2VyX2lkIjo5OTk5LCJ1c2VybmFtZSI6ImZiMTIzNDUiLCJleHAiOjIwNjU4OTU1ODgsImVtYWlsIjoiZm9vQGJhci5kZSJ9.\
    4ki8y9q_106tsa89lNM4va0pyxEkvJ60iBLkObtyVLc";

fn token_expiring_in(seconds: i64) -> String {
    let claims = json!({
        "exp": Utc::now().timestamp() + seconds,
        "user_id": 9999,
        "username": "fb12345",
        "email": "foo@bar.de",
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"secret"),
    )
    .expect("failed to encode token")
}

fn write_config(dir: &Path, token: Option<&str>) -> PathBuf {
    let path = dir.join("config.yaml");
    let mut contents = "username: foo@bar.de\npassword: bar\n".to_string();
    if let Some(token) = token {
        contents.push_str(&format!("token: {token}\n"));
    }
    fs::write(&path, contents).expect("failed to write config");
    path
}

fn carson() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("carson"));
    cmd.env_remove("CARSON_CONFIG")
        .env_remove("CARSON_API_HOST")
        .env_remove("CARSON_DEBUG");
    cmd
}

#[test]
fn version_prints_package_version() {
    carson()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn status_reports_valid_token_and_claims() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let token = token_expiring_in(3600);
    let config_path = write_config(temp.path(), Some(&token));

    let assert = carson()
        .arg("status")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains(&config_path.to_string_lossy().to_string()));
    assert!(stdout.contains("Credentials configured for foo@bar.de"));
    assert!(stdout.contains("JWT token valid"));
    assert!(stdout.contains("fb12345"));
    assert!(stdout.contains("https://api.carson.live/api/v1.4.0/"));

    Ok(())
}

#[test]
fn status_reports_expired_token() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let token = token_expiring_in(-3600);
    let config_path = write_config(temp.path(), Some(&token));

    carson()
        .arg("status")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("JWT token expired"));

    Ok(())
}

#[test]
fn status_without_config_suggests_init() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;

    carson()
        .arg("status")
        .arg("--config")
        .arg(temp.path().join("missing.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("carson init"));

    Ok(())
}

#[test]
fn query_without_config_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;

    carson()
        .arg("query")
        .arg("me/")
        .arg("--config")
        .arg(temp.path().join("missing.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("carson init"));

    Ok(())
}

#[test]
fn query_rejects_unknown_method() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), None);

    carson()
        .arg("query")
        .arg("me/")
        .arg("-X")
        .arg("NOT A METHOD")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown HTTP method"));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn query_logs_in_and_saves_token() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let login = server
        .mock("POST", "/api/v1.4.0/auth/login/")
        .with_status(200)
        .with_body(include_str!("fixtures/carson_login.json"))
        .expect(1)
        .create();
    let me = server
        .mock("GET", "/api/v1.4.0/me/")
        .match_header("authorization", format!("JWT {FIXTURE_TOKEN}").as_str())
        .with_status(200)
        .with_body(include_str!("fixtures/carson_me.json"))
        .expect(1)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), None);

    let assert = carson()
        .arg("query")
        .arg("me/")
        .arg("--config")
        .arg(&config_path)
        .env("CARSON_API_HOST", server.url())
        .assert()
        .success();

    login.assert();
    me.assert();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("\"first_name\": \"Foo\""));

    let saved = fs::read_to_string(&config_path)?;
    assert!(saved.contains(FIXTURE_TOKEN));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn login_with_rejected_credentials_fails() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();

    let _login = server
        .mock("POST", "/api/v1.4.0/auth/login/")
        .with_status(401)
        .with_body(include_str!("fixtures/carson_auth_failure.json"))
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), None);

    carson()
        .arg("login")
        .arg("--config")
        .arg(&config_path)
        .env("CARSON_API_HOST", server.url())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication failed"));

    let saved = fs::read_to_string(&config_path)?;
    assert!(!saved.contains("token:"));

    Ok(())
}
