use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

/// Nothing listens here; commands that reach the network fail fast.
const UNREACHABLE_API: &str = "http://127.0.0.1:59999";

fn write_config(dir: &Path, api_url: &str) -> PathBuf {
    let path = dir.join("config.yaml");
    let contents = format!(
        "api_url: {api_url}\ntokens:\n  admin: admin-token\n  agent: agent-token\n  user: user-token\n"
    );
    fs::write(&path, contents).expect("failed to write config");
    path
}

fn proptalk(config: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("proptalk"));
    cmd.arg("--config")
        .arg(config)
        .env_remove("PROPTALK_CONFIG")
        .env_remove("PROPTALK_API_URL")
        .env_remove("PROPTALK_FORMAT")
        .env_remove("NEXT_PUBLIC_API_URL");
    cmd
}

#[test]
fn version_prints_package_version() -> Result<(), Box<dyn std::error::Error>> {
    Command::new(assert_cmd::cargo::cargo_bin!("proptalk"))
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn status_uses_custom_config_path() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), "https://api.proptalk.test");

    let assert = proptalk(&config_path).arg("status").assert().success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("https://api.proptalk.test"));
    assert!(stdout.contains("admin token configured"));
    assert!(stdout.contains(&config_path.to_string_lossy().to_string()));

    Ok(())
}

#[test]
fn status_api_url_flag_overrides_config() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), "https://api.proptalk.test");

    proptalk(&config_path)
        .arg("status")
        .arg("--api-url")
        .arg("http://staging.proptalk.test")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://staging.proptalk.test"));

    Ok(())
}

#[test]
fn missing_token_suggests_init() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let nonexistent_config = temp.path().join("does-not-exist.yaml");

    proptalk(&nonexistent_config)
        .args(["admin", "stats"])
        .arg("--api-url")
        .arg(UNREACHABLE_API)
        .assert()
        .failure()
        .stderr(predicate::str::contains("proptalk init --role admin"));

    Ok(())
}

#[test]
fn invalid_listing_is_rejected_before_sending() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), UNREACHABLE_API);

    proptalk(&config_path)
        .args([
            "agent", "add-property", "--title", "Loft", "--address", "1 Quay Road", "--city",
            "Lisbon", "--price", "0", "--type", "apartment",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid price"));

    Ok(())
}

#[test]
fn reject_requires_non_blank_reason() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), UNREACHABLE_API);

    proptalk(&config_path)
        .args(["admin", "reject", "r1", "--reason", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid reason"));

    Ok(())
}

#[test]
fn delete_without_terminal_requires_yes() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), UNREACHABLE_API);

    proptalk(&config_path)
        .args(["admin", "delete-agent", "a1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    Ok(())
}

#[test]
fn past_booking_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), UNREACHABLE_API);

    proptalk(&config_path)
        .args(["user", "book", "p1", "--at", "2000-01-01T10:00:00Z"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be in the future"));

    Ok(())
}

// ============================================================================
// HTTP-backed tests
// ============================================================================

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn agents_table_lists_agents() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let _agents = server
        .mock("GET", "/admin/agents")
        .match_header("authorization", "Bearer admin-token")
        .with_status(200)
        .with_body(
            r#"[{"id": "a1", "full_name": "Jo Smith", "email": "jo@agency.test",
                 "is_verified": true, "is_active": true}]"#,
        )
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &server.url());

    let assert = proptalk(&config_path).args(["admin", "agents"]).assert().success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("AGENT ID"));
    assert!(stdout.contains("Jo Smith"));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn filtered_empty_agents_show_filter_placeholder() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let _agents = server
        .mock("GET", "/admin/agents")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("search".into(), "smith".into()),
            mockito::Matcher::UrlEncoded("is_verified".into(), "true".into()),
        ]))
        .with_status(200)
        .with_body("[]")
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &server.url());

    proptalk(&config_path)
        .args(["admin", "agents", "--search", "smith", "--verified", "true"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No Agents Found"));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn missing_voice_agent_shows_call_to_action() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let _voice = server
        .mock("GET", "/agent/voice-agent")
        .with_status(404)
        .with_body(r#"{"detail": "Voice agent not configured"}"#)
        .expect(1)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &server.url());

    proptalk(&config_path)
        .args(["agent", "voice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("create-voice"));

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn json_output_uses_envelope() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let _listings = server
        .mock("GET", "/properties")
        .match_header("authorization", "Bearer user-token")
        .with_status(200)
        .with_body(
            r#"[{"id": "p1", "title": "Harbour loft", "address": "1 Quay Road",
                 "city": "Lisbon", "price": 420000, "status": "available"}]"#,
        )
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &server.url());

    let assert = proptalk(&config_path)
        .args(["--format", "json", "user", "properties"])
        .assert()
        .success();

    let output: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(output["data"][0]["id"], "p1");
    assert_eq!(output["data"][0]["price"], "420,000");
    assert!(output["meta"]["version"].is_string());

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn verify_sends_patch_and_confirms() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let verify = server
        .mock("PATCH", "/admin/agents/a1/verify")
        .match_body(mockito::Matcher::Json(serde_json::json!({"is_verified": true})))
        .with_status(200)
        .with_body(
            r#"{"id": "a1", "full_name": "Jo Smith", "email": "jo@agency.test",
                "is_verified": true, "is_active": true}"#,
        )
        .expect(1)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &server.url());

    proptalk(&config_path)
        .args(["admin", "verify", "a1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Agent a1 verified"));
    verify.assert();

    Ok(())
}

#[cfg_attr(not(feature = "http-tests"), ignore)]
#[test]
fn forbidden_error_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = mockito::Server::new();
    let _stats = server
        .mock("GET", "/admin/dashboard/stats")
        .with_status(403)
        .with_body(r#"{"detail": "Admins only"}"#)
        .create();

    let temp = tempdir()?;
    let config_path = write_config(temp.path(), &server.url());

    proptalk(&config_path)
        .args(["admin", "stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Access denied"));

    Ok(())
}
