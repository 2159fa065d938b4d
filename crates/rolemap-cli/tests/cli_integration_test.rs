//! CLI integration tests
//!
//! Runs the rolemap binary against a mock management API.

use serde_json::json;
use std::path::Path;
use std::process::Command;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Get the path to the compiled rolemap binary
fn rolemap_bin() -> String {
    let mut path = std::env::current_exe()
        .unwrap()
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf();
    path.push("rolemap");
    path.to_str().unwrap().to_string()
}

/// A command with a clean environment and an empty config file.
fn rolemap(home: &Path) -> Command {
    let config_path = home.join("config.toml");
    std::fs::write(&config_path, "").unwrap();

    let mut command = Command::new(rolemap_bin());
    command
        .env_clear()
        .env("HOME", home)
        .env("RUST_LOG", "warn")
        .arg("--config")
        .arg(config_path);
    command
}

#[test]
fn test_help_flag() {
    let output = Command::new(rolemap_bin())
        .arg("--help")
        .output()
        .expect("Failed to execute rolemap");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("rolemap"));
    assert!(stdout.contains("--format"));
}

#[test]
fn test_invalid_flag_fails() {
    let output = Command::new(rolemap_bin())
        .arg("--nonexistent-flag")
        .output()
        .expect("Failed to execute rolemap");

    assert!(!output.status.success());
}

#[test]
fn test_missing_default_credentials_is_fatal() {
    let home = tempfile::tempdir().unwrap();
    let output = rolemap(home.path())
        .output()
        .expect("Failed to execute rolemap");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No default credentials"), "stderr: {stderr}");
}

#[test]
fn test_missing_config_file_is_fatal() {
    let output = Command::new(rolemap_bin())
        .env_clear()
        .args(["--config", "/nonexistent/rolemap.toml"])
        .output()
        .expect("Failed to execute rolemap");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read config file"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_json_report_against_mock_api() {
    let server = MockServer::start().await;
    let data = |items: serde_json::Value| {
        ResponseTemplate::new(200).set_body_json(json!({"data": items, "metadata": {}}))
    };

    Mock::given(method("GET"))
        .and(path("/org/v2/organizations"))
        .respond_with(data(json!([{"id": "o1"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/org/v2/environments"))
        .respond_with(data(json!([{"id": "e1"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/iam/v2/service-accounts"))
        .respond_with(data(json!([{"id": "sa1"}])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/cmk/v2/clusters"))
        .respond_with(data(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/srcm/v3/clusters"))
        .respond_with(data(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/iam/v2/role-bindings"))
        .and(query_param("principal", "User:sa1"))
        .respond_with(data(json!([{
            "id": "rb-1",
            "resource": "environment",
            "role_name": "EnvironmentAdmin",
            "principal": "User:sa1",
            "crn_pattern": "crn://confluent.cloud/organization=o1/environment=e1"
        }])))
        .expect(2)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let mut command = rolemap(home.path());
    command
        .env("CONFLUENT_CLOUD_API_KEY", "key")
        .env("CONFLUENT_CLOUD_API_SECRET", "secret")
        .env("ROLEMAP_API_BASE_URL", server.uri())
        .args(["--format", "json", "--no-color"]);
    let output = tokio::task::spawn_blocking(move || command.output())
        .await
        .unwrap()
        .expect("Failed to execute rolemap");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["organizations"], json!(["o1"]));
    assert_eq!(report["service_accounts"], json!(["sa1"]));
    assert_eq!(report["stats"]["queries"], 2);
    assert_eq!(report["stats"]["unique"], 1);
    assert_eq!(report["summary"]["total"], 1);
    assert_eq!(
        report["summary"]["groups"][0]["entries"],
        json!(["SA: sa1 - Role: EnvironmentAdmin"])
    );
}
