//! CLI integration tests
//!
//! Runs the built binary against copies of the sample projects and checks
//! exit codes and machine-readable output.

mod support;

use serde_json::Value;
use std::fs;
use std::process::{Command, Output};
use support::{copy_fixture, fixture_path, stackup_binary};

const CONFIG_VARS: &[&str] = &[
    "STACKUP_OUTPUT_DIR",
    "STACKUP_PROBE_HOST",
    "STACKUP_PROBE_TIMEOUT_MS",
    "STACKUP_POLL_INTERVAL_SECS",
    "STACKUP_READY_TIMEOUT_SECS",
    "STACKUP_COMPOSE_BIN",
    "STACKUP_LOG_LEVEL",
    "STACKUP_LOG_JSON",
    "RUST_LOG",
];

fn stackup() -> Command {
    let mut command = Command::new(stackup_binary());
    for var in CONFIG_VARS {
        command.env_remove(var);
    }
    command
}

fn run(command: &mut Command) -> Output {
    command.output().expect("Failed to execute stackup")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({}): {}",
            e,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn test_cli_help() {
    let output = run(stackup().arg("--help"));

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["analyze", "generate", "up", "status"] {
        assert!(stdout.contains(command), "help should list {}", command);
    }
}

#[test]
fn test_cli_version() {
    let output = run(stackup().arg("--version"));

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_analyze_json() {
    let output = run(stackup()
        .arg("analyze")
        .arg(fixture_path("python-fastapi"))
        .args(["--format", "json"]));

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["framework"], "FastAPI");
    assert_eq!(json["database"], "Postgres");
    assert_eq!(json["port"], 8000);
    assert_eq!(json["services"], serde_json::json!(["postgres"]));
    assert_eq!(json["configFound"], false);
}

#[test]
fn test_analyze_human() {
    let output = run(stackup().arg("analyze").arg(fixture_path("java-gradle")));

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Framework:  Java"));
    assert!(stdout.contains("mongodb, redis"));
}

#[test]
fn test_analyze_missing_path() {
    let output = run(stackup().args(["analyze", "/nonexistent/stackup-project"]));

    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_generate_writes_environment() {
    let project = copy_fixture("node-postgres");
    let root = project.path();

    let output = run(stackup().arg("generate").arg(root).args(["-f", "json"]));

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["report"]["framework"], "Node.js");
    assert_eq!(json["report"]["services"], serde_json::json!(["postgres"]));
    assert_eq!(json["artifacts"].as_array().map(Vec::len), Some(7));

    assert!(root.join(".stackup/docker-compose.yml").is_file());
    assert!(root.join(".stackup/Dockerfile").is_file());
    assert!(root.join(".stackup.json").is_file());
    assert!(fs::read_to_string(root.join(".env"))
        .unwrap()
        .contains("DB_HOST=postgres"));
}

#[test]
fn test_generate_honours_output_dir_setting() {
    let project = copy_fixture("python-flask-mysql");
    let root = project.path();

    let output = run(stackup()
        .env("STACKUP_OUTPUT_DIR", ".devenv")
        .arg("-q")
        .arg("generate")
        .arg(root));

    assert!(output.status.success());
    assert!(root.join(".devenv/docker-compose.yml").is_file());
    assert!(!root.join(".stackup").exists());
}

#[test]
fn test_nested_output_dir_is_rejected() {
    let project = copy_fixture("node-postgres");
    let root = project.path();

    for output_dir in ["tools/devenv", "."] {
        let output = run(stackup()
            .env("STACKUP_OUTPUT_DIR", output_dir)
            .arg("generate")
            .arg(root));

        assert_eq!(output.status.code(), Some(1), "{}", output_dir);
        assert!(!root.join(".stackup.json").exists(), "{}", output_dir);
    }
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let project = copy_fixture("empty");

    let output = run(stackup()
        .env("STACKUP_PROBE_TIMEOUT_MS", "0")
        .arg("generate")
        .arg(project.path()));

    assert_eq!(output.status.code(), Some(1));
    assert!(!project.path().join(".stackup").exists());
}

#[test]
fn test_status_without_record() {
    let project = copy_fixture("node-postgres");

    let output = run(stackup().arg("status").arg(project.path()));

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("stackup generate"));
}

#[test]
fn test_status_reports_unreachable_services() {
    let project = copy_fixture("empty");
    let root = project.path();
    assert!(run(stackup().arg("generate").arg(root)).status.success());

    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = closed.local_addr().unwrap().port();
    drop(closed);

    let output = run(stackup()
        .arg("status")
        .arg(root)
        .args(["--port", &port.to_string(), "--format", "json"]));

    assert!(output.status.success());
    assert_eq!(stdout_json(&output), serde_json::json!({ "app": false }));
}

#[test]
fn test_quiet_conflicts_with_verbose() {
    let output = run(stackup().args(["-q", "-v", "analyze"]));
    assert!(!output.status.success());
}

#[cfg(unix)]
mod up {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn fake_compose(dir: &Path, exit_code: i32) -> String {
        let path = dir.join("fake-compose");
        fs::write(
            &path,
            format!("#!/bin/sh\necho \"compose $*\"\nexit {}\n", exit_code),
        )
        .unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_up_generates_then_launches() {
        let project = copy_fixture("node-mysql-mongo");
        let root = project.path();
        let bin_dir = tempfile::TempDir::new().unwrap();
        let bin = fake_compose(bin_dir.path(), 0);

        let output = run(stackup()
            .env("STACKUP_COMPOSE_BIN", &bin)
            .arg("up")
            .arg(root)
            .arg("--no-wait"));

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("compose -f docker-compose.yml up --build -d"));
        assert!(root.join(".stackup/docker-compose.yml").is_file());
    }

    #[test]
    fn test_up_fails_when_compose_fails() {
        let project = copy_fixture("java-maven");
        let root = project.path();
        let bin_dir = tempfile::TempDir::new().unwrap();
        let bin = fake_compose(bin_dir.path(), 2);

        let output = run(stackup()
            .env("STACKUP_COMPOSE_BIN", &bin)
            .arg("up")
            .arg(root)
            .arg("--no-wait"));

        assert_eq!(output.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&output.stderr).contains("compose exited with code 2"));
    }

    #[test]
    fn test_up_waits_on_given_port() {
        let project = copy_fixture("empty");
        let root = project.path();
        let bin_dir = tempfile::TempDir::new().unwrap();
        let bin = fake_compose(bin_dir.path(), 0);

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let output = run(stackup()
            .env("STACKUP_COMPOSE_BIN", &bin)
            .env("STACKUP_POLL_INTERVAL_SECS", "1")
            .env("STACKUP_READY_TIMEOUT_SECS", "5")
            .arg("up")
            .arg(root)
            .args(["--port", &port.to_string()]));
        drop(listener);

        assert!(
            output.status.success(),
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        assert!(String::from_utf8_lossy(&output.stdout).contains("app"));
    }
}
