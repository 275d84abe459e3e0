//! CLI integration tests against the built binary.

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

fn orderdesk() -> Command {
    let mut cmd = cargo_bin_cmd!("orderdesk");
    cmd.env_remove("ORDERDESK_API_URL")
        .env_remove("ORDERDESK_WS_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn write_temp_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("orderdesk-cli-test-")
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn test_help_lists_commands() {
    orderdesk()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("orderdesk"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("bill"));
}

#[test]
fn test_version() {
    orderdesk()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("orderdesk"));
}

#[test]
fn test_check_config_accepts_valid_file() {
    let file = write_temp_config(
        r#"
[api]
base_url = "https://orders.example.com/api"

[orders]
number_prefix = "ord-"
"#,
    );

    orderdesk()
        .args(["--color", "never", "check", "config", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("https://orders.example.com/api"))
        .stdout(predicate::str::contains("ord-"));
}

#[test]
fn test_check_config_json_mode() {
    let file = write_temp_config("");

    orderdesk()
        .args(["--json", "check", "config", "--config"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""type":"success""#));
}

#[test]
fn test_check_config_rejects_invalid_value() {
    let file = write_temp_config(
        r#"
[api]
timeout_ms = 0
"#,
    );

    orderdesk()
        .args(["check", "config", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout_ms"));
}

#[test]
fn test_check_config_reports_parse_errors() {
    let file = write_temp_config("[api\nbase_url = ");

    orderdesk()
        .args(["--color", "never", "check", "config", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

#[test]
fn test_list_rejects_unknown_date_filter() {
    orderdesk()
        .args(["list", "--date", "tomorrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tomorrow"));
}

#[test]
fn test_list_reports_unreachable_server() {
    let file = write_temp_config(
        r#"
[api]
base_url = "http://127.0.0.1:1/api"
timeout_ms = 2000
connect_timeout_ms = 1000

[realtime]
enabled = false
"#,
    );

    orderdesk()
        .args(["--color", "never", "list", "--config"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to fetch orders"));
}
