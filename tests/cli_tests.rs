//! End-to-end tests for the daycache-suggest binary

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn cmd() -> Command {
    Command::cargo_bin("daycache-suggest").unwrap()
}

#[test]
fn test_help_lists_options() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--delay-ms"))
        .stdout(predicate::str::contains("--mode"))
        .stdout(predicate::str::contains("--base-url"));
}

#[test]
fn test_unknown_mode_is_rejected() {
    cmd()
        .args(["--mode", "sideways"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sideways"));
}

#[test]
fn test_zero_delay_is_rejected() {
    let config = config_file("");
    cmd()
        .arg("--config")
        .arg(config.path())
        .args(["--delay-ms", "0"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("delay_ms"));
}

#[test]
fn test_missing_config_file_is_reported() {
    cmd()
        .args(["--config", "/nonexistent/daycache/config.toml"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn test_blank_line_prints_no_suggestion() {
    let config = config_file("[suggestions]\ndelay_ms = 10\n");
    cmd()
        .arg("--config")
        .arg(config.path())
        .write_stdin("   \n")
        .assert()
        .success()
        .stdout(predicate::str::contains("(no suggestion)"));
}

#[test]
fn test_unreachable_backend_prints_no_suggestion() {
    let config = config_file(
        r#"
[suggestions]
delay_ms = 10

[api]
base_url = "http://127.0.0.1:1"
timeout_ms = 2000
"#,
    );
    cmd()
        .arg("--config")
        .arg(config.path())
        .write_stdin("Went for a\n")
        .timeout(std::time::Duration::from_secs(20))
        .assert()
        .success()
        .stdout(predicate::str::contains("(no suggestion)"));
}
