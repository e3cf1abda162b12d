//! E2E tests for cc-server argument handling

use std::process::Command;

#[test]
fn help_prints_usage() {
    let output = Command::new(env!("CARGO_BIN_EXE_cc-server"))
        .arg("--help")
        .output()
        .expect("Failed to run cc-server --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"));
    assert!(stdout.contains("TEMPLATE"));
    assert!(stdout.contains("--output"));
}

#[test]
fn version_flag_short_circuits() {
    let output = Command::new(env!("CARGO_BIN_EXE_cc-server"))
        .arg("-v")
        .output()
        .expect("Failed to run cc-server -v");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("cc-server"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_long_flag_works_without_template() {
    let output = Command::new(env!("CARGO_BIN_EXE_cc-server"))
        .arg("--version")
        .output()
        .expect("Failed to run cc-server --version");

    assert!(output.status.success());
}

#[test]
fn missing_template_argument_is_an_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_cc-server"))
        .output()
        .expect("Failed to run cc-server");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("TEMPLATE"), "stderr was: {}", stderr);
}

#[test]
fn nonexistent_template_fails_at_startup() {
    let output = Command::new(env!("CARGO_BIN_EXE_cc-server"))
        .arg("/definitely/not/a/template")
        .output()
        .expect("Failed to run cc-server");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("template directory not found"),
        "stderr was: {}",
        stderr
    );
}

#[test]
fn template_without_manifest_fails_at_startup() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_cc-server"))
        .arg(dir.path())
        .output()
        .expect("Failed to run cc-server");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("no cookiecutter.json"),
        "stderr was: {}",
        stderr
    );
}
