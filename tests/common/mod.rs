//! Shared test helpers for integration tests

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Helper to get a ggd command
pub fn ggd() -> Command {
    Command::new(cargo::cargo_bin!("ggd"))
}

/// Helper to create a project in a temp directory
pub fn setup_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    ggd().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Helper to create a project seeded with the sample data
pub fn setup_sample_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    ggd()
        .current_dir(tmp.path())
        .args(["init", "--sample"])
        .assert()
        .success();
    tmp
}

/// Extract the first whitespace-separated token with the given prefix
fn extract_id(stdout: &[u8], prefix: &str) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    stdout
        .split_whitespace()
        .find(|word| word.starts_with(prefix))
        .map(|word| word.to_string())
        .unwrap_or_default()
}

/// Helper to register equipment, returning its full id
pub fn create_equipment(tmp: &TempDir, name: &str) -> String {
    let output = ggd()
        .current_dir(tmp.path())
        .args(["equipment", "new", "--name", name])
        .output()
        .unwrap();
    extract_id(&output.stdout, "EQP-")
}

/// Helper to create a team, returning its full id
pub fn create_team(tmp: &TempDir, name: &str, members: &str) -> String {
    let output = ggd()
        .current_dir(tmp.path())
        .args(["team", "new", "--name", name, "--members", members])
        .output()
        .unwrap();
    extract_id(&output.stdout, "TEAM-")
}

/// Helper to create a request against existing equipment, returning its id
pub fn create_request(tmp: &TempDir, subject: &str, equipment: &str) -> String {
    let output = ggd()
        .current_dir(tmp.path())
        .args(["request", "new", "--subject", subject, "--equipment", equipment])
        .output()
        .unwrap();
    extract_id(&output.stdout, "MR-")
}
