// tests/integration_test.rs
use std::fs;
use std::path::Path;
use std::process::Command;

use git2::{Repository, RepositoryInitOptions};
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_gitflow-release");

fn repo_with_commit(message: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    let mut options = RepositoryInitOptions::new();
    options.initial_head("main");
    let repo = Repository::init_opts(dir.path(), &options).unwrap();

    fs::write(dir.path().join("app.txt"), "x").unwrap();
    let mut index = repo.index().unwrap();
    index.add_path(Path::new("app.txt")).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let signature = git2::Signature::now("Test User", "test@example.com").unwrap();
    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &[])
        .unwrap();

    dir
}

fn gitflow(dir: &TempDir) -> Command {
    let mut command = Command::new(BIN);
    command.arg("--repo").arg(dir.path());
    for (key, _) in std::env::vars() {
        if key.starts_with("INPUT_") || key == "GITHUB_OUTPUT" {
            command.env_remove(key);
        }
    }
    command
}

#[test]
fn test_help() {
    let output = Command::new(BIN)
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("gitflow-release"));
    assert!(stdout.contains("changelog"));
}

#[test]
fn test_plan_does_not_mutate() {
    let dir = repo_with_commit("feat: x");

    let output = gitflow(&dir)
        .arg("plan")
        .env("INPUT_TAG_PREFIX_CANDIDATE", "rc/")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("create tag rc/0.1.0"));

    let repo = Repository::open(dir.path()).unwrap();
    assert!(repo.tag_names(None).unwrap().is_empty());
    assert!(!dir.path().join("CHANGELOG.md").exists());
}

#[test]
fn test_run_writes_github_output() {
    let dir = repo_with_commit("feat: x");
    let output_file = dir.path().join("github_output");

    let output = gitflow(&dir)
        .env("INPUT_TAG_PREFIX_RELEASE", "v")
        .env("INPUT_AUTO_RELEASE_BRANCHES", "main")
        .env("GITHUB_OUTPUT", &output_file)
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let written = fs::read_to_string(output_file).unwrap();
    assert_eq!(written, "version=v0.1.0\nsafe_version=v0.1.0\n");
}

#[test]
fn test_invalid_configuration_exits_non_zero() {
    let dir = repo_with_commit("feat: x");

    let output = gitflow(&dir)
        .env("INPUT_INIT_VERSION", "not-a-version")
        .output()
        .unwrap();

    assert!(!output.status.success());
}

#[test]
fn test_changelog_command() {
    let dir = repo_with_commit("feat: x");
    let repo = Repository::open(dir.path()).unwrap();
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    repo.tag_lightweight("v0.1.0", head.as_object(), false).unwrap();

    let output = gitflow(&dir).arg("changelog").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("## v0.1.0 - "));
    assert!(stdout.contains("### Features\n"));
}
