// tests/config_test.rs
use gitflow_release::config::{env, load_config, Config, LogLevel};
use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const ALL_VARS: [&str; 13] = [
    env::INIT_VERSION,
    env::PRIMARY_BRANCH,
    env::TAG_PREFIX_RELEASE,
    env::TAG_PREFIX_CANDIDATE,
    env::REPOSITORY,
    env::API_URL,
    env::TOKEN,
    env::ENABLE_GIT_PUSH,
    env::ENABLE_GITHUB_RELEASE,
    env::AUTO_RELEASE_BRANCHES,
    env::LOG_LEVEL,
    env::CHANGELOG_PATH,
    env::OUTPUT,
];

fn clear_env() {
    for var in ALL_VARS {
        std::env::remove_var(var);
    }
}

#[test]
fn test_default_values() {
    let config = Config::default();
    assert_eq!(config.init_version, "0.0.0");
    assert_eq!(config.primary_branch, "main");
    assert_eq!(config.github.api_url, "https://api.github.com");
    assert_eq!(config.paths.changelog, PathBuf::from("CHANGELOG.md"));
    assert!(!config.features.enable_git_push);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_load_from_file() {
    clear_env();
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
init_version = "1.0.0"
primary_branch = "master"
auto_release_branches = ["master"]

[tag_prefix]
release = "v"
candidate = "rc/"

[keywords]
major_bump = ["BREAKING"]
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path())).unwrap();
    assert_eq!(config.init_version, "1.0.0");
    assert_eq!(config.primary_branch, "master");
    assert_eq!(config.tag_prefix.release, "v");
    assert_eq!(config.tag_prefix.candidate, "rc/");
    assert_eq!(config.keywords.major_bump, vec!["BREAKING".to_string()]);
    // untouched sections keep their defaults
    assert_eq!(config.keywords.skip_ci, "[skip ci]");
    assert!(config.is_auto_release_branch("master"));
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(b"primary_branch = \"master\"\n[tag_prefix]\nrelease = \"v\"\n")
        .unwrap();
    temp_file.flush().unwrap();

    std::env::set_var(env::PRIMARY_BRANCH, "trunk");
    std::env::set_var(env::ENABLE_GIT_PUSH, "true");
    std::env::set_var(env::ENABLE_GITHUB_RELEASE, "True");
    std::env::set_var(env::AUTO_RELEASE_BRANCHES, " trunk , ,develop");
    std::env::set_var(env::LOG_LEVEL, "CRITICAL");
    std::env::set_var(env::OUTPUT, "/tmp/github_output");

    let config = load_config(Some(temp_file.path()));
    clear_env();
    let config = config.unwrap();

    assert_eq!(config.primary_branch, "trunk");
    assert_eq!(config.tag_prefix.release, "v");
    assert!(config.features.enable_git_push);
    assert!(!config.features.enable_github_release);
    assert_eq!(
        config.auto_release_branches,
        vec!["trunk".to_string(), "develop".to_string()]
    );
    assert_eq!(config.log_level, LogLevel::Critical);
    assert_eq!(config.output_file, Some(PathBuf::from("/tmp/github_output")));
}

#[test]
#[serial]
fn test_empty_inputs_are_unset() {
    clear_env();
    for var in [env::CHANGELOG_PATH, env::API_URL, env::INIT_VERSION, env::PRIMARY_BRANCH] {
        std::env::set_var(var, "");
    }

    let config = load_config(None);
    clear_env();
    let config = config.unwrap();

    assert_eq!(config.paths.changelog, PathBuf::from("CHANGELOG.md"));
    assert_eq!(config.github.api_url, "https://api.github.com");
    assert_eq!(config.init_version, "0.0.0");
    assert_eq!(config.primary_branch, "main");
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_missing_file_is_error() {
    clear_env();
    assert!(load_config(Some(std::path::Path::new("/nonexistent/gitflow.toml"))).is_err());
}

#[test]
fn test_push_without_token_fails_validation() {
    let mut config = Config::default();
    config.features.enable_git_push = true;

    assert!(config.validate().is_err());
}

#[test]
fn test_release_without_token_fails_validation() {
    let mut config = Config::default();
    config.features.enable_git_push = true;
    config.features.enable_github_release = true;
    config.github.repository = Some("owner/repo".to_string());

    assert!(config.validate().is_err());

    config.github.token = Some("secret".to_string());
    assert!(config.validate().is_ok());
}

#[test]
fn test_token_is_masked_in_debug_output() {
    let mut config = Config::default();
    config.github.token = Some("ghp_supersecret".to_string());

    let rendered = format!("{:?}", config);
    assert!(!rendered.contains("ghp_supersecret"));
    assert!(rendered.contains("xxx-masked-xxx"));
}
