use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::Version;
use crate::error::{GitflowError, Result};

/// Represents the complete configuration for gitflow-release.
///
/// Built from defaults, an optional TOML file and the CI environment, in that
/// order of precedence. Read-only for the rest of the run.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub init_version: String,
    pub primary_branch: String,
    pub tag_prefix: TagPrefixConfig,
    pub git: GitIdentityConfig,
    pub github: GithubConfig,
    pub features: FeaturesConfig,
    pub auto_release_branches: Vec<String>,
    pub log_level: LogLevel,
    pub keywords: KeywordsConfig,
    pub paths: PathsConfig,
    /// How many tags `describe` considers when looking for the latest one
    pub describe_candidates: u32,
    /// CI output sink (`$GITHUB_OUTPUT`)
    pub output_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            init_version: "0.0.0".to_string(),
            primary_branch: "main".to_string(),
            tag_prefix: TagPrefixConfig::default(),
            git: GitIdentityConfig::default(),
            github: GithubConfig::default(),
            features: FeaturesConfig::default(),
            auto_release_branches: Vec::new(),
            log_level: LogLevel::default(),
            keywords: KeywordsConfig::default(),
            paths: PathsConfig::default(),
            describe_candidates: 100,
            output_file: None,
        }
    }
}

/// Prefixes prepended to computed versions to form tag names
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct TagPrefixConfig {
    pub release: String,
    pub candidate: String,
}

/// Identity used for release commits
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GitIdentityConfig {
    pub name: String,
    pub email: String,
}

impl Default for GitIdentityConfig {
    fn default() -> Self {
        GitIdentityConfig {
            name: "gitflow-action".to_string(),
            email: "gitflow-action@users.noreply.github.com".to_string(),
        }
    }
}

/// Remote release endpoint settings
#[derive(Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GithubConfig {
    /// `owner/name`
    pub repository: Option<String>,
    pub api_url: String,
    pub token: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            repository: None,
            api_url: "https://api.github.com".to_string(),
            token: None,
        }
    }
}

impl fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubConfig")
            .field("repository", &self.repository)
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "xxx-masked-xxx"))
            .finish()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct FeaturesConfig {
    pub enable_git_push: bool,
    pub enable_github_release: bool,
}

/// Keyword lists driving bump classification
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct KeywordsConfig {
    pub major_bump: Vec<String>,
    pub patch_bump: Vec<String>,
    pub skip_ci: String,
}

impl Default for KeywordsConfig {
    fn default() -> Self {
        KeywordsConfig {
            major_bump: vec![
                "[BUMP-MAJOR]".to_string(),
                "bump-major".to_string(),
                "feat!".to_string(),
            ],
            patch_bump: vec![
                "[hotfix]".to_string(),
                "[fix]".to_string(),
                "hotfix:".to_string(),
                "fix:".to_string(),
            ],
            skip_ci: "[skip ci]".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    pub changelog: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            changelog: PathBuf::from("CHANGELOG.md"),
        }
    }
}

/// Log verbosity accepted from the environment
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Unknown names fall back to `Info`
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "warning" | "warn" => LogLevel::Warning,
            "error" => LogLevel::Error,
            "critical" => LogLevel::Critical,
            _ => LogLevel::Info,
        }
    }
}

/// Environment variables the configuration is read from
pub mod env {
    pub const INIT_VERSION: &str = "INPUT_INIT_VERSION";
    pub const PRIMARY_BRANCH: &str = "INPUT_PRIMARY_BRANCH";
    pub const TAG_PREFIX_RELEASE: &str = "INPUT_TAG_PREFIX_RELEASE";
    pub const TAG_PREFIX_CANDIDATE: &str = "INPUT_TAG_PREFIX_CANDIDATE";
    pub const REPOSITORY: &str = "GITHUB_REPOSITORY";
    pub const API_URL: &str = "INPUT_GITHUB_API_URL";
    pub const TOKEN: &str = "INPUT_GITHUB_TOKEN";
    pub const ENABLE_GIT_PUSH: &str = "INPUT_ENABLE_GIT_PUSH";
    pub const ENABLE_GITHUB_RELEASE: &str = "INPUT_ENABLE_GITHUB_RELEASE";
    pub const AUTO_RELEASE_BRANCHES: &str = "INPUT_AUTO_RELEASE_BRANCHES";
    pub const LOG_LEVEL: &str = "INPUT_LOG_LEVEL";
    pub const CHANGELOG_PATH: &str = "INPUT_CHANGELOG_PATH";
    pub const OUTPUT: &str = "GITHUB_OUTPUT";
}

/// Feature flags are switched on only by the literal `true`
fn parse_flag(value: &str) -> bool {
    value == "true"
}

fn parse_branch_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|branch| !branch.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    /// Parse configuration from TOML text; missing keys keep their defaults
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Overlay values found through `lookup` (normally the process environment)
    ///
    /// Empty values count as unset, except for the tag prefixes where an
    /// empty string means "no prefix".
    pub fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = non_empty(env::INIT_VERSION) {
            self.init_version = value;
        }
        if let Some(value) = non_empty(env::PRIMARY_BRANCH) {
            self.primary_branch = value;
        }
        if let Some(value) = lookup(env::TAG_PREFIX_RELEASE) {
            self.tag_prefix.release = value;
        }
        if let Some(value) = lookup(env::TAG_PREFIX_CANDIDATE) {
            self.tag_prefix.candidate = value;
        }
        if let Some(value) = non_empty(env::REPOSITORY) {
            self.github.repository = Some(value);
        }
        if let Some(value) = non_empty(env::API_URL) {
            self.github.api_url = value;
        }
        if let Some(value) = non_empty(env::TOKEN) {
            self.github.token = Some(value);
        }
        if let Some(value) = non_empty(env::ENABLE_GIT_PUSH) {
            self.features.enable_git_push = parse_flag(&value);
        }
        if let Some(value) = non_empty(env::ENABLE_GITHUB_RELEASE) {
            self.features.enable_github_release = parse_flag(&value);
        }
        if let Some(value) = non_empty(env::AUTO_RELEASE_BRANCHES) {
            self.auto_release_branches = parse_branch_list(&value);
        }
        if let Some(value) = non_empty(env::LOG_LEVEL) {
            self.log_level = LogLevel::parse(&value);
        }
        if let Some(value) = non_empty(env::CHANGELOG_PATH) {
            self.paths.changelog = PathBuf::from(value);
        }
        if let Some(value) = non_empty(env::OUTPUT) {
            self.output_file = Some(PathBuf::from(value));
        }
        self
    }

    /// Check the configuration before anything touches the repository
    pub fn validate(&self) -> Result<()> {
        if self.primary_branch.trim().is_empty() {
            return Err(GitflowError::config("primary branch must not be empty"));
        }

        Version::parse(&self.init_version).map_err(|e| {
            GitflowError::config(format!(
                "initial version '{}' is invalid: {}",
                self.init_version, e
            ))
        })?;

        if self.describe_candidates == 0 {
            return Err(GitflowError::config(
                "describe_candidates must be greater than zero",
            ));
        }

        let missing = |value: &Option<String>| value.as_deref().map_or(true, str::is_empty);

        // git2 does not read the http.extraheader credentials CI checkouts set up
        if self.features.enable_git_push && missing(&self.github.token) {
            return Err(GitflowError::config(format!(
                "git push needs a token ({})",
                env::TOKEN
            )));
        }

        if self.features.enable_github_release
            && self.features.enable_git_push
            && missing(&self.github.repository)
        {
            return Err(GitflowError::config(format!(
                "remote releases need a repository identifier ({})",
                env::REPOSITORY
            )));
        }

        Ok(())
    }

    /// True when `branch` is listed as an auto-release branch
    pub fn is_auto_release_branch(&self, branch: &str) -> bool {
        self.auto_release_branches.iter().any(|b| b == branch)
    }
}

/// Loads configuration from an optional TOML file, then the process environment.
///
/// # Arguments
/// * `config_path` - Optional path to a configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded configuration (not yet validated)
/// * `Err` - If the file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let base = match config_path {
        Some(path) => Config::from_toml(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };

    Ok(base.apply_env(|key| std::env::var(key).ok()))
}
