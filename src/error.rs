use thiserror::Error;

/// Unified error type for gitflow-release operations
#[derive(Error, Debug)]
pub enum GitflowError {
    #[error("Invalid version format: {0}")]
    InvalidVersionFormat(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Git command failed: {0}")]
    VcsCommand(String),

    #[error("Remote release failed with status {status}: {body}")]
    RemoteRelease { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in gitflow-release
pub type Result<T> = std::result::Result<T, GitflowError>;

impl GitflowError {
    /// Create a version format error with context
    pub fn version(msg: impl Into<String>) -> Self {
        GitflowError::InvalidVersionFormat(msg.into())
    }

    /// Create a git command error with context
    pub fn vcs(msg: impl Into<String>) -> Self {
        GitflowError::VcsCommand(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitflowError::Config(msg.into())
    }

    /// Create a remote release error from a non-success response
    pub fn remote_release(status: u16, body: impl Into<String>) -> Self {
        GitflowError::RemoteRelease {
            status,
            body: body.into(),
        }
    }

    /// True for failures raised by the VCS adapter
    pub fn is_vcs(&self) -> bool {
        matches!(self, GitflowError::Git(_) | GitflowError::VcsCommand(_))
    }
}
