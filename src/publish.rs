//! Remote release creation on the hosting service.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::GithubConfig;
use crate::error::{GitflowError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const USER_AGENT: &str = concat!("gitflow-release/", env!("CARGO_PKG_VERSION"));

/// Creates a named release for an already pushed tag
pub trait ReleasePublisher {
    fn create_release(&self, tag: &str) -> Result<()>;
}

#[derive(Debug, Serialize, PartialEq)]
struct ReleaseRequest<'a> {
    name: &'a str,
    tag_name: &'a str,
    draft: bool,
    prerelease: bool,
    body: &'a str,
    generate_release_notes: bool,
}

impl<'a> ReleaseRequest<'a> {
    fn for_tag(tag: &'a str) -> Self {
        ReleaseRequest {
            name: tag,
            tag_name: tag,
            draft: false,
            prerelease: false,
            body: "",
            generate_release_notes: false,
        }
    }
}

/// GitHub REST client for `POST /repos/{owner}/{repo}/releases`
pub struct GithubReleaseClient {
    http_client: reqwest::blocking::Client,
    api_url: String,
    repository: Option<String>,
    token: Option<String>,
}

impl GithubReleaseClient {
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let http_client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(GithubReleaseClient {
            http_client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            repository: config.repository.clone(),
            token: config.token.clone(),
        })
    }

    fn releases_url(&self) -> Result<String> {
        let repository = self.repository.as_deref().ok_or_else(|| {
            GitflowError::config("GITHUB_REPOSITORY is required to create a release")
        })?;
        Ok(format!("{}/repos/{}/releases", self.api_url, repository))
    }
}

impl ReleasePublisher for GithubReleaseClient {
    fn create_release(&self, tag: &str) -> Result<()> {
        let url = self.releases_url()?;
        debug!("POST {}", url);

        let mut request = self
            .http_client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .json(&ReleaseRequest::for_tag(tag));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send()?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            error!("Failed to create release {}: HTTP {} {}", tag, status.as_u16(), body);
            return Err(GitflowError::remote_release(status.as_u16(), body));
        }

        info!("Created release {}", tag);
        Ok(())
    }
}
