//! GitHub Repository Client
//!
//! Thin proxy over the public repository listing, reshaped into the summary
//! the admin project editor links against.

use crate::error::ApiError;
use anyhow::{Context, Result};
use reqwest::{header, Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const USER_AGENT: &str = "portfolio-app";
const FALLBACK_MESSAGE: &str = "Failed to fetch GitHub repositories";

/// Upstream failure, carrying the message GitHub reported when it gave one
#[derive(Debug, Error)]
#[error("{0}")]
pub struct UpstreamError(pub String);

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        ApiError::Upstream(err.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoSummary {
    pub id: i64,
    pub repo_name: String,
    pub full_name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub language: Option<String>,
    pub topics: Vec<String>,
    pub forks: u64,
    pub stars: u64,
    pub last_pushed_at: Option<String>,
    pub default_branch: Option<String>,
    pub visibility: Option<String>,
}

/// Repository as returned by `GET /users/{username}/repos`
#[derive(Debug, Deserialize)]
struct GithubRepo {
    id: i64,
    name: String,
    full_name: String,
    html_url: String,
    description: Option<String>,
    homepage: Option<String>,
    language: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    stargazers_count: u64,
    pushed_at: Option<String>,
    default_branch: Option<String>,
    visibility: Option<String>,
}

impl From<GithubRepo> for RepoSummary {
    fn from(repo: GithubRepo) -> Self {
        Self {
            id: repo.id,
            repo_name: repo.name,
            full_name: repo.full_name,
            html_url: repo.html_url,
            description: repo.description,
            homepage: repo.homepage,
            language: repo.language,
            topics: repo.topics,
            forks: repo.forks_count,
            stars: repo.stargazers_count,
            last_pushed_at: repo.pushed_at,
            default_branch: repo.default_branch,
            visibility: repo.visibility,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GithubErrorBody {
    message: Option<String>,
}

#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    base_url: Url,
    default_username: String,
}

impl GithubClient {
    pub fn new(base_url: &str, default_username: &str, token: Option<&str>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            headers.insert(
                header::AUTHORIZATION,
                format!("Bearer {}", token.trim())
                    .parse()
                    .context("Invalid GitHub token")?,
            );
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .context("Failed to build GithubClient")?;

        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid GitHub API base URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("GitHub API base URL cannot carry a path: {}", base_url);
        }

        Ok(Self {
            client,
            base_url,
            default_username: default_username.to_string(),
        })
    }

    /// Up to 100 repositories, most recently updated first
    pub async fn list_repos(
        &self,
        username: Option<&str>,
    ) -> std::result::Result<Vec<RepoSummary>, UpstreamError> {
        let username = username
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(self.default_username.as_str());
        let url = self.repos_url(username);

        let resp = self
            .client
            .get(url)
            .query(&[("per_page", "100"), ("sort", "updated")])
            .send()
            .await
            .map_err(|e| {
                warn!("GitHub request failed: {}", e);
                UpstreamError(FALLBACK_MESSAGE.to_string())
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let message = resp
                .json::<GithubErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
            warn!(%status, username, "GitHub returned an error: {}", message);
            return Err(UpstreamError(message));
        }

        let repos = resp.json::<Vec<GithubRepo>>().await.map_err(|e| {
            warn!("Failed to parse GitHub repositories: {}", e);
            UpstreamError(FALLBACK_MESSAGE.to_string())
        })?;

        debug!(username, count = repos.len(), "Fetched GitHub repositories");
        Ok(repos.into_iter().map(RepoSummary::from).collect())
    }

    /// `{base}/users/{username}/repos` with the username escaped as one segment
    fn repos_url(&self, username: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["users", username, "repos"]);
        }
        url
    }
}
