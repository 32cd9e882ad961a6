use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use docsmith_core::{Commit, ProjectInfo, ProjectRef, TreeEntry};

use crate::{truncate_readme, CodeHost, HostConfig, HostError, TREE_LIMIT};

const DEFAULT_BASE_URL: &str = "https://api.github.com";
/// GitHub rejects requests without a User-Agent.
const USER_AGENT: &str = "docsmith";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";

/// GitHub REST API client. The token is optional; unauthenticated requests
/// work for public repositories within rate limits.
pub struct GitHubHost {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl GitHubHost {
    pub fn new(config: HostConfig) -> Self {
        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Self {
            base_url,
            token: config.token,
            client: Client::new(),
        }
    }

    fn repo_url(&self, project: &ProjectRef, suffix: &str) -> String {
        format!("{}/repos/{}{}", self.base_url, project.path(), suffix)
    }

    fn prepare(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header("User-Agent", USER_AGENT);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get(&self, url: &str, accept: Option<&str>) -> Result<Response, HostError> {
        let mut builder = self.prepare(self.client.get(url));
        if let Some(accept) = accept {
            builder = builder.header("Accept", accept);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| HostError::Http(e.to_string()))?;
        check_status(response).await
    }
}

#[async_trait]
impl CodeHost for GitHubHost {
    fn name(&self) -> &str {
        "github"
    }

    async fn project_info(&self, project: &ProjectRef) -> Result<ProjectInfo, HostError> {
        let url = self.repo_url(project, "");
        debug!(%project, "fetching github repo info");
        let raw: GitHubRepo = self
            .get(&url, None)
            .await?
            .json()
            .await
            .map_err(|e| HostError::Http(format!("decode repo info: {e}")))?;
        Ok(raw.into())
    }

    async fn file_tree(&self, project: &ProjectRef) -> Result<Vec<TreeEntry>, HostError> {
        let url = self.repo_url(project, "/contents");
        let raw: Vec<GitHubContent> = self
            .get(&url, None)
            .await?
            .json()
            .await
            .map_err(|e| HostError::Http(format!("decode contents: {e}")))?;
        Ok(raw
            .into_iter()
            .take(TREE_LIMIT)
            .map(|e| TreeEntry {
                name: e.name,
                path: e.path,
                // Normalize to the git object terms the report uses.
                kind: match e.kind.as_str() {
                    "dir" => "tree".to_string(),
                    _ => "blob".to_string(),
                },
                mode: None,
            })
            .collect())
    }

    async fn recent_commits(
        &self,
        project: &ProjectRef,
        limit: usize,
    ) -> Result<Vec<Commit>, HostError> {
        let url = self.repo_url(project, &format!("/commits?per_page={limit}"));
        let raw: Vec<GitHubCommit> = self
            .get(&url, None)
            .await?
            .json()
            .await
            .map_err(|e| HostError::Http(format!("decode commits: {e}")))?;
        Ok(raw
            .into_iter()
            .map(|c| {
                let title = c
                    .commit
                    .message
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .to_string();
                let (author_name, authored_date) = match c.commit.author {
                    Some(author) => (author.name, author.date),
                    None => (String::new(), None),
                };
                Commit {
                    short_id: c.sha.chars().take(7).collect(),
                    title,
                    message: c.commit.message,
                    author_name,
                    authored_date,
                    web_url: c.html_url,
                }
            })
            .collect())
    }

    async fn readme(
        &self,
        project: &ProjectRef,
        _default_branch: Option<&str>,
    ) -> Result<Option<String>, HostError> {
        // GitHub resolves the README itself; no filename probing needed.
        let url = self.repo_url(project, "/readme");
        match self.get(&url, Some(RAW_MEDIA_TYPE)).await {
            Ok(response) => {
                let text = response
                    .text()
                    .await
                    .map_err(|e| HostError::Http(format!("read readme: {e}")))?;
                Ok(Some(truncate_readme(&text)))
            }
            Err(HostError::NotFound(_)) => Ok(None),
            Err(other) => Err(other),
        }
    }
}

async fn check_status(response: Response) -> Result<Response, HostError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(HostError::Auth(format!(
            "github rejected the request ({status}): {body}"
        ))),
        StatusCode::NOT_FOUND => Err(HostError::NotFound(body)),
        _ => Err(HostError::Api {
            status: status.as_u16(),
            body,
        }),
    }
}

#[derive(Debug, Deserialize)]
struct GitHubRepo {
    id: Option<u64>,
    name: String,
    full_name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    default_branch: Option<String>,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    pushed_at: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    license: Option<GitHubLicense>,
}

#[derive(Debug, Deserialize)]
struct GitHubLicense {
    #[serde(default)]
    name: Option<String>,
}

impl From<GitHubRepo> for ProjectInfo {
    fn from(raw: GitHubRepo) -> Self {
        ProjectInfo {
            id: raw.id,
            name: raw.name,
            path_with_namespace: raw.full_name,
            description: raw.description,
            default_branch: raw.default_branch,
            visibility: Some(if raw.private { "private" } else { "public" }.to_string()),
            star_count: raw.stargazers_count,
            forks_count: raw.forks_count,
            open_issues_count: raw.open_issues_count,
            topics: raw.topics,
            created_at: raw.created_at,
            last_activity_at: raw.pushed_at,
            web_url: raw.html_url,
            license: raw.license.and_then(|l| l.name),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitHubContent {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct GitHubCommit {
    sha: String,
    commit: GitHubCommitDetail,
    #[serde(default)]
    html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    author: Option<GitHubCommitAuthor>,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitAuthor {
    #[serde(default)]
    name: String,
    #[serde(default)]
    date: Option<String>,
}
