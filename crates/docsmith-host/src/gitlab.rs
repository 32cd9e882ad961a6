use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use docsmith_core::{Commit, ProjectInfo, ProjectRef, TreeEntry};

use crate::{
    encode_path_segment, truncate_readme, CodeHost, HostConfig, HostError, TREE_LIMIT,
};

const DEFAULT_BASE_URL: &str = "https://gitlab.com";

/// README filenames probed in order, matching what GitLab renders.
const README_CANDIDATES: &[&str] = &["README.md", "README", "readme.md", "Readme.md"];

/// GitLab REST API v4 client. Authenticates with a `PRIVATE-TOKEN` header.
pub struct GitLabHost {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl GitLabHost {
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

    fn api_url(&self, project: &ProjectRef, suffix: &str) -> String {
        format!(
            "{}/api/v4/projects/{}{}",
            self.base_url,
            encode_path_segment(project.path()),
            suffix
        )
    }

    fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder, HostError> {
        match &self.token {
            Some(token) => Ok(builder.header("PRIVATE-TOKEN", token)),
            None => Err(HostError::Auth(
                "GITLAB_TOKEN not set; a token is required for the GitLab API".into(),
            )),
        }
    }

    async fn get(&self, url: &str) -> Result<Response, HostError> {
        let builder = self.authed(self.client.get(url))?;
        let response = builder
            .send()
            .await
            .map_err(|e| HostError::Http(e.to_string()))?;
        check_status(response).await
    }
}

#[async_trait]
impl CodeHost for GitLabHost {
    fn name(&self) -> &str {
        "gitlab"
    }

    async fn project_info(&self, project: &ProjectRef) -> Result<ProjectInfo, HostError> {
        let url = self.api_url(project, "");
        debug!(%project, "fetching gitlab project info");
        let raw: GitLabProject = self
            .get(&url)
            .await?
            .json()
            .await
            .map_err(|e| HostError::Http(format!("decode project info: {e}")))?;
        Ok(raw.into())
    }

    async fn file_tree(&self, project: &ProjectRef) -> Result<Vec<TreeEntry>, HostError> {
        let url = self.api_url(
            project,
            &format!("/repository/tree?per_page={TREE_LIMIT}"),
        );
        let raw: Vec<GitLabTreeEntry> = self
            .get(&url)
            .await?
            .json()
            .await
            .map_err(|e| HostError::Http(format!("decode tree: {e}")))?;
        Ok(raw
            .into_iter()
            .take(TREE_LIMIT)
            .map(|e| TreeEntry {
                name: e.name,
                path: e.path,
                kind: e.kind,
                mode: e.mode,
            })
            .collect())
    }

    async fn recent_commits(
        &self,
        project: &ProjectRef,
        limit: usize,
    ) -> Result<Vec<Commit>, HostError> {
        let url = self.api_url(project, &format!("/repository/commits?per_page={limit}"));
        let raw: Vec<GitLabCommit> = self
            .get(&url)
            .await?
            .json()
            .await
            .map_err(|e| HostError::Http(format!("decode commits: {e}")))?;
        Ok(raw
            .into_iter()
            .map(|c| Commit {
                short_id: c.short_id,
                title: c.title,
                message: c.message,
                author_name: c.author_name,
                authored_date: c.authored_date,
                web_url: c.web_url,
            })
            .collect())
    }

    async fn readme(
        &self,
        project: &ProjectRef,
        default_branch: Option<&str>,
    ) -> Result<Option<String>, HostError> {
        // Default branch first, then the usual suspects.
        let mut refs = Vec::new();
        if let Some(branch) = default_branch {
            refs.push(branch);
        }
        for fallback in ["main", "master"] {
            if !refs.contains(&fallback) {
                refs.push(fallback);
            }
        }

        for name in README_CANDIDATES {
            for git_ref in &refs {
                let url = self.api_url(
                    project,
                    &format!(
                        "/repository/files/{}/raw?ref={git_ref}",
                        encode_path_segment(name)
                    ),
                );
                match self.get(&url).await {
                    Ok(response) => {
                        let text = response
                            .text()
                            .await
                            .map_err(|e| HostError::Http(format!("read readme: {e}")))?;
                        return Ok(Some(truncate_readme(&text)));
                    }
                    Err(HostError::NotFound(_)) => continue,
                    Err(other) => return Err(other),
                }
            }
        }
        Ok(None)
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
            "gitlab rejected the token ({status}): {body}"
        ))),
        StatusCode::NOT_FOUND => Err(HostError::NotFound(body)),
        _ => Err(HostError::Api {
            status: status.as_u16(),
            body,
        }),
    }
}

#[derive(Debug, Deserialize)]
struct GitLabProject {
    id: Option<u64>,
    name: String,
    path_with_namespace: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    default_branch: Option<String>,
    #[serde(default)]
    visibility: Option<String>,
    #[serde(default)]
    star_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    last_activity_at: Option<String>,
    #[serde(default)]
    web_url: Option<String>,
    #[serde(default)]
    license: Option<GitLabLicense>,
}

#[derive(Debug, Deserialize)]
struct GitLabLicense {
    #[serde(default)]
    name: Option<String>,
}

impl From<GitLabProject> for ProjectInfo {
    fn from(raw: GitLabProject) -> Self {
        ProjectInfo {
            id: raw.id,
            name: raw.name,
            path_with_namespace: raw.path_with_namespace,
            description: raw.description,
            default_branch: raw.default_branch,
            visibility: raw.visibility,
            star_count: raw.star_count,
            forks_count: raw.forks_count,
            open_issues_count: raw.open_issues_count,
            topics: raw.topics,
            created_at: raw.created_at,
            last_activity_at: raw.last_activity_at,
            web_url: raw.web_url,
            license: raw.license.and_then(|l| l.name),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitLabTreeEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    mode: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitLabCommit {
    short_id: String,
    title: String,
    #[serde(default)]
    message: String,
    author_name: String,
    #[serde(default)]
    authored_date: Option<String>,
    #[serde(default)]
    web_url: Option<String>,
}
