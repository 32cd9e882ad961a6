pub mod github;
pub mod gitlab;
pub mod mock;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use docsmith_core::{Commit, ProjectInfo, ProjectRef, RepoReport, TreeEntry};

/// How many file-tree entries a report carries at most.
pub const TREE_LIMIT: usize = 20;
/// How many recent commits a report carries.
pub const COMMIT_LIMIT: usize = 5;
/// READMEs are truncated to this many characters before being handed to a
/// model.
pub const README_LIMIT: usize = 1000;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("transport error: {0}")]
    Http(String),

    #[error("unsupported host: {0}")]
    Unsupported(String),
}

/// Which code host to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    GitLab,
    GitHub,
}

impl fmt::Display for HostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostKind::GitLab => f.write_str("gitlab"),
            HostKind::GitHub => f.write_str("github"),
        }
    }
}

impl FromStr for HostKind {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gitlab" => Ok(HostKind::GitLab),
            "github" => Ok(HostKind::GitHub),
            other => Err(HostError::Unsupported(other.to_string())),
        }
    }
}

/// Connection settings for a code host.
#[derive(Debug, Clone, Default)]
pub struct HostConfig {
    /// Base URL, e.g. `https://gitlab.example.com` or
    /// `https://api.github.com`. Each client has a sensible default.
    pub base_url: Option<String>,
    /// Access token. Required for GitLab, optional for GitHub.
    pub token: Option<String>,
}

/// A read-only client for one code host's REST API.
#[async_trait]
pub trait CodeHost: Send + Sync {
    /// Host name for logging ("gitlab", "github", "mock").
    fn name(&self) -> &str;

    async fn project_info(&self, project: &ProjectRef) -> Result<ProjectInfo, HostError>;

    /// First `TREE_LIMIT` entries of the repository root tree.
    async fn file_tree(&self, project: &ProjectRef) -> Result<Vec<TreeEntry>, HostError>;

    async fn recent_commits(
        &self,
        project: &ProjectRef,
        limit: usize,
    ) -> Result<Vec<Commit>, HostError>;

    /// The project README, truncated to `README_LIMIT` characters.
    /// `Ok(None)` means no README was found on the usual branches.
    async fn readme(
        &self,
        project: &ProjectRef,
        default_branch: Option<&str>,
    ) -> Result<Option<String>, HostError>;
}

/// Return the client for a host kind.
pub fn host_for(kind: HostKind, config: HostConfig) -> Box<dyn CodeHost> {
    match kind {
        HostKind::GitLab => Box::new(gitlab::GitLabHost::new(config)),
        HostKind::GitHub => Box::new(github::GitHubHost::new(config)),
    }
}

/// Fetch everything the analyzer agent needs in one report.
///
/// Project info is essential; tree, commits and README failures are
/// downgraded to warnings so a partially broken project still documents.
pub async fn gather_report(
    host: &dyn CodeHost,
    project: &ProjectRef,
) -> Result<RepoReport, HostError> {
    let info = host.project_info(project).await?;
    let mut warnings = Vec::new();

    let file_tree = match host.file_tree(project).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!(host = host.name(), %project, "file tree fetch failed: {e}");
            warnings.push(format!("file tree unavailable: {e}"));
            Vec::new()
        }
    };

    let recent_commits = match host.recent_commits(project, COMMIT_LIMIT).await {
        Ok(commits) => commits,
        Err(e) => {
            warn!(host = host.name(), %project, "commit fetch failed: {e}");
            warnings.push(format!("recent commits unavailable: {e}"));
            Vec::new()
        }
    };

    let readme = match host.readme(project, info.default_branch.as_deref()).await {
        Ok(readme) => readme,
        Err(e) => {
            warn!(host = host.name(), %project, "readme fetch failed: {e}");
            warnings.push(format!("README unavailable: {e}"));
            None
        }
    };

    Ok(RepoReport {
        project: project.path().to_string(),
        info,
        file_tree,
        recent_commits,
        readme,
        warnings,
    })
}

/// Percent-encode a project path for use as a single URL path segment
/// (GitLab wants `group/app` as `group%2Fapp`).
pub(crate) fn encode_path_segment(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

/// Truncate text to `README_LIMIT` characters on a char boundary, appending
/// an ellipsis marker when anything was cut.
pub(crate) fn truncate_readme(text: &str) -> String {
    if text.chars().count() <= README_LIMIT {
        return text.to_string();
    }
    let truncated: String = text.chars().take(README_LIMIT).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockHost;

    #[test]
    fn host_kind_from_str() {
        assert_eq!("gitlab".parse::<HostKind>().unwrap(), HostKind::GitLab);
        assert_eq!("GitHub".parse::<HostKind>().unwrap(), HostKind::GitHub);
        assert!(matches!(
            "bitbucket".parse::<HostKind>(),
            Err(HostError::Unsupported(_))
        ));
    }

    #[test]
    fn factory_returns_named_clients() {
        let gl = host_for(HostKind::GitLab, HostConfig::default());
        assert_eq!(gl.name(), "gitlab");
        let gh = host_for(HostKind::GitHub, HostConfig::default());
        assert_eq!(gh.name(), "github");
    }

    #[test]
    fn encodes_project_paths() {
        assert_eq!(encode_path_segment("group/app"), "group%2Fapp");
        assert_eq!(
            encode_path_segment("group/sub group/app"),
            "group%2Fsub%20group%2Fapp"
        );
        assert_eq!(encode_path_segment("plain-name_1.0~x"), "plain-name_1.0~x");
    }

    #[test]
    fn truncates_long_readmes() {
        let long = "x".repeat(README_LIMIT + 50);
        let out = truncate_readme(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), README_LIMIT + 3);

        let short = "short readme";
        assert_eq!(truncate_readme(short), short);
    }

    #[tokio::test]
    async fn gather_report_downgrades_section_failures() {
        let project = ProjectRef::parse("ns/app").unwrap();
        let host = MockHost::new("ns/app").with_failing_sections();
        let report = gather_report(&host, &project).await.unwrap();
        assert_eq!(report.info.path_with_namespace, "ns/app");
        assert!(report.file_tree.is_empty());
        assert_eq!(report.warnings.len(), 3);
    }

    #[tokio::test]
    async fn gather_report_fails_without_project_info() {
        let project = ProjectRef::parse("ns/missing").unwrap();
        let host = MockHost::not_found();
        let err = gather_report(&host, &project).await.unwrap_err();
        assert!(matches!(err, HostError::NotFound(_)));
    }
}
