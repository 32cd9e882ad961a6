use serde::{Deserialize, Serialize};

/// Project metadata as returned by the code-host API.
///
/// Timestamps stay in the host's own string format; nothing here does date
/// arithmetic, the values are passed through to the writer model verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub id: Option<u64>,
    pub name: String,
    pub path_with_namespace: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(default)]
    pub star_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_activity_at: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
}

/// One entry from the repository file tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEntry {
    pub name: String,
    pub path: String,
    /// "blob" for files, "tree" for directories.
    pub kind: String,
    #[serde(default)]
    pub mode: Option<String>,
}

/// A recent commit, trimmed to the fields the writer model cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub short_id: String,
    pub title: String,
    #[serde(default)]
    pub message: String,
    pub author_name: String,
    #[serde(default)]
    pub authored_date: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
}

/// Everything the analyzer agent fetches about a project in one shot.
///
/// Non-essential sections (tree, commits, README) that fail to fetch are
/// recorded in `warnings` instead of aborting the whole report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoReport {
    pub project: String,
    pub info: ProjectInfo,
    #[serde(default)]
    pub file_tree: Vec<TreeEntry>,
    #[serde(default)]
    pub recent_commits: Vec<Commit>,
    #[serde(default)]
    pub readme: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}
