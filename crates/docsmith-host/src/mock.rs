use async_trait::async_trait;

use docsmith_core::{Commit, ProjectInfo, ProjectRef, TreeEntry};

use crate::{CodeHost, HostError};

/// A mock code host returning canned data, for pipeline and report tests.
pub struct MockHost {
    info: Option<ProjectInfo>,
    sections_fail: bool,
}

impl MockHost {
    /// A mock for an existing project with a small canned repository.
    pub fn new(path: &str) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        Self {
            info: Some(ProjectInfo {
                id: Some(42),
                name,
                path_with_namespace: path.to_string(),
                description: Some("A mock project".into()),
                default_branch: Some("main".into()),
                visibility: Some("private".into()),
                star_count: 3,
                forks_count: 1,
                open_issues_count: 2,
                topics: vec!["rust".into()],
                created_at: Some("2024-01-01T00:00:00Z".into()),
                last_activity_at: Some("2025-06-01T00:00:00Z".into()),
                web_url: Some(format!("https://mock.example/{path}")),
                license: Some("MIT".into()),
            }),
            sections_fail: false,
        }
    }

    /// A mock where every call reports the project missing.
    pub fn not_found() -> Self {
        Self {
            info: None,
            sections_fail: false,
        }
    }

    /// Make tree/commits/readme fail while project info still succeeds.
    pub fn with_failing_sections(mut self) -> Self {
        self.sections_fail = true;
        self
    }

    fn section_guard(&self) -> Result<(), HostError> {
        if self.sections_fail {
            Err(HostError::Api {
                status: 500,
                body: "mock section failure".into(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CodeHost for MockHost {
    fn name(&self) -> &str {
        "mock"
    }

    async fn project_info(&self, project: &ProjectRef) -> Result<ProjectInfo, HostError> {
        self.info
            .clone()
            .ok_or_else(|| HostError::NotFound(format!("no such project: {project}")))
    }

    async fn file_tree(&self, _project: &ProjectRef) -> Result<Vec<TreeEntry>, HostError> {
        self.section_guard()?;
        Ok(vec![
            TreeEntry {
                name: "src".into(),
                path: "src".into(),
                kind: "tree".into(),
                mode: None,
            },
            TreeEntry {
                name: "README.md".into(),
                path: "README.md".into(),
                kind: "blob".into(),
                mode: None,
            },
        ])
    }

    async fn recent_commits(
        &self,
        _project: &ProjectRef,
        limit: usize,
    ) -> Result<Vec<Commit>, HostError> {
        self.section_guard()?;
        let commit = Commit {
            short_id: "abc1234".into(),
            title: "Initial commit".into(),
            message: "Initial commit".into(),
            author_name: "Dev".into(),
            authored_date: Some("2025-05-01T00:00:00Z".into()),
            web_url: None,
        };
        Ok(std::iter::repeat_with(|| commit.clone())
            .take(limit.min(1))
            .collect())
    }

    async fn readme(
        &self,
        _project: &ProjectRef,
        _default_branch: Option<&str>,
    ) -> Result<Option<String>, HostError> {
        self.section_guard()?;
        Ok(Some("# Mock project\n\nDoes mock things.".into()))
    }
}
