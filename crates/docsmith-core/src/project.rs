use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DocsmithError;

/// A validated code-host project path in `namespace/project` form.
///
/// GitLab allows nested namespaces (`group/subgroup/project`), so anything
/// with at least two non-empty segments is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectRef {
    path: String,
}

impl ProjectRef {
    pub fn parse(input: &str) -> Result<Self, DocsmithError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DocsmithError::InvalidInput(
                "project path is empty".into(),
            ));
        }
        if trimmed.starts_with('/') || trimmed.ends_with('/') {
            return Err(DocsmithError::InvalidInput(format!(
                "project path must not start or end with '/': {trimmed}"
            )));
        }
        let segments: Vec<&str> = trimmed.split('/').collect();
        if segments.len() < 2 {
            return Err(DocsmithError::InvalidInput(format!(
                "expected 'namespace/project', got: {trimmed}"
            )));
        }
        if segments.iter().any(|s| s.trim().is_empty()) {
            return Err(DocsmithError::InvalidInput(format!(
                "project path has an empty segment: {trimmed}"
            )));
        }
        Ok(Self {
            path: trimmed.to_string(),
        })
    }

    /// The full path as given, e.g. `group/subgroup/project`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The final path segment (the project name itself).
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Filesystem-safe identifier used in output filenames:
    /// `group/app` -> `group_app`.
    pub fn slug(&self) -> String {
        self.path.replace('/', "_")
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl FromStr for ProjectRef {
    type Err = DocsmithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProjectRef {
    type Error = DocsmithError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProjectRef> for String {
    fn from(value: ProjectRef) -> Self {
        value.path
    }
}
