pub mod document;
pub mod error;
pub mod markdown;
pub mod project;
pub mod report;

pub use document::{Documentation, GeneratedDoc};
pub use error::DocsmithError;
pub use project::ProjectRef;
pub use report::{Commit, ProjectInfo, RepoReport, TreeEntry};
