use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use docsmith_core::markdown::extract_markdown;
use docsmith_core::{GeneratedDoc, ProjectRef};

/// Write the generated document to disk and return its path.
///
/// Structured documents save as pretty JSON, text fallbacks as cleaned
/// markdown. An explicit filename wins over the derived
/// `documentation_{slug}` name.
pub fn save(
    doc: &GeneratedDoc,
    output_dir: &Path,
    explicit_name: Option<&str>,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("create output dir {}", output_dir.display()))?;

    let project = ProjectRef::parse(doc.project())?;
    let filename = match explicit_name {
        Some(name) => name.to_string(),
        None => {
            let ext = if doc.is_structured() { "json" } else { "md" };
            format!("documentation_{}.{ext}", project.slug())
        }
    };
    let path = output_dir.join(filename);

    let content = match doc {
        GeneratedDoc::Structured { .. } => serde_json::to_string_pretty(doc)?,
        GeneratedDoc::Text { documentation, .. } => extract_markdown(documentation),
    };

    fs::write(&path, content).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "documentation saved");
    Ok(path)
}
