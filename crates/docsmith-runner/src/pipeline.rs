use anyhow::Result;
use tracing::{info, warn};

use docsmith_core::markdown::strip_code_fences;
use docsmith_core::{Documentation, GeneratedDoc, ProjectRef};
use docsmith_prompts::{analyzer, knowledge, writer, PipelineContext};

use crate::agent::Agent;
use crate::executor;

/// The agents taking part in one generation run. `kb_analyst` is `None`
/// when the knowledge base is disabled or unavailable.
pub struct Crew {
    pub analyzer: Agent,
    pub kb_analyst: Option<Agent>,
    pub writer: Agent,
}

/// Execute the sequential pipeline: analyzer, optional KB analyst, writer.
/// Each task sees the outputs of the tasks before it.
pub async fn execute(crew: &Crew, project: &ProjectRef) -> Result<GeneratedDoc> {
    let mut ctx = PipelineContext::new(project);

    // 1. Fetch project data through the code-host tool.
    info!(%project, "step 1/3: repository analysis");
    let analysis = executor::run_agent(&crew.analyzer, &analyzer::task(project), &ctx).await?;
    ctx.record(&crew.analyzer.profile.role, &analysis);

    // 2. Optional knowledge-base pass.
    match &crew.kb_analyst {
        Some(kb_agent) => {
            info!(%project, "step 2/3: knowledge base search");
            match executor::run_agent(kb_agent, &knowledge::task(project), &ctx).await {
                Ok(findings) => ctx.record(&kb_agent.profile.role, &findings),
                // KB findings are supporting material; a failed pass must
                // not sink the run.
                Err(e) => warn!("knowledge base task failed, continuing without it: {e}"),
            }
        }
        None => info!(%project, "step 2/3: knowledge base disabled, skipping"),
    }

    // 3. Write the documentation from the gathered context.
    info!(%project, "step 3/3: writing documentation");
    let raw = executor::run_agent(&crew.writer, &writer::task(project), &ctx).await?;

    Ok(parse_writer_output(project, &raw))
}

/// Parse the writer model's output into the structured document, falling
/// back to a text wrapper when it is not the JSON we asked for.
pub fn parse_writer_output(project: &ProjectRef, raw: &str) -> GeneratedDoc {
    let candidate = strip_code_fences(raw);
    match serde_json::from_str::<Documentation>(candidate) {
        Ok(documentation) => GeneratedDoc::Structured {
            project: project.path().to_string(),
            documentation,
        },
        Err(e) => {
            warn!("writer output was not valid JSON ({e}); keeping raw text");
            GeneratedDoc::Text {
                project: project.path().to_string(),
                documentation: raw.to_string(),
                note: "documentation could not be parsed as JSON, returned as text".into(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> ProjectRef {
        ProjectRef::parse("ns/app").unwrap()
    }

    #[test]
    fn parses_bare_json() {
        let raw = r#"{"overview": {"name": "app"}, "features": ["x"]}"#;
        let doc = parse_writer_output(&project(), raw);
        match doc {
            GeneratedDoc::Structured { documentation, .. } => {
                assert_eq!(documentation.overview.name, "app");
                assert_eq!(documentation.features, vec!["x"]);
            }
            other => panic!("expected structured doc, got {other:?}"),
        }
    }

    #[test]
    fn parses_fenced_json() {
        let raw = "```json\n{\"overview\": {\"name\": \"app\"}}\n```";
        assert!(parse_writer_output(&project(), raw).is_structured());
    }

    #[test]
    fn falls_back_to_text() {
        let raw = "Sorry, here is some prose instead of JSON.";
        let doc = parse_writer_output(&project(), raw);
        match doc {
            GeneratedDoc::Text {
                documentation,
                note,
                ..
            } => {
                assert_eq!(documentation, raw);
                assert!(note.contains("not be parsed"));
            }
            other => panic!("expected text doc, got {other:?}"),
        }
    }
}
