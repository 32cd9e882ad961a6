use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};

use docsmith_core::ProjectRef;
use docsmith_host::CodeHost;
use docsmith_kb::{semantic_search, KnowledgeBase};
use docsmith_llm::{EmbeddingClient, ToolSpec};

/// A function an agent may call during its task.
///
/// Arguments arrive as the JSON object the model produced; the result is a
/// JSON string payload. Failures are encoded as `{"error": ...}` payloads
/// so the model can react instead of the whole run aborting.
#[async_trait]
pub trait AgentTool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema of the arguments object.
    fn parameters(&self) -> Value;

    async fn invoke(&self, args: Value) -> String;
}

/// Build the wire spec advertised to the model for a tool.
pub fn spec_for(tool: &dyn AgentTool) -> ToolSpec {
    ToolSpec {
        name: tool.name().to_string(),
        description: tool.description().to_string(),
        parameters: tool.parameters(),
    }
}

/// Serialize a tool error into the payload convention.
pub fn error_payload(message: &str) -> String {
    json!({ "error": message }).to_string()
}

/// Fetches the full repository report from the code host.
pub struct RepoReportTool {
    host: Arc<dyn CodeHost>,
}

impl RepoReportTool {
    pub fn new(host: Arc<dyn CodeHost>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl AgentTool for RepoReportTool {
    fn name(&self) -> &str {
        docsmith_prompts::analyzer::TOOL_NAME
    }

    fn description(&self) -> &str {
        "Analyzes a code-host project and returns its metadata, file \
         structure, recent commits, and README. Input is the project path \
         in 'namespace/project' format. Returns project data as JSON, not \
         knowledge-base articles."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "project": {
                    "type": "string",
                    "description": "Project in 'namespace/project' format"
                }
            },
            "required": ["project"]
        })
    }

    async fn invoke(&self, args: Value) -> String {
        let Some(path) = args.get("project").and_then(Value::as_str) else {
            return error_payload("missing required argument: project");
        };
        let project = match ProjectRef::parse(path) {
            Ok(p) => p,
            Err(e) => return error_payload(&e.to_string()),
        };

        info!(host = self.host.name(), %project, "repo report tool called");
        match docsmith_host::gather_report(self.host.as_ref(), &project).await {
            Ok(report) => serde_json::to_string_pretty(&report)
                .unwrap_or_else(|e| error_payload(&format!("serialize report: {e}"))),
            Err(e) => {
                warn!("repo report failed: {e}");
                error_payload(&e.to_string())
            }
        }
    }
}

/// Semantic search over the internal knowledge base.
pub struct KbSearchTool {
    kb: Arc<KnowledgeBase>,
    embedder: Arc<EmbeddingClient>,
    top_k: usize,
}

impl KbSearchTool {
    pub fn new(kb: Arc<KnowledgeBase>, embedder: Arc<EmbeddingClient>, top_k: usize) -> Self {
        Self {
            kb,
            embedder,
            top_k,
        }
    }
}

#[async_trait]
impl AgentTool for KbSearchTool {
    fn name(&self) -> &str {
        docsmith_prompts::knowledge::TOOL_NAME
    }

    fn description(&self) -> &str {
        "Searches the internal knowledge base with semantic search. This is \
         NOT the code-host tool: it returns knowledge-base snippets tagged \
         with a 'source' field, never project files or commits. Input is a \
         natural-language query."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Natural-language search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn invoke(&self, args: Value) -> String {
        let Some(query) = args.get("query").and_then(Value::as_str) else {
            return error_payload("missing required argument: query");
        };

        info!(query, "knowledge base tool called");
        match semantic_search(&self.kb, &self.embedder, query, self.top_k).await {
            Ok(outcome) => serde_json::to_string_pretty(&outcome)
                .unwrap_or_else(|e| error_payload(&format!("serialize results: {e}"))),
            Err(e) => {
                warn!("knowledge base search failed: {e}");
                error_payload(&e.to_string())
            }
        }
    }
}
