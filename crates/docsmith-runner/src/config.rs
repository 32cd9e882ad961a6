use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser};
use tracing::info;

use docsmith_host::{host_for, CodeHost, HostConfig, HostKind};
use docsmith_kb::{KnowledgeBase, DEFAULT_TOP_K};
use docsmith_llm::{EmbeddingClient, HttpChat};
use docsmith_prompts::{analyzer, knowledge, writer};

use crate::agent::Agent;
use crate::pipeline::Crew;
use crate::tool::{KbSearchTool, RepoReportTool};

/// Everything needed to assemble a crew: chat backends, code host,
/// optional knowledge base. Shared between the CLI runner and the server.
#[derive(Debug, Args)]
pub struct PipelineSettings {
    /// Base URL of the OpenAI-compatible chat endpoint
    #[arg(long, env = "DOCSMITH_CHAT_ENDPOINT", default_value = "http://127.0.0.1:4000")]
    pub chat_endpoint: String,

    /// Model used for tool calling and data fetching
    #[arg(long, env = "DOCSMITH_TOOL_MODEL", default_value = "openai/gpt-oss-120b")]
    pub tool_model: String,

    /// Model used for writing the documentation
    #[arg(
        long,
        env = "DOCSMITH_WRITER_MODEL",
        default_value = "meta-llama/llama-3.3-70b-instruct"
    )]
    pub writer_model: String,

    /// Sampling temperature for the tool-calling model.
    /// Low by default for deterministic tool calls.
    #[arg(long, default_value = "0.3")]
    pub tool_temperature: f32,

    /// Sampling temperature for the writer model
    #[arg(long, default_value = "0.6")]
    pub writer_temperature: f32,

    /// Chat request timeout (seconds)
    #[arg(long, env = "DOCSMITH_LLM_TIMEOUT", default_value = "300")]
    pub llm_timeout: u64,

    /// Code host to fetch project data from (gitlab or github)
    #[arg(long, env = "DOCSMITH_HOST", default_value = "gitlab")]
    pub host: HostKind,

    /// Base URL of the code host (defaults to the public instance)
    #[arg(long, env = "DOCSMITH_HOST_URL")]
    pub host_url: Option<String>,

    /// Code-host access token; falls back to GITLAB_TOKEN / GITHUB_TOKEN
    #[arg(long, env = "DOCSMITH_HOST_TOKEN")]
    pub host_token: Option<String>,

    /// Path to the knowledge-base snapshot (JSONL)
    #[arg(long, env = "DOCSMITH_KB_SNAPSHOT", default_value = "kb_snapshot.jsonl")]
    pub kb_snapshot: PathBuf,

    /// URL of the embeddings endpoint
    #[arg(
        long,
        env = "DOCSMITH_EMBEDDING_ENDPOINT",
        default_value = "http://127.0.0.1:4000/embeddings"
    )]
    pub embedding_endpoint: String,

    /// Embedding model name
    #[arg(long, env = "DOCSMITH_EMBEDDING_MODEL", default_value = "embeddinggemma-300m")]
    pub embedding_model: String,

    /// Number of knowledge-base hits per query
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    pub top_k: usize,
}

#[derive(Debug, Parser)]
#[command(name = "docsmith-runner", about = "Docsmith documentation generator")]
pub struct RunnerConfig {
    /// Project to document, in 'namespace/project' format
    pub project: String,

    /// Also run the knowledge-base analyst
    #[arg(long)]
    pub with_kb: bool,

    /// Explicit output filename (derived from the project when omitted)
    #[arg(long)]
    pub output: Option<String>,

    /// Directory generated documents are written to
    #[arg(long, env = "DOCSMITH_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub pipeline: PipelineSettings,
}

impl PipelineSettings {
    /// Resolve the code-host token: the explicit flag wins, then the
    /// host-specific environment variable.
    pub fn resolve_host_token(&self) -> Option<String> {
        if self.host_token.is_some() {
            return self.host_token.clone();
        }
        let var = match self.host {
            HostKind::GitLab => "GITLAB_TOKEN",
            HostKind::GitHub => "GITHUB_TOKEN",
        };
        std::env::var(var).ok()
    }

    /// Build the code-host client from these settings.
    pub fn build_host(&self) -> Arc<dyn CodeHost> {
        let host_url = self
            .host_url
            .clone()
            .or_else(|| std::env::var("GITLAB_URL").ok().filter(|_| self.host == HostKind::GitLab));
        Arc::from(host_for(
            self.host,
            HostConfig {
                base_url: host_url,
                token: self.resolve_host_token(),
            },
        ))
    }

    /// Build the crew for one generation run.
    ///
    /// The tool-calling model drives the analyzer and KB analyst; the
    /// writer model runs without tools. The KB agent only materializes
    /// when requested and the snapshot loads.
    pub fn build_crew(&self, with_kb: bool) -> Crew {
        let timeout = Duration::from_secs(self.llm_timeout);
        let tool_backend = Arc::new(
            HttpChat::new(&self.chat_endpoint, &self.tool_model, self.tool_temperature)
                .with_tools()
                .with_timeout(timeout),
        );
        let writer_backend = Arc::new(
            HttpChat::new(&self.chat_endpoint, &self.writer_model, self.writer_temperature)
                .with_timeout(timeout),
        );

        let host = self.build_host();
        let analyzer_agent = Agent::new(analyzer::profile(), tool_backend.clone())
            .with_tool(Arc::new(RepoReportTool::new(host)));

        let kb_analyst = if with_kb {
            KnowledgeBase::load_if_available(&self.kb_snapshot).map(|kb| {
                let embedder = Arc::new(EmbeddingClient::new(
                    &self.embedding_endpoint,
                    &self.embedding_model,
                ));
                info!(snapshot = %self.kb_snapshot.display(), "knowledge base enabled");
                Agent::new(knowledge::profile(), tool_backend.clone()).with_tool(Arc::new(
                    KbSearchTool::new(Arc::new(kb), embedder, self.top_k),
                ))
            })
        } else {
            None
        };

        Crew {
            analyzer: analyzer_agent,
            kb_analyst,
            writer: Agent::new(writer::profile(), writer_backend),
        }
    }
}

impl RunnerConfig {
    pub fn build_crew(&self) -> Crew {
        self.pipeline.build_crew(self.with_kb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let config = RunnerConfig::parse_from(["docsmith-runner", "ns/app"]);
        assert_eq!(config.project, "ns/app");
        assert_eq!(config.pipeline.host, HostKind::GitLab);
        assert_eq!(config.pipeline.top_k, DEFAULT_TOP_K);
        assert!(!config.with_kb);
        assert!((config.pipeline.tool_temperature - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn host_flag_selects_github() {
        let config =
            RunnerConfig::parse_from(["docsmith-runner", "octo/app", "--host", "github"]);
        assert_eq!(config.pipeline.host, HostKind::GitHub);
    }

    #[test]
    fn crew_without_kb_has_no_kb_analyst() {
        let config = RunnerConfig::parse_from(["docsmith-runner", "ns/app"]);
        let crew = config.build_crew();
        assert!(crew.kb_analyst.is_none());
        assert!(crew.analyzer.has_tools());
        assert!(!crew.writer.has_tools());
    }

    #[test]
    fn missing_snapshot_disables_kb_agent() {
        let config = RunnerConfig::parse_from([
            "docsmith-runner",
            "ns/app",
            "--with-kb",
            "--kb-snapshot",
            "/nonexistent/kb.jsonl",
        ]);
        let crew = config.build_crew();
        assert!(crew.kb_analyst.is_none());
    }
}
