//! Full pipeline runs against mock backends and a mock code host.

use std::io::Write;
use std::sync::Arc;

use docsmith_core::{GeneratedDoc, ProjectRef};
use docsmith_host::mock::MockHost;
use docsmith_kb::KnowledgeBase;
use docsmith_llm::{EmbeddingClient, MockChat};
use docsmith_prompts::{analyzer, knowledge, writer};
use docsmith_runner::pipeline::{self, Crew};
use docsmith_runner::tool::{KbSearchTool, RepoReportTool};
use docsmith_runner::Agent;
use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const WRITER_JSON: &str = r#"{
  "overview": {"name": "app", "description": "mock app", "purpose": "testing",
               "default_branch": "main", "visibility": "private", "license": "MIT"},
  "features": ["does things"],
  "tech_stack": {"topics": ["rust"], "dependencies": "tokio"},
  "structure": {"main_files": [{"name": "src", "purpose": "sources"}]},
  "activity": {"stars": 3, "forks": 1, "open_issues": 2, "last_activity": "2025-06-01"},
  "getting_started": {"installation": "cargo build", "usage": "run it",
                      "project_url": "https://mock.example/ns/app"}
}"#;

fn analyzer_agent(script: Vec<docsmith_llm::ChatResponse>) -> Agent {
    let host = Arc::new(MockHost::new("ns/app"));
    Agent::new(analyzer::profile(), Arc::new(MockChat::new(script)))
        .with_tool(Arc::new(RepoReportTool::new(host)))
}

fn writer_agent(output: &str) -> Agent {
    Agent::new(writer::profile(), Arc::new(MockChat::always(output)))
}

#[tokio::test]
async fn two_agent_run_produces_structured_doc() {
    let crew = Crew {
        analyzer: analyzer_agent(vec![
            MockChat::tool_call_response(
                "c1",
                analyzer::TOOL_NAME,
                "{\"project\":\"ns/app\"}",
            ),
            MockChat::text_response("Tool called successfully. Raw data: {...}"),
        ]),
        kb_analyst: None,
        writer: writer_agent(WRITER_JSON),
    };

    let project = ProjectRef::parse("ns/app").unwrap();
    let doc = pipeline::execute(&crew, &project).await.unwrap();

    match doc {
        GeneratedDoc::Structured {
            project,
            documentation,
        } => {
            assert_eq!(project, "ns/app");
            assert_eq!(documentation.overview.name, "app");
            assert_eq!(documentation.activity.stars, 3);
        }
        other => panic!("expected structured doc, got {other:?}"),
    }
}

#[tokio::test]
async fn writer_prose_falls_back_to_text_doc() {
    let crew = Crew {
        analyzer: analyzer_agent(vec![MockChat::text_response("report without tools")]),
        kb_analyst: None,
        writer: writer_agent("Here is your documentation in prose form."),
    };

    let project = ProjectRef::parse("ns/app").unwrap();
    let doc = pipeline::execute(&crew, &project).await.unwrap();

    match doc {
        GeneratedDoc::Text { note, .. } => assert!(note.contains("text")),
        other => panic!("expected text doc, got {other:?}"),
    }
}

#[tokio::test]
async fn three_agent_run_with_knowledge_base() {
    // KB snapshot with two sources.
    let mut snapshot = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        snapshot,
        r#"{{"id": 1, "text": "income segments", "source": "user_income", "vector": [1.0, 0.0]}}"#
    )
    .unwrap();
    writeln!(
        snapshot,
        r#"{{"id": 2, "text": "genie platform", "source": "genie", "vector": [0.0, 1.0]}}"#
    )
    .unwrap();
    let kb = Arc::new(KnowledgeBase::load(snapshot.path()).unwrap());

    let embed_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"embedding": [1.0, 0.0]}]
        })))
        .mount(&embed_server)
        .await;
    let embedder = Arc::new(EmbeddingClient::new(&embed_server.uri(), "embed-300m"));

    let kb_analyst = Agent::new(
        knowledge::profile(),
        Arc::new(MockChat::new(vec![
            MockChat::tool_call_response("k1", knowledge::TOOL_NAME, "{\"query\":\"income\"}"),
            MockChat::text_response("Found: income segments (source: user_income)"),
        ])),
    )
    .with_tool(Arc::new(KbSearchTool::new(kb, embedder, 3)));

    let crew = Crew {
        analyzer: analyzer_agent(vec![MockChat::text_response("analysis done")]),
        kb_analyst: Some(kb_analyst),
        writer: writer_agent(WRITER_JSON),
    };

    let project = ProjectRef::parse("ns/app").unwrap();
    let doc = pipeline::execute(&crew, &project).await.unwrap();
    assert!(doc.is_structured());
}

#[tokio::test]
async fn kb_task_failure_does_not_sink_the_run() {
    // KB analyst's script is empty, so its task errors immediately.
    let kb_analyst = Agent::new(knowledge::profile(), Arc::new(MockChat::new(vec![])));

    let crew = Crew {
        analyzer: analyzer_agent(vec![MockChat::text_response("analysis done")]),
        kb_analyst: Some(kb_analyst),
        writer: writer_agent(WRITER_JSON),
    };

    let project = ProjectRef::parse("ns/app").unwrap();
    let doc = pipeline::execute(&crew, &project).await.unwrap();
    assert!(doc.is_structured());
}
