use anyhow::{bail, Result};
use serde_json::Value;
use tracing::{debug, info, warn};

use docsmith_llm::ChatMessage;
use docsmith_prompts::{PipelineContext, TaskSpec};

use crate::agent::Agent;
use crate::tool::error_payload;

/// Upper bound on chat turns per task; a model stuck calling tools forever
/// fails here instead of spinning.
pub const MAX_TOOL_ITERATIONS: usize = 8;

/// Consecutive empty replies (no content, no tool calls) tolerated before
/// giving up.
const MAX_EMPTY_REPLIES: usize = 3;

/// Run one agent against one task: drive the chat/tool cycle until the
/// model produces a final text answer.
pub async fn run_agent(
    agent: &Agent,
    task: &TaskSpec,
    ctx: &PipelineContext,
) -> Result<String> {
    let specs = agent.tool_specs();
    let mut messages = vec![
        ChatMessage::system(agent.profile.system_prompt()),
        ChatMessage::user(task.user_prompt(ctx)),
    ];

    let mut empty_replies = 0usize;

    for iteration in 1..=MAX_TOOL_ITERATIONS {
        debug!(
            role = %agent.profile.role,
            iteration,
            backend = agent.backend().name(),
            "chat turn"
        );
        let response = agent.backend().chat(&messages, &specs).await?;

        if response.has_tool_calls() {
            let calls = response.tool_calls.clone();
            messages.push(ChatMessage::assistant_tool_calls(
                response.content.clone(),
                calls.clone(),
            ));

            for call in &calls {
                let result = match agent.find_tool(&call.name) {
                    Some(tool) => {
                        let args: Value = serde_json::from_str(&call.arguments)
                            .unwrap_or(Value::Null);
                        if args.is_null() && !call.arguments.trim().is_empty() {
                            warn!(tool = %call.name, "unparseable tool arguments");
                            error_payload(&format!(
                                "arguments were not valid JSON: {}",
                                call.arguments
                            ))
                        } else {
                            info!(role = %agent.profile.role, tool = %call.name, "invoking tool");
                            tool.invoke(args).await
                        }
                    }
                    None => {
                        warn!(tool = %call.name, "model requested unknown tool");
                        error_payload(&format!("unknown tool: {}", call.name))
                    }
                };
                messages.push(ChatMessage::tool(call.id.clone(), result));
            }
            continue;
        }

        match response.content {
            Some(content) if !content.trim().is_empty() => {
                info!(role = %agent.profile.role, iterations = iteration, "task complete");
                return Ok(content);
            }
            _ => {
                empty_replies += 1;
                if empty_replies >= MAX_EMPTY_REPLIES {
                    bail!(
                        "agent '{}' returned neither content nor tool calls {} times",
                        agent.profile.role,
                        MAX_EMPTY_REPLIES
                    );
                }
                messages.push(ChatMessage::user(
                    "Your last reply was empty. Provide your final answer.".to_string(),
                ));
            }
        }
    }

    bail!(
        "agent '{}' exceeded {} tool iterations without a final answer",
        agent.profile.role,
        MAX_TOOL_ITERATIONS
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use docsmith_core::ProjectRef;
    use docsmith_llm::MockChat;
    use docsmith_prompts::analyzer;
    use serde_json::json;

    use crate::tool::AgentTool;

    struct EchoTool;

    #[async_trait]
    impl AgentTool for EchoTool {
        fn name(&self) -> &str {
            analyzer::TOOL_NAME
        }

        fn description(&self) -> &str {
            "echo"
        }

        fn parameters(&self) -> Value {
            json!({"type": "object"})
        }

        async fn invoke(&self, args: Value) -> String {
            json!({"echo": args}).to_string()
        }
    }

    fn test_ctx() -> PipelineContext {
        PipelineContext::new(&ProjectRef::parse("ns/app").unwrap())
    }

    #[tokio::test]
    async fn loop_executes_tool_then_returns_answer() {
        let backend = Arc::new(MockChat::new(vec![
            MockChat::tool_call_response(
                "c1",
                analyzer::TOOL_NAME,
                "{\"project\":\"ns/app\"}",
            ),
            MockChat::text_response("final report"),
        ]));
        let agent = Agent::new(analyzer::profile(), backend).with_tool(Arc::new(EchoTool));

        let out = run_agent(&agent, &analyzer::task(&ProjectRef::parse("ns/app").unwrap()), &test_ctx())
            .await
            .unwrap();
        assert_eq!(out, "final report");
    }

    #[tokio::test]
    async fn unknown_tool_reported_back_to_model() {
        let backend = Arc::new(MockChat::new(vec![
            MockChat::tool_call_response("c1", "no_such_tool", "{}"),
            MockChat::text_response("recovered"),
        ]));
        let agent = Agent::new(analyzer::profile(), backend).with_tool(Arc::new(EchoTool));

        let out = run_agent(&agent, &analyzer::task(&ProjectRef::parse("ns/app").unwrap()), &test_ctx())
            .await
            .unwrap();
        assert_eq!(out, "recovered");
    }

    #[tokio::test]
    async fn endless_tool_calls_hit_iteration_cap() {
        // A single scripted response replays forever.
        let backend = Arc::new(MockChat::new(vec![MockChat::tool_call_response(
            "c1",
            analyzer::TOOL_NAME,
            "{}",
        )]));
        let agent = Agent::new(analyzer::profile(), backend).with_tool(Arc::new(EchoTool));

        let err = run_agent(&agent, &analyzer::task(&ProjectRef::parse("ns/app").unwrap()), &test_ctx())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("tool iterations"));
    }

    #[tokio::test]
    async fn empty_replies_eventually_fail() {
        let backend = Arc::new(MockChat::new(vec![MockChat::text_response("")]));
        let agent = Agent::new(analyzer::profile(), backend);

        let err = run_agent(&agent, &analyzer::task(&ProjectRef::parse("ns/app").unwrap()), &test_ctx())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("neither content nor tool calls"));
    }
}
