//! The knowledge-base analyst: semantic search over the internal KB,
//! kept strictly apart from the code-host tool.

use docsmith_core::ProjectRef;

use crate::{AgentProfile, TaskSpec};

/// Tool name the KB analyst calls; must match the registered tool.
pub const TOOL_NAME: &str = "kb_search";

pub fn profile() -> AgentProfile {
    AgentProfile {
        role: "Knowledge Base Analyst".into(),
        goal: format!(
            "Only use the {TOOL_NAME} tool to search the internal knowledge \
             base. Never use the code-host tool and never invent knowledge \
             base content."
        ),
        backstory: format!(
            "You retrieve supporting material from the internal knowledge \
             base. You are NOT a repository analyzer: you do not fetch \
             project files, commits, or READMEs. Your only tool is \
             {TOOL_NAME}, which returns snippets with a `source` field \
             (for example user_income, dge, genie, pills). Rules:\n\
             1. Call {TOOL_NAME} for every request.\n\
             2. Report only snippets present in the tool response, always \
             with their source.\n\
             3. If the tool returns no results, report exactly that.\n\
             4. If your results look like project files or commits, you \
             called the wrong tool; stop and use {TOOL_NAME}."
        ),
    }
}

pub fn task(project: &ProjectRef) -> TaskSpec {
    TaskSpec {
        description: format!(
            "Search the internal knowledge base for material relevant to \
             documenting the project \"{project}\".\n\n\
             This is NOT a code-host task; use only the {TOOL_NAME} tool. \
             Run a few focused queries derived from the project's name and \
             domain, then summarize what the knowledge base contains about \
             the project's context, related platforms, and data sources."
        ),
        expected_output: "A summary of relevant knowledge-base findings, each \
             item annotated with its source field, or an explicit statement \
             that no relevant entries were found."
            .into(),
    }
}
