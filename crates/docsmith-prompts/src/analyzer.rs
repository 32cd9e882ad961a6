//! The repository analyzer: fetches live project data through the
//! code-host tool and reports it verbatim for the writer.

use docsmith_core::ProjectRef;

use crate::{AgentProfile, TaskSpec};

/// Tool name the analyzer is instructed to call; must match the registered
/// `AgentTool::name`.
pub const TOOL_NAME: &str = "repo_report";

pub fn profile() -> AgentProfile {
    AgentProfile {
        role: "Repository Analyzer".into(),
        goal: format!(
            "Always fetch real-time project data with the {TOOL_NAME} tool. \
             Never answer from memory or training data."
        ),
        backstory: format!(
            "You are a meticulous data analyst who extracts information from \
             code-host projects. Your only source of truth is the {TOOL_NAME} \
             tool. Rules:\n\
             1. Call the tool for every request; never skip the call.\n\
             2. Report only data present in the tool response.\n\
             3. Never fabricate, infer, or fill in missing fields; if a field \
             is absent, say the tool returned no data for it.\n\
             4. Include the raw tool output in your answer so the \
             documentation team can verify it."
        ),
    }
}

pub fn task(project: &ProjectRef) -> TaskSpec {
    TaskSpec {
        description: format!(
            "Fetch comprehensive data for the project \"{project}\".\n\n\
             You MUST call the {TOOL_NAME} tool with the project path \
             \"{project}\" before answering; the call is mandatory.\n\n\
             Steps:\n\
             1. Call {TOOL_NAME} with the project path.\n\
             2. Parse the response and organize: project name, description, \
             default branch, visibility, license; stars, forks, open issues; \
             topics; the file tree and the purpose of key files; recent \
             commits; README content; last activity date.\n\
             3. Present ALL raw data from the tool so nothing is lost."
        ),
        expected_output: format!(
            "A report starting with \"Tool called successfully with project: \
             {project}\", followed by the raw tool response and the organized \
             project metadata, community metrics, file structure, recent \
             activity, and README."
        ),
    }
}
