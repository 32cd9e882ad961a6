//! The documentation writer: turns the gathered facts into the structured
//! JSON document. Runs without tools.

use docsmith_core::ProjectRef;

use crate::{AgentProfile, TaskSpec};

pub fn profile() -> AgentProfile {
    AgentProfile {
        role: "Technical Documentation Writer".into(),
        goal: "Generate comprehensive, well-structured documentation in JSON \
               format from the project data gathered by the other agents."
            .into(),
        backstory: "You are an expert technical writer with deep knowledge of \
               software architecture. You transform raw project data into \
               clear documentation that helps developers understand a project \
               quickly. You always output a single valid JSON object and \
               nothing else."
            .into(),
    }
}

pub fn task(project: &ProjectRef) -> TaskSpec {
    TaskSpec {
        description: format!(
            "Write the documentation for the project \"{project}\" based on \
             the data gathered by the previous agents (provided below as \
             context).\n\n\
             Produce a JSON object with exactly these sections:\n\
             - overview: {{name, description, purpose, default_branch, \
             visibility, license}}\n\
             - features: [key features]\n\
             - tech_stack: {{topics, dependencies}}\n\
             - structure: {{main_files: [{{name, purpose}}]}}\n\
             - activity: {{stars, forks, open_issues, last_activity}}\n\
             - getting_started: {{installation, usage, project_url}}\n\n\
             Return ONLY the JSON object. No markdown code fences, no prose \
             before or after; start the response with '{{'."
        ),
        expected_output: "A single valid JSON object with keys overview, \
             features, tech_stack, structure, activity, getting_started, not \
             wrapped in code fences."
            .into(),
    }
}
