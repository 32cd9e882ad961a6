pub mod analyzer;
pub mod context;
pub mod knowledge;
pub mod writer;

pub use context::PipelineContext;

use serde::{Deserialize, Serialize};

/// The declarative identity of one agent: who it is and what it is for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

impl AgentProfile {
    /// Render the profile as a chat system prompt.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {role}.\n\nYour goal: {goal}\n\n{backstory}",
            role = self.role,
            goal = self.goal,
            backstory = self.backstory
        )
    }
}

/// One task in the sequential pipeline: instructions plus the contract for
/// what the agent must produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSpec {
    pub description: String,
    pub expected_output: String,
}

impl TaskSpec {
    /// Assemble the user prompt: instructions, expected output, and any
    /// context accumulated from earlier tasks.
    pub fn user_prompt(&self, ctx: &PipelineContext) -> String {
        let mut prompt = String::new();
        prompt.push_str(&self.description);
        prompt.push_str("\n\n## Expected output\n\n");
        prompt.push_str(&self.expected_output);
        ctx.append_prior_outputs(&mut prompt);
        prompt
    }
}
