use std::sync::Arc;

use docsmith_llm::{ChatBackend, ToolSpec};
use docsmith_prompts::AgentProfile;

use crate::tool::{spec_for, AgentTool};

/// One configured agent: an identity, the tools it may call, and the model
/// backend that drives it.
pub struct Agent {
    pub profile: AgentProfile,
    tools: Vec<Arc<dyn AgentTool>>,
    backend: Arc<dyn ChatBackend>,
}

impl Agent {
    pub fn new(profile: AgentProfile, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            profile,
            tools: Vec::new(),
            backend,
        }
    }

    pub fn with_tool(mut self, tool: Arc<dyn AgentTool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn backend(&self) -> &dyn ChatBackend {
        self.backend.as_ref()
    }

    pub fn tool_specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| spec_for(t.as_ref())).collect()
    }

    pub fn find_tool(&self, name: &str) -> Option<&Arc<dyn AgentTool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn has_tools(&self) -> bool {
        !self.tools.is_empty()
    }
}
