use docsmith_core::ProjectRef;

/// Accumulated state of a sequential run: the project under documentation
/// and the outputs of tasks already executed, in order.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub project: String,
    prior_outputs: Vec<(String, String)>,
}

impl PipelineContext {
    pub fn new(project: &ProjectRef) -> Self {
        Self {
            project: project.path().to_string(),
            prior_outputs: Vec::new(),
        }
    }

    /// Record a completed task's output under the agent role that produced
    /// it. Later tasks see it in their prompt.
    pub fn record(&mut self, role: &str, output: &str) {
        self.prior_outputs.push((role.to_string(), output.to_string()));
    }

    pub fn outputs(&self) -> &[(String, String)] {
        &self.prior_outputs
    }

    /// Render prior outputs as context sections at the end of a prompt.
    pub fn append_prior_outputs(&self, prompt: &mut String) {
        if self.prior_outputs.is_empty() {
            return;
        }
        prompt.push_str("\n\n# Context from previous agents\n");
        for (role, output) in &self.prior_outputs {
            prompt.push_str(&format!("\n## Output of {role}\n\n{output}\n"));
        }
    }
}
