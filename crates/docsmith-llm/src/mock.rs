use std::sync::Mutex;

use async_trait::async_trait;

use crate::{ChatBackend, ChatMessage, ChatResponse, LlmError, ToolCall, ToolSpec};

/// A mock backend that replays scripted responses in order.
///
/// Requests beyond the script return a `MalformedResponse` error so a test
/// that loops forever fails loudly instead of hanging.
pub struct MockChat {
    model: String,
    responses: Mutex<Vec<ChatResponse>>,
    supports_tools: bool,
}

impl MockChat {
    pub fn new(responses: Vec<ChatResponse>) -> Self {
        Self {
            model: "mock".into(),
            responses: Mutex::new(responses),
            supports_tools: true,
        }
    }

    /// A mock that answers every turn with the same plain content.
    pub fn always(content: &str) -> Self {
        Self::new(vec![ChatResponse {
            content: Some(content.to_string()),
            tool_calls: Vec::new(),
        }])
    }

    /// Convenience: a scripted plain-content response.
    pub fn text_response(content: &str) -> ChatResponse {
        ChatResponse {
            content: Some(content.to_string()),
            tool_calls: Vec::new(),
        }
    }

    /// Convenience: a scripted response requesting one tool call.
    pub fn tool_call_response(id: &str, name: &str, arguments: &str) -> ChatResponse {
        ChatResponse {
            content: None,
            tool_calls: vec![ToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments: arguments.to_string(),
            }],
        }
    }
}

#[async_trait]
impl ChatBackend for MockChat {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn supports_tools(&self) -> bool {
        self.supports_tools
    }

    async fn chat(
        &self,
        _messages: &[ChatMessage],
        _tools: &[ToolSpec],
    ) -> Result<ChatResponse, LlmError> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(LlmError::MalformedResponse(
                "mock backend script exhausted".into(),
            ));
        }
        if responses.len() == 1 {
            // Keep replaying the last response (supports `always`).
            return Ok(responses[0].clone());
        }
        Ok(responses.remove(0))
    }
}
