use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::{ChatBackend, ChatMessage, ChatResponse, LlmError, ToolCall, ToolSpec};

const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Chat client for an OpenAI-compatible `/chat/completions` endpoint.
///
/// The proxy in front of the models takes no Authorization header by
/// default; a bearer token can be attached for deployments that need one.
pub struct HttpChat {
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    timeout: Duration,
    supports_tools: bool,
    bearer_token: Option<String>,
    client: Client,
}

impl HttpChat {
    pub fn new(endpoint: &str, model: &str, temperature: f32) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            temperature,
            max_tokens: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            supports_tools: false,
            bearer_token: None,
            client: Client::new(),
        }
    }

    /// Enable attaching tool specs to requests (for models that can call
    /// functions).
    pub fn with_tools(mut self) -> Self {
        self.supports_tools = true;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_bearer_token(mut self, token: String) -> Self {
        self.bearer_token = Some(token);
        self
    }

    fn build_payload(&self, messages: &[ChatMessage], tools: &[ToolSpec]) -> Value {
        let wire_messages: Vec<Value> = messages.iter().map(message_to_wire).collect();
        let mut payload = json!({
            "model": self.model,
            "messages": wire_messages,
            "temperature": self.temperature,
            "stream": false,
        });
        if let Some(max_tokens) = self.max_tokens {
            payload["max_tokens"] = json!(max_tokens);
        }
        if self.supports_tools && !tools.is_empty() {
            let wire_tools: Vec<Value> = tools.iter().map(ToolSpec::to_wire).collect();
            payload["tools"] = json!(wire_tools);
        }
        payload
    }
}

#[async_trait]
impl ChatBackend for HttpChat {
    fn name(&self) -> &str {
        "http"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn supports_tools(&self) -> bool {
        self.supports_tools
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ChatResponse, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint);
        let payload = self.build_payload(messages, tools);
        debug!(model = %self.model, messages = messages.len(), "chat request");

        let mut request = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&payload);
        if let Some(ref token) = self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout {
                    endpoint: self.endpoint.clone(),
                    seconds: self.timeout.as_secs(),
                }
            } else {
                LlmError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: WireCompletion = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::MalformedResponse("no choices in response".into()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        Ok(ChatResponse {
            content: choice.message.content,
            tool_calls,
        })
    }
}

/// Convert a message into the OpenAI wire form; assistant tool calls need
/// the nested `function` object.
fn message_to_wire(msg: &ChatMessage) -> Value {
    let mut wire = json!({ "role": msg.role });
    wire["content"] = match msg.content {
        Some(ref c) => json!(c),
        None => Value::Null,
    };
    if let Some(ref calls) = msg.tool_calls {
        let wire_calls: Vec<Value> = calls
            .iter()
            .map(|tc| {
                json!({
                    "id": tc.id,
                    "type": "function",
                    "function": { "name": tc.name, "arguments": tc.arguments },
                })
            })
            .collect();
        wire["tool_calls"] = json!(wire_calls);
    }
    if let Some(ref id) = msg.tool_call_id {
        wire["tool_call_id"] = json!(id);
    }
    wire
}

#[derive(Debug, Deserialize)]
struct WireCompletion {
    #[serde(default)]
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunction,
}

#[derive(Debug, Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}
