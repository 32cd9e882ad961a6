use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::LlmError;

const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 30;

/// Client for a remote OpenAI-style embeddings endpoint.
pub struct EmbeddingClient {
    endpoint: String,
    model: String,
    timeout: Duration,
    client: Client,
}

impl EmbeddingClient {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout: Duration::from_secs(DEFAULT_EMBEDDING_TIMEOUT_SECS),
            client: Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Embed one piece of text, returning the raw vector.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let payload = json!({
            "model": self.model,
            "input": text,
            "encoding_format": "float",
        });
        debug!(model = %self.model, chars = text.len(), "embedding request");

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
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

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| LlmError::MalformedResponse("no embedding in response".into()))?;

        debug!(dimensions = embedding.len(), "embedding generated");
        Ok(embedding)
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}
