//! Chat-completion API client.

use async_trait::async_trait;
use chatrelay_config::RelayConfig;
use chatrelay_context::CompletionMessage;
use log::debug;
use serde::Serialize;
use thiserror::Error;

/// Errors from completion clients.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<CompletionMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl CompletionRequest {
    /// Build a request for `messages` using the sampling settings in `config`.
    ///
    /// `max_tokens` mirrors the conversation budget and is omitted when unset.
    pub fn from_config(config: &RelayConfig, messages: Vec<CompletionMessage>) -> Self {
        let completion = &config.completion;
        Self {
            model: completion.model.clone(),
            messages,
            max_tokens: (config.conversation_max_tokens > 0)
                .then_some(config.conversation_max_tokens),
            temperature: completion.temperature,
            top_p: completion.top_p,
            frequency_penalty: completion.frequency_penalty,
            presence_penalty: completion.presence_penalty,
        }
    }
}

/// Client able to turn a conversation into the assistant's next reply.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Return the content of the first choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// OpenAI-compatible HTTP client.
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Build a client from the token and endpoint in `config`.
    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(config.token.clone(), config.completion.base_url.clone())
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        debug!(
            "sending completion request (model={}, messages={})",
            request.model,
            request.messages.len()
        );
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(CompletionError::RateLimited);
            }
            let body = response.text().await?;
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let response_data: serde_json::Value = response.json().await?;
        let content = response_data["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| CompletionError::InvalidResponse("missing content".to_string()))?;
        Ok(content.to_string())
    }
}
