use async_trait::async_trait;
use chatrelay_context::CompletionMessage;
use chatrelay_core::{CompletionClient, CompletionError, CompletionRequest};
use parking_lot::Mutex;
use std::sync::Arc;

/// Always answers with the same text.
#[derive(Debug, Clone)]
pub struct FixedCompletion {
    response: String,
}

impl FixedCompletion {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl CompletionClient for FixedCompletion {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
        Ok(self.response.clone())
    }
}

/// Answers with a fixed text and records every request's messages.
#[derive(Debug, Clone)]
pub struct RecordingCompletion {
    response: String,
    pub requests: Arc<Mutex<Vec<Vec<CompletionMessage>>>>,
}

impl RecordingCompletion {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Messages of the most recent request.
    pub fn last_messages(&self) -> Option<Vec<CompletionMessage>> {
        self.requests.lock().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl CompletionClient for RecordingCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.requests.lock().push(request.messages.clone());
        Ok(self.response.clone())
    }
}

/// Always fails with a rate-limit error.
#[derive(Debug, Clone, Default)]
pub struct FailingCompletion;

#[async_trait]
impl CompletionClient for FailingCompletion {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
        Err(CompletionError::RateLimited)
    }
}
