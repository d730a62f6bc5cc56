//! LlmClient trait definition and the mock client used in tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{HerdrError, Result};
use crate::llm::types::{CompletionRequest, CompletionResponse};

/// Stateless LLM client - each call is independent, no conversation history
/// is carried across calls (or across process runs).
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Single completion request (blocks the flow until the round-trip completes)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// The model this client targets
    fn model(&self) -> &str;

    /// Whether the client has credentials and can make calls
    fn is_ready(&self) -> bool;
}

/// Mock LLM client that replays a queue of canned responses.
pub struct MockLlmClient {
    responses: Mutex<VecDeque<CompletionResponse>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmClient {
    /// Create a mock that returns the given responses in order
    pub fn new(responses: Vec<CompletionResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock whose responses are plain text blobs
    pub fn with_texts<T: AsRef<str>>(texts: Vec<T>) -> Self {
        Self::new(
            texts
                .into_iter()
                .map(|t| CompletionResponse {
                    content: t.as_ref().to_string(),
                    ..Default::default()
                })
                .collect(),
        )
    }

    /// Requests received so far, in call order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of completion calls made
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| HerdrError::Llm("MockLlmClient ran out of responses".to_string()))
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn is_ready(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_replays_in_order() {
        let mock = MockLlmClient::with_texts(vec!["first", "second"]);

        let r1 = mock.complete(CompletionRequest::default()).await.unwrap();
        assert_eq!(r1.content, "first");

        let r2 = mock.complete(CompletionRequest::default()).await.unwrap();
        assert_eq!(r2.content, "second");

        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_exhausted_is_error() {
        let mock = MockLlmClient::with_texts(Vec::<&str>::new());
        let result = mock.complete(CompletionRequest::default()).await;
        assert!(matches!(result, Err(HerdrError::Llm(_))));
    }

    #[tokio::test]
    async fn test_mock_records_requests() {
        let mock = MockLlmClient::with_texts(vec!["ok"]);
        let request = CompletionRequest::new("system").with_user_message("hello");
        mock.complete(request).await.unwrap();

        let seen = mock.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].system, "system");
        assert_eq!(seen[0].messages[0].content, "hello");
    }

    #[test]
    fn test_mock_is_ready() {
        let mock = MockLlmClient::with_texts(Vec::<&str>::new());
        assert!(mock.is_ready());
        assert_eq!(mock.model(), "mock-model");
    }
}
