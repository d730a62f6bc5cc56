//! Model gateway - chat-completion API integration and code extraction
//!
//! This module provides:
//! - Message types for LLM communication
//! - LlmClient trait for API abstraction
//! - OpenAiClient implementation
//! - Fenced code block extraction

pub mod client;
pub mod extract;
pub mod openai;
pub mod types;

pub use client::{LlmClient, MockLlmClient};
pub use extract::extract_code;
pub use openai::{OpenAiClient, OpenAiConfig};
pub use types::{CompletionRequest, CompletionResponse, Message, Role, Usage};

use crate::error::Result;

/// Fixed system role for every generation call
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// One generation round-trip: send `instruction + prompt` as the user
/// message, then extract the first fenced block tagged `code_type` from the
/// reply. No retry here - retries belong to the repair loop.
pub async fn generate<C>(client: &C, instruction: &str, prompt: &str, code_type: &str) -> Result<String>
where
    C: LlmClient + ?Sized,
{
    let request =
        CompletionRequest::new(SYSTEM_PROMPT).with_user_message(format!("{}{}", instruction, prompt));

    log::debug!("Requesting {} generation from {}", code_type, client.model());
    let response = client.complete(request).await?;

    extract_code(&response.content, code_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HerdrError;

    #[tokio::test]
    async fn test_generate_extracts_code() {
        let mock = MockLlmClient::with_texts(vec!["Sure:\n\n```python\nprint('hi')\n```\n"]);

        let code = generate(&mock, "Implement a python script: ", "say hi", "python")
            .await
            .unwrap();

        assert_eq!(code, "print('hi')");
    }

    #[tokio::test]
    async fn test_generate_builds_user_message() {
        let mock = MockLlmClient::with_texts(vec!["```python\npass\n```"]);

        generate(&mock, "Prefix: ", "do things", "python").await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests[0].system, SYSTEM_PROMPT);
        assert_eq!(requests[0].messages.len(), 1);
        assert_eq!(requests[0].messages[0].content, "Prefix: do things");
    }

    #[tokio::test]
    async fn test_generate_missing_block_is_extraction_error() {
        let mock = MockLlmClient::with_texts(vec!["I cannot write code today."]);

        let result = generate(&mock, "", "task", "python").await;
        assert!(matches!(result, Err(HerdrError::Extraction { .. })));
    }
}
