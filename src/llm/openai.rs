//! OpenAI API client implementation
//!
//! This module implements the LlmClient trait for the OpenAI chat-completions
//! API. One synchronous-style request per call: no streaming, no tool calls.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::error::{HerdrError, Result};
use crate::llm::client::LlmClient;
use crate::llm::types::{CompletionRequest, CompletionResponse, Role, Usage};

/// OpenAI chat-completions endpoint
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model to use
const DEFAULT_MODEL: &str = "gpt-4";

/// Default max tokens
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Configuration for the OpenAI client
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(300),
        }
    }
}

/// OpenAI API client
///
/// The API key is an explicit constructor argument - there is no ambient or
/// global client state.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: String, config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| HerdrError::Llm(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    /// Build the request body for the chat-completions API.
    ///
    /// The system prompt becomes the leading message in the messages array.
    fn build_request(&self, request: &CompletionRequest) -> Value {
        let model = request.model.as_ref().unwrap_or(&self.config.model).clone();

        let max_tokens = request.max_tokens.unwrap_or(self.config.max_tokens);

        let mut messages: Vec<Value> = Vec::new();

        if !request.system.is_empty() {
            messages.push(json!({
                "role": "system",
                "content": request.system
            }));
        }

        for m in &request.messages {
            messages.push(json!({
                "role": match m.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                "content": m.content
            }));
        }

        json!({
            "model": model,
            "max_tokens": max_tokens,
            "messages": messages
        })
    }

    /// Parse the API response into a CompletionResponse
    fn parse_response(&self, body: Value) -> Result<CompletionResponse> {
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| HerdrError::Llm("Response has no message content".to_string()))?
            .to_string();

        let usage = if let Some(u) = body.get("usage") {
            Usage::new(
                u["prompt_tokens"].as_u64().unwrap_or(0),
                u["completion_tokens"].as_u64().unwrap_or(0),
            )
        } else {
            Usage::default()
        };

        Ok(CompletionResponse { content, usage })
    }

    /// Send a request to the OpenAI API
    async fn send_request(&self, body: Value) -> Result<Value> {
        let response = self
            .client
            .post(OPENAI_API_URL)
            .header("authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| HerdrError::Llm(format!("Request failed: {}", e)))?;

        let status = response.status();

        // Handle rate limiting
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(HerdrError::Llm(format!(
                "Rate limited, retry after {} seconds",
                retry_after
            )));
        }

        // Handle other errors
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(HerdrError::Llm(format!("API error {}: {}", status, error_body)));
        }

        response
            .json()
            .await
            .map_err(|e| HerdrError::Llm(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = self.build_request(&request);
        let response = self.send_request(body).await?;
        self.parse_response(response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn is_ready(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("model", &self.config.model)
            .field("max_tokens", &self.config.max_tokens)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::Message;

    #[test]
    fn test_config_default() {
        let config = OpenAiConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_client_with_api_key() {
        let result = OpenAiClient::with_api_key("test-key".to_string(), OpenAiConfig::default());
        assert!(result.is_ok());
        let client = result.unwrap();
        assert!(client.is_ready());
        assert_eq!(client.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_empty_api_key_not_ready() {
        let client = OpenAiClient::with_api_key(String::new(), OpenAiConfig::default()).unwrap();
        assert!(!client.is_ready());
    }

    #[test]
    fn test_build_request_basic() {
        let client =
            OpenAiClient::with_api_key("test-key".to_string(), OpenAiConfig::default()).unwrap();

        let request = CompletionRequest::new("You are a helpful assistant.").with_user_message("Hello");

        let body = client.build_request(&request);

        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["max_tokens"], DEFAULT_MAX_TOKENS);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are a helpful assistant.");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Hello");
    }

    #[test]
    fn test_build_request_no_system() {
        let client =
            OpenAiClient::with_api_key("test-key".to_string(), OpenAiConfig::default()).unwrap();

        let request = CompletionRequest::default().with_user_message("Hello");

        let body = client.build_request(&request);

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
    }

    #[test]
    fn test_build_request_custom_model() {
        let client =
            OpenAiClient::with_api_key("test-key".to_string(), OpenAiConfig::default()).unwrap();

        let mut request = CompletionRequest::new("test").with_user_message("Hello");
        request.model = Some("gpt-4-turbo".to_string());

        let body = client.build_request(&request);

        assert_eq!(body["model"], "gpt-4-turbo");
    }

    #[test]
    fn test_build_request_assistant_message() {
        let client =
            OpenAiClient::with_api_key("test-key".to_string(), OpenAiConfig::default()).unwrap();

        let request = CompletionRequest::new("sys")
            .with_user_message("Hi")
            .with_message(Message::assistant("Hello back"));

        let body = client.build_request(&request);
        assert_eq!(body["messages"][2]["role"], "assistant");
        assert_eq!(body["messages"][2]["content"], "Hello back");
    }

    #[test]
    fn test_parse_response() {
        let client =
            OpenAiClient::with_api_key("test-key".to_string(), OpenAiConfig::default()).unwrap();

        let api_response = json!({
            "choices": [
                { "message": { "role": "assistant", "content": "Hello there!" } }
            ],
            "usage": {
                "prompt_tokens": 10,
                "completion_tokens": 5
            }
        });

        let response = client.parse_response(api_response).unwrap();

        assert_eq!(response.content, "Hello there!");
        assert_eq!(response.usage.input_tokens, 10);
        assert_eq!(response.usage.output_tokens, 5);
    }

    #[test]
    fn test_parse_response_missing_content() {
        let client =
            OpenAiClient::with_api_key("test-key".to_string(), OpenAiConfig::default()).unwrap();

        let api_response = json!({ "choices": [] });

        let result = client.parse_response(api_response);
        assert!(matches!(result, Err(HerdrError::Llm(_))));
    }

    #[test]
    fn test_parse_response_missing_usage() {
        let client =
            OpenAiClient::with_api_key("test-key".to_string(), OpenAiConfig::default()).unwrap();

        let api_response = json!({
            "choices": [
                { "message": { "content": "ok" } }
            ]
        });

        let response = client.parse_response(api_response).unwrap();
        assert_eq!(response.usage.total(), 0);
    }

    #[test]
    fn test_debug_impl_hides_key() {
        let client =
            OpenAiClient::with_api_key("test-key".to_string(), OpenAiConfig::default()).unwrap();

        let debug_str = format!("{:?}", client);
        assert!(debug_str.contains("OpenAiClient"));
        assert!(debug_str.contains(DEFAULT_MODEL));
        assert!(!debug_str.contains("test-key"));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OpenAiClient>();
    }
}
