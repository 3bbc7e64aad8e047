use crate::utils::error::LintyError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Per-call knobs. `model` overrides the provider default so different
/// pipeline stages can use different models over one connection.
/// `response_schema` is a JSON schema for providers that support
/// structured output; providers without that capability ignore it (the
/// prompts already demand a bare JSON object).
#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub max_tokens: Option<usize>,
    pub temperature: Option<f32>,
    pub model: Option<String>,
    pub response_schema: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
}

impl CompletionResponse {
    #[must_use]
    pub fn new(content: String, prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            content,
            prompt_tokens,
            completion_tokens,
        }
    }

    #[must_use]
    pub fn total_tokens(&self) -> usize {
        self.prompt_tokens + self.completion_tokens
    }
}

#[derive(Debug, Clone)]
pub struct Pricing {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

#[async_trait]
pub trait LLMProvider: std::fmt::Debug + Send + Sync {
    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, LintyError>;

    fn model(&self) -> &str;

    fn pricing(&self) -> Pricing;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_user_helper() {
        let msg = Message::user("hello");
        assert_eq!(msg.role, "user");
        assert_eq!(msg.content, "hello");
    }

    #[test]
    fn test_completion_response_totals() {
        let response = CompletionResponse::new("{}".to_string(), 120, 30);
        assert_eq!(response.total_tokens(), 150);
    }
}
