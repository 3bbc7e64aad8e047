use crate::llm::provider::{CompletionOptions, CompletionResponse, LLMProvider, Message, Pricing};
use crate::utils::error::LintyError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
const DEFAULT_MAX_TOKENS: usize = 4096;

#[derive(Debug)]
pub struct AnthropicProvider {
    api_key: String,
    model: String,
    client: Client,
}

/// Request body for the Anthropic Messages API.
///
/// Anthropic has no structured-output parameter; the pipeline prompts
/// already instruct the model to answer with a bare JSON object, so the
/// `response_schema` option is intentionally not forwarded.
#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: usize,
    messages: Vec<AnthropicMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: usize,
    output_tokens: usize,
}

/// Error response from the Anthropic API.
#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

impl AnthropicProvider {
    pub fn new(api_key: String, model: String) -> Result<Self, LintyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| LintyError::Config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            api_key,
            model,
            client,
        })
    }

    pub fn from_env() -> Result<Self, LintyError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| LintyError::missing_api_key("anthropic"))?;
        Self::new(api_key, DEFAULT_MODEL.to_string())
    }

    /// Override the default model for all calls that do not set one.
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }
}

#[async_trait]
impl LLMProvider for AnthropicProvider {
    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, LintyError> {
        let model = options.model.as_deref().unwrap_or(&self.model);

        let anthropic_messages: Vec<AnthropicMessage<'_>> = messages
            .iter()
            .map(|m| AnthropicMessage {
                role: &m.role,
                content: &m.content,
            })
            .collect();

        let request_body = AnthropicRequest {
            model,
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            messages: anthropic_messages,
            temperature: options.temperature,
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        // Handle rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);

            return Err(LintyError::RateLimited {
                provider: "anthropic".to_string(),
                retry_after,
            });
        }

        // Handle other HTTP errors
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(error) = serde_json::from_str::<AnthropicError>(&error_text) {
                return Err(LintyError::Provider {
                    provider: "anthropic".to_string(),
                    message: format!("{}: {}", error.error.error_type, error.error.message),
                });
            }

            return Err(LintyError::Provider {
                provider: "anthropic".to_string(),
                message: format!("HTTP {}: {}", status, error_text),
            });
        }

        let response_body: AnthropicResponse = response.json().await?;

        // Extract text content from the response
        let content = response_body
            .content
            .into_iter()
            .filter_map(|block| {
                if block.content_type == "text" {
                    block.text
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        Ok(CompletionResponse::new(
            content,
            response_body.usage.input_tokens,
            response_body.usage.output_tokens,
        ))
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn pricing(&self) -> Pricing {
        Pricing {
            input_per_1k: 3.0,
            output_per_1k: 15.0,
        }
    }
}
