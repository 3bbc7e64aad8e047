use crate::llm::provider::{CompletionOptions, CompletionResponse, LLMProvider, Message, Pricing};
use crate::utils::error::LintyError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_MAX_TOKENS: usize = 4096;

#[derive(Debug)]
pub struct OpenAIProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

/// Request body for the OpenAI Chat Completions API.
#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    max_tokens: usize,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat<'a>>,
}

/// Structured-output constraint: `{"type": "json_schema", "json_schema": {...}}`.
#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

/// Error response from the OpenAI API.
#[derive(Debug, Deserialize)]
struct OpenAIError {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type")]
    error_type: Option<String>,
    message: String,
}

impl OpenAIProvider {
    pub fn new(api_key: String, model: String) -> Result<Self, LintyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| LintyError::Config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            api_key,
            model,
            base_url: OPENAI_API_URL.to_string(),
            client,
        })
    }

    pub fn from_env() -> Result<Self, LintyError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| LintyError::missing_api_key("openai"))?;
        Self::new(api_key, DEFAULT_MODEL.to_string())
    }

    /// Override the default model for all calls that do not set one.
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Point the provider at a different endpoint. Used by tests to talk
    /// to a local mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, LintyError> {
        let model = options.model.as_deref().unwrap_or(&self.model);

        let response_format = options.response_schema.as_ref().map(|schema| ResponseFormat {
            format_type: "json_schema",
            json_schema: schema,
        });

        let request_body = OpenAIRequest {
            model,
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            messages,
            temperature: options.temperature,
            response_format,
        };

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
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
                provider: "openai".to_string(),
                retry_after,
            });
        }

        // Handle other HTTP errors
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(error) = serde_json::from_str::<OpenAIError>(&error_text) {
                return Err(LintyError::Provider {
                    provider: "openai".to_string(),
                    message: format!(
                        "{}: {}",
                        error.error.error_type.as_deref().unwrap_or("api_error"),
                        error.error.message
                    ),
                });
            }

            return Err(LintyError::Provider {
                provider: "openai".to_string(),
                message: format!("HTTP {}: {}", status, error_text),
            });
        }

        let response_body: OpenAIResponse = response.json().await?;

        let content = response_body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LintyError::Provider {
                provider: "openai".to_string(),
                message: "Response contained no completion content".to_string(),
            })?;

        Ok(CompletionResponse::new(
            content,
            response_body.usage.prompt_tokens,
            response_body.usage.completion_tokens,
        ))
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn pricing(&self) -> Pricing {
        Pricing {
            input_per_1k: 2.5,
            output_per_1k: 10.0,
        }
    }
}
