//! Typed gateway over the raw completion provider.
//!
//! The pipeline never talks to a provider directly. Each stage goes
//! through one of three typed calls here, and every failure mode a call
//! can hit (transport error, timeout, non-JSON output, missing fields)
//! surfaces as a single `LintyError` so the stages can apply their safe
//! defaults uniformly without caring what went wrong.
//!
//! The gateway is stateless between calls: no conversation memory, no
//! retries. A failed call falls straight through to the calling stage.

use crate::generator::prompts::{
    build_extract_prompt, build_filter_prompt, build_refine_prompt,
};
use crate::llm::provider::{CompletionOptions, LLMProvider, Message};
use crate::pipeline::{Flag, RefineOutcome};
use crate::utils::error::LintyError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const DEFAULT_MAX_TOKENS: usize = 4096;

/// Settings for one prompt kind: which model to use, how long to wait,
/// how deterministic to be.
#[derive(Debug, Clone, Default, serde::Serialize, Deserialize)]
pub struct StageSettings {
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
    pub temperature: Option<f32>,
}

/// Per-stage gateway settings. Timeouts default to the values the tool
/// has always shipped with: 60s for filter and refine, 45s for extract.
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct GatewaySettings {
    #[serde(default)]
    pub filter: StageSettings,
    #[serde(default)]
    pub refine: StageSettings,
    #[serde(default)]
    pub extract: StageSettings,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            filter: StageSettings {
                model: None,
                timeout_secs: Some(60),
                temperature: None,
            },
            refine: StageSettings {
                model: None,
                timeout_secs: Some(60),
                // Lower temperature for more deterministic translation
                temperature: Some(0.2),
            },
            extract: StageSettings {
                model: None,
                timeout_secs: Some(45),
                // Low temperature for deterministic extraction
                temperature: Some(0.1),
            },
        }
    }
}

impl StageSettings {
    fn timeout(&self, default_secs: u64) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(default_secs))
    }
}

/// Result of the filter call: which lines are worth pursuing.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterResponse {
    pub lintable_rules: Vec<String>,
    pub filtered_out: Vec<String>,
}

/// Result of the refine call: outcome plus zero or more concrete rules.
#[derive(Debug, Clone, Deserialize)]
pub struct RefineResponse {
    pub outcome: RefineOutcome,
    pub refined_rules: Vec<String>,
}

/// Result of the extract call: the flags found in one refined rule.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractResponse {
    pub flags: Vec<Flag>,
}

pub struct LlmGateway {
    provider: Box<dyn LLMProvider>,
    settings: GatewaySettings,
    tokens_used: AtomicUsize,
}

impl LlmGateway {
    pub fn new(provider: Box<dyn LLMProvider>, settings: GatewaySettings) -> Self {
        Self {
            provider,
            settings,
            tokens_used: AtomicUsize::new(0),
        }
    }

    /// Total tokens consumed across all calls so far.
    pub fn tokens_used(&self) -> usize {
        self.tokens_used.load(Ordering::Relaxed)
    }

    /// Get the model name from the underlying provider.
    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Classify raw lines into lintable rules and filtered-out lines in
    /// a single call over the whole file.
    pub async fn filter_rules(&self, raw_lines: &[String]) -> Result<FilterResponse, LintyError> {
        let settings = self.settings.filter.clone();
        let prompt = build_filter_prompt(raw_lines);
        self.call("filter", &settings, 60, prompt, filter_schema())
            .await
    }

    /// Refine one potentially complex rule into concrete sub-rules.
    pub async fn refine_rule(&self, rule_text: &str) -> Result<RefineResponse, LintyError> {
        let settings = self.settings.refine.clone();
        let prompt = build_refine_prompt(rule_text);
        self.call("refine", &settings, 60, prompt, refine_schema())
            .await
    }

    /// Extract (term, context, severity) flags from one refined rule.
    pub async fn extract_flags(&self, rule_text: &str) -> Result<ExtractResponse, LintyError> {
        let settings = self.settings.extract.clone();
        let prompt = build_extract_prompt(rule_text);
        self.call("extract", &settings, 45, prompt, extract_schema())
            .await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        stage: &str,
        settings: &StageSettings,
        default_timeout_secs: u64,
        prompt: String,
        schema: serde_json::Value,
    ) -> Result<T, LintyError> {
        let options = CompletionOptions {
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            temperature: settings.temperature,
            model: settings.model.clone(),
            response_schema: Some(schema),
        };

        let messages = vec![Message::user(prompt)];
        let timeout = settings.timeout(default_timeout_secs);

        let response = tokio::time::timeout(timeout, self.provider.complete(&messages, &options))
            .await
            .map_err(|_| LintyError::Timeout {
                stage: stage.to_string(),
                timeout,
            })??;

        self.tokens_used
            .fetch_add(response.total_tokens(), Ordering::Relaxed);

        parse_json_payload(stage, &response.content)
    }
}

/// Parse the JSON object out of a completion, tolerating markdown code
/// fences around it. Anything that will not deserialize into the
/// expected shape is a malformed-response error; the stages treat it
/// exactly like a transport failure.
fn parse_json_payload<T: DeserializeOwned>(stage: &str, content: &str) -> Result<T, LintyError> {
    let trimmed = strip_code_fences(content);

    serde_json::from_str(trimmed).map_err(|e| LintyError::MalformedResponse {
        stage: stage.to_string(),
        message: e.to_string(),
    })
}

fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json") on the opening fence line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn filter_schema() -> serde_json::Value {
    json!({
        "name": "filtered_rules_response",
        "schema": {
            "type": "object",
            "properties": {
                "lintable_rules": {"type": "array", "items": {"type": "string"}},
                "filtered_out": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["lintable_rules", "filtered_out"]
        }
    })
}

fn refine_schema() -> serde_json::Value {
    json!({
        "name": "rule_translation_response",
        "schema": {
            "type": "object",
            "properties": {
                "outcome": {
                    "type": "string",
                    "enum": ["passed_through", "translated", "untranslatable"]
                },
                "refined_rules": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["outcome", "refined_rules"]
        }
    })
}

fn extract_schema() -> serde_json::Value {
    json!({
        "name": "extracted_flags_response",
        "schema": {
            "type": "object",
            "properties": {
                "flags": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "term": {"type": "string"},
                            "context": {
                                "type": "string",
                                "enum": [
                                    "Identifier", "Literal", "Operator", "Keyword",
                                    "Property", "Import", "Unknown"
                                ]
                            },
                            "severity": {"type": "string", "enum": ["error", "warn"]}
                        },
                        "required": ["term", "context", "severity"]
                    }
                }
            },
            "required": ["flags"]
        }
    })
}
