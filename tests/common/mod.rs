//! Shared test helpers: a scripted provider that answers the three
//! prompt kinds deterministically regardless of call order.

use async_trait::async_trait;
use linty::llm::provider::{
    CompletionOptions, CompletionResponse, LLMProvider, Message, Pricing,
};
use linty::utils::error::LintyError;
use std::collections::HashMap;

/// Answers each prompt kind from a canned script.
///
/// Prompt kinds are recognized by markers in the prompt text; refine and
/// extract answers are keyed by the rule text embedded in the prompt.
/// Unknown rules get harmless defaults (empty refinement, no flags) so
/// tests only script what they assert on.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    pub filter_response: Option<String>,
    pub refine_responses: HashMap<String, String>,
    pub extract_responses: HashMap<String, String>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, response: &str) -> Self {
        self.filter_response = Some(response.to_string());
        self
    }

    pub fn with_refine(mut self, rule: &str, response: &str) -> Self {
        self.refine_responses
            .insert(rule.to_string(), response.to_string());
        self
    }

    pub fn with_extract(mut self, rule: &str, response: &str) -> Self {
        self.extract_responses
            .insert(rule.to_string(), response.to_string());
        self
    }

    fn lookup<'a>(map: &'a HashMap<String, String>, prompt: &str) -> Option<&'a str> {
        map.iter()
            .find(|(rule, _)| prompt.contains(rule.as_str()))
            .map(|(_, response)| response.as_str())
    }
}

/// A refine answer that passes the original rule through untouched.
pub fn passthrough(rule: &str) -> String {
    format!(r#"{{"outcome": "passed_through", "refined_rules": ["{rule}"]}}"#)
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn complete(
        &self,
        messages: &[Message],
        _options: &CompletionOptions,
    ) -> Result<CompletionResponse, LintyError> {
        let prompt = &messages[0].content;

        let content = if prompt.contains("Input Lines:") {
            self.filter_response
                .clone()
                .unwrap_or_else(|| r#"{"lintable_rules": [], "filtered_out": []}"#.to_string())
        } else if prompt.contains("refined_rules") {
            Self::lookup(&self.refine_responses, prompt)
                .map(str::to_string)
                .unwrap_or_else(|| {
                    r#"{"outcome": "passed_through", "refined_rules": []}"#.to_string()
                })
        } else {
            Self::lookup(&self.extract_responses, prompt)
                .map(str::to_string)
                .unwrap_or_else(|| r#"{"flags": []}"#.to_string())
        };

        Ok(CompletionResponse::new(content, 100, 25))
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    fn pricing(&self) -> Pricing {
        Pricing {
            input_per_1k: 0.0,
            output_per_1k: 0.0,
        }
    }
}
