#[cfg(feature = "anthropic")]
pub mod anthropic;

#[cfg(feature = "openai")]
pub mod openai;

use crate::llm::provider::LLMProvider;
use crate::utils::error::LintyError;

/// Construct the provider named in the configuration.
///
/// `model` overrides the provider's built-in default; per-stage model
/// settings are applied later, per call, by the gateway.
pub fn create_provider(
    name: &str,
    model: Option<&str>,
) -> Result<Box<dyn LLMProvider>, LintyError> {
    match name {
        #[cfg(feature = "openai")]
        "openai" => {
            let mut provider = openai::OpenAIProvider::from_env()?;
            if let Some(model) = model {
                provider = provider.with_model(model.to_string());
            }
            Ok(Box::new(provider))
        }
        #[cfg(feature = "anthropic")]
        "anthropic" => {
            let mut provider = anthropic::AnthropicProvider::from_env()?;
            if let Some(model) = model {
                provider = provider.with_model(model.to_string());
            }
            Ok(Box::new(provider))
        }
        other => Err(LintyError::invalid_provider(other)),
    }
}
