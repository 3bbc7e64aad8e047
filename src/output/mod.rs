pub mod eslint;
pub mod json;
pub mod writer;

use crate::pipeline::aggregate::AggregateResult;
use crate::utils::error::LintyError;

pub trait OutputFormatter {
    fn format(&self, result: &AggregateResult, metadata: &Metadata) -> Result<String, LintyError>;
    fn extension(&self) -> &str;
    fn default_filename(&self) -> &str;
}

/// Generation metadata carried into the output header.
pub struct Metadata {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    /// Refined rules that went through extraction.
    pub rules_processed: usize,
    /// Rules that could not be translated into concrete checks.
    pub untranslatable: Vec<String>,
}

pub fn get_formatter(format: &str) -> Result<Box<dyn OutputFormatter>, LintyError> {
    match format {
        "eslint" => Ok(Box::new(eslint::EslintFormatter)),
        "json" => Ok(Box::new(json::JsonFormatter)),
        other => Err(LintyError::invalid_format(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_formatter_known_formats() {
        assert_eq!(get_formatter("eslint").unwrap().extension(), "mjs");
        assert_eq!(get_formatter("json").unwrap().extension(), "json");
    }

    #[test]
    fn test_get_formatter_rejects_unknown() {
        assert!(get_formatter("yaml").is_err());
    }
}
