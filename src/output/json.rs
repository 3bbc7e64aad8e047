use crate::output::{Metadata, OutputFormatter};
use crate::pipeline::aggregate::AggregateResult;
use crate::utils::error::LintyError;

pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &AggregateResult, metadata: &Metadata) -> Result<String, LintyError> {
        let payload = serde_json::json!({
            "generated_at": metadata.generated_at.to_rfc3339(),
            "rules_processed": metadata.rules_processed,
            "untranslatable": metadata.untranslatable,
            "overall_severity": result.overall_severity,
            "pattern_count": result.pattern_count,
            "patterns": result.patterns,
        });

        serde_json::to_string_pretty(&payload).map_err(|e| LintyError::Output(e.to_string()))
    }

    fn extension(&self) -> &str {
        "json"
    }

    fn default_filename(&self) -> &str {
        "linty-rules"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{PatternConfig, Severity};

    #[test]
    fn test_json_output_round_trips() {
        let result = AggregateResult {
            patterns: vec![PatternConfig {
                pattern: "Identifier[name='mock']".to_string(),
                message: "no mocks".to_string(),
            }],
            overall_severity: Severity::Warn,
            pattern_count: 1,
        };
        let metadata = Metadata {
            generated_at: chrono::Utc::now(),
            rules_processed: 1,
            untranslatable: Vec::new(),
        };

        let output = JsonFormatter.format(&result, &metadata).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["pattern_count"], 1);
        assert_eq!(parsed["overall_severity"], "warn");
        assert_eq!(parsed["patterns"][0]["pattern"], "Identifier[name='mock']");
    }
}
