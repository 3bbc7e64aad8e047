//! ESLint flat-config codegen.
//!
//! Emits an `eslint.config.mjs` module with a single
//! `no-restricted-syntax` entry: `[overall_severity, config, ...]`.
//! Pattern and message strings arrive pre-escaped for single-quoted JS
//! embedding from the template registry.

use crate::output::{Metadata, OutputFormatter};
use crate::pipeline::aggregate::AggregateResult;
use crate::utils::error::LintyError;

pub struct EslintFormatter;

impl OutputFormatter for EslintFormatter {
    fn format(&self, result: &AggregateResult, metadata: &Metadata) -> Result<String, LintyError> {
        let mut out = String::new();

        out.push_str(&format!(
            "// Generated by linty v{} on {}\n",
            env!("CARGO_PKG_VERSION"),
            metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        out.push_str("// Do not edit by hand; regenerate from the rules file instead.\n");
        out.push_str(&format!(
            "// Rules processed: {}; patterns emitted: {}; severity: {}\n",
            metadata.rules_processed,
            result.pattern_count,
            result.overall_severity.as_str()
        ));

        if !metadata.untranslatable.is_empty() {
            out.push_str("//\n// Rules that could not be translated into concrete checks:\n");
            for rule in &metadata.untranslatable {
                // Keep header comments one line per rule
                let flattened = rule.replace(['\n', '\r'], " ");
                out.push_str(&format!("//   - {flattened}\n"));
            }
        }

        out.push('\n');
        out.push_str("export default [\n");
        out.push_str("  {\n");

        if result.patterns.is_empty() {
            out.push_str("    // No enforceable patterns were generated.\n");
            out.push_str("    rules: {},\n");
        } else {
            out.push_str("    rules: {\n");
            out.push_str("      'no-restricted-syntax': [\n");
            out.push_str(&format!("        '{}',\n", result.overall_severity.as_str()));

            for config in &result.patterns {
                out.push_str("        {\n");
                out.push_str(&format!("          selector: '{}',\n", config.pattern));
                out.push_str(&format!("          message: '{}',\n", config.message));
                out.push_str("        },\n");
            }

            out.push_str("      ],\n");
            out.push_str("    },\n");
        }

        out.push_str("  },\n");
        out.push_str("];\n");

        Ok(out)
    }

    fn extension(&self) -> &str {
        "mjs"
    }

    fn default_filename(&self) -> &str {
        "eslint.config"
    }
}
