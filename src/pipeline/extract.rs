//! Extract stage: pull concrete (term, context, severity) flags out of
//! one refined rule and render them into pattern configs.

use crate::generator::templates;
use crate::llm::LlmGateway;
use crate::pipeline::{Flag, PatternConfig, Severity};
use tracing::warn;

/// Extract flags from a single refined rule.
///
/// This is the one stage where failure silently drops coverage: an
/// empty list comes back on any gateway error or malformed shape, since
/// extraction failures are independent per rule and a single low-value
/// miss should not block the batch.
pub async fn extract_flags(gateway: &LlmGateway, rule_text: &str) -> Vec<Flag> {
    match gateway.extract_flags(rule_text).await {
        Ok(response) => response.flags,
        Err(e) => {
            warn!(rule = %rule_text, "Flag extraction failed: {e}. Skipping rule.");
            Vec::new()
        }
    }
}

/// Process one refined rule end to end: extract flags, render each into
/// a pattern config paired with its severity.
///
/// Flags with an empty term are skipped with a warning; everything else
/// renders through the template registry.
pub async fn process_refined_rule(
    gateway: &LlmGateway,
    rule_text: &str,
) -> Vec<(Severity, PatternConfig)> {
    let flags = extract_flags(gateway, rule_text).await;
    let mut configs = Vec::with_capacity(flags.len());

    for flag in flags {
        if flag.term.is_empty() {
            warn!(rule = %rule_text, "Flag missing term in response. Skipping flag.");
            continue;
        }

        let config = templates::render(flag.context, &flag.term, rule_text);
        configs.push((flag.severity, config));
    }

    configs
}
