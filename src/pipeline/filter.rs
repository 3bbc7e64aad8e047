//! Filter stage: one gateway call over the whole rules file.

use crate::llm::LlmGateway;
use tracing::{info, warn};

/// Outcome of classifying the raw lines.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Lines identified as potentially lintable rules, in input order.
    pub lintable: Vec<String>,
    /// Lines dropped as comments, headers, or un-lintable advice.
    pub filtered_out: Vec<String>,
}

/// Classify raw lines into lintable rules and filtered-out lines.
///
/// On any gateway failure the stage degrades to least-aggressive
/// filtering: every input line is treated as lintable rather than
/// silently dropping input.
pub async fn filter_rules(gateway: &LlmGateway, raw_lines: &[String]) -> FilterOutcome {
    match gateway.filter_rules(raw_lines).await {
        Ok(response) => {
            info!(
                lintable = response.lintable_rules.len(),
                filtered_out = response.filtered_out.len(),
                "Filtering complete"
            );
            FilterOutcome {
                lintable: response.lintable_rules,
                filtered_out: response.filtered_out,
            }
        }
        Err(e) => {
            warn!("Filter call failed: {e}. Proceeding without filtering.");
            FilterOutcome {
                lintable: raw_lines.to_vec(),
                filtered_out: Vec::new(),
            }
        }
    }
}
