//! Refine stage: expand complex rules into concrete, single-concept
//! sub-rules.
//!
//! Runs strictly sequentially so the per-rule narration stays in input
//! order before the extraction fan-out starts.

use crate::llm::LlmGateway;
use crate::pipeline::RefineOutcome;
use indicatif::ProgressBar;
use tracing::warn;

/// What survived refinement.
#[derive(Debug, Clone, Default)]
pub struct RefineReport {
    /// Concrete rules ready for flag extraction, in input order.
    pub refined: Vec<String>,
    /// Rules that could not be translated into concrete checks.
    pub untranslatable: Vec<String>,
}

/// Normalize a refine result against what the model actually returned.
///
/// Invariants enforced regardless of the response:
/// - `passed_through` with an empty list gets the original rule back
/// - `translated` with an empty list is demoted to `untranslatable`
/// - `untranslatable` always carries an empty list
pub fn normalize_refinement(
    outcome: RefineOutcome,
    rules: Vec<String>,
    original: &str,
) -> (RefineOutcome, Vec<String>) {
    match outcome {
        RefineOutcome::PassedThrough if rules.is_empty() => {
            (RefineOutcome::PassedThrough, vec![original.to_string()])
        }
        RefineOutcome::Translated if rules.is_empty() => {
            (RefineOutcome::Untranslatable, Vec::new())
        }
        RefineOutcome::Untranslatable => (RefineOutcome::Untranslatable, Vec::new()),
        RefineOutcome::PassedThrough | RefineOutcome::Translated => (outcome, rules),
    }
}

/// Refine every lintable rule, one gateway call per rule.
///
/// A gateway failure never loses a rule: the rule passes through
/// unrefined and takes its chances in extraction.
pub async fn refine_rules(
    gateway: &LlmGateway,
    lintable: &[String],
    progress: Option<&ProgressBar>,
) -> RefineReport {
    let mut report = RefineReport::default();

    for rule in lintable {
        let (outcome, rules) = match gateway.refine_rule(rule).await {
            Ok(response) => normalize_refinement(response.outcome, response.refined_rules, rule),
            Err(e) => {
                warn!(rule = %rule, "Refinement failed: {e}. Passing rule through unrefined.");
                (RefineOutcome::PassedThrough, vec![rule.clone()])
            }
        };

        match outcome {
            RefineOutcome::PassedThrough => report.refined.extend(rules),
            RefineOutcome::Translated => {
                narrate(
                    progress,
                    &format!("Rule '{rule}' was translated into {} sub-rules:", rules.len()),
                );
                for sub_rule in &rules {
                    narrate(progress, &format!("  - {sub_rule}"));
                }
                report.refined.extend(rules);
            }
            RefineOutcome::Untranslatable => {
                narrate(progress, &format!("Rule marked as untranslatable: '{rule}'"));
                report.untranslatable.push(rule.clone());
            }
        }

        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    report
}

fn narrate(progress: Option<&ProgressBar>, message: &str) {
    match progress {
        Some(pb) => pb.println(message),
        None => tracing::info!("{message}"),
    }
}
