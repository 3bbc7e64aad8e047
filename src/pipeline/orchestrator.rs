//! Parallel fan-out over refined rules.
//!
//! One task per rule, bounded by a semaphore; the join point is the
//! only place results merge. Completion order is first-finished, which
//! is fine because aggregation is order-insensitive up to first-seen
//! dedup tie-breaking.

use crate::llm::LlmGateway;
use crate::pipeline::extract::process_refined_rule;
use crate::pipeline::{PatternConfig, Severity};
use indicatif::ProgressBar;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error};

/// Size the worker pool: a small constant headroom above hardware
/// parallelism, capped by configuration. The bottleneck is network
/// latency to the provider, not compute.
pub fn worker_count(configured_max: usize) -> usize {
    let available = std::thread::available_parallelism().map_or(1, |n| n.get());
    configured_max.min(available + 4).max(1)
}

/// Run flag extraction concurrently over all refined rules.
///
/// Every task runs to completion, success or failure; a single failed
/// or panicked task is logged with its source rule and excluded from
/// the result without aborting its siblings.
pub async fn run(
    gateway: Arc<LlmGateway>,
    refined_rules: Vec<String>,
    max_workers: usize,
    progress: Option<&ProgressBar>,
) -> Vec<(Severity, PatternConfig)> {
    let workers = worker_count(max_workers);
    debug!(
        rules = refined_rules.len(),
        workers, "Starting parallel flag extraction"
    );

    let semaphore = Arc::new(Semaphore::new(workers));
    let mut tasks = JoinSet::new();
    let mut sources: HashMap<tokio::task::Id, String> = HashMap::new();

    for rule_text in refined_rules {
        let gateway = Arc::clone(&gateway);
        let semaphore = Arc::clone(&semaphore);
        let task_rule = rule_text.clone();

        let handle = tasks.spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                // Semaphore is never closed while tasks run; treat a
                // closed semaphore like a failed task.
                return Vec::new();
            };
            process_refined_rule(&gateway, &task_rule).await
        });

        sources.insert(handle.id(), rule_text);
    }

    let mut all_configs = Vec::new();

    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((id, configs)) => {
                sources.remove(&id);
                all_configs.extend(configs);
            }
            Err(join_error) => {
                let rule = sources
                    .remove(&join_error.id())
                    .unwrap_or_else(|| "<unknown rule>".to_string());
                error!(rule = %rule, "Extraction task failed: {join_error:?}");
            }
        }

        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    all_configs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{GatewaySettings, LlmGateway};
    use crate::llm::provider::{
        CompletionOptions, CompletionResponse, LLMProvider, Message, Pricing,
    };
    use crate::utils::error::LintyError;
    use async_trait::async_trait;

    #[test]
    fn test_worker_count_respects_configured_max() {
        assert_eq!(worker_count(1), 1);
        let available = std::thread::available_parallelism().map_or(1, |n| n.get());
        assert_eq!(worker_count(10_000), available + 4);
    }

    #[test]
    fn test_worker_count_is_at_least_one() {
        assert_eq!(worker_count(0), 1);
    }

    /// Answers extract calls by echoing the rule back as an identifier
    /// flag, so each task's output is traceable to its input.
    #[derive(Debug)]
    struct EchoProvider;

    #[async_trait]
    impl LLMProvider for EchoProvider {
        async fn complete(
            &self,
            messages: &[Message],
            _options: &CompletionOptions,
        ) -> Result<CompletionResponse, LintyError> {
            let prompt = &messages[0].content;
            let term = if prompt.contains("rule-a") {
                "alpha"
            } else if prompt.contains("rule-b") {
                "beta"
            } else {
                "gamma"
            };
            Ok(CompletionResponse::new(
                format!(
                    r#"{{"flags": [{{"term": "{term}", "context": "Identifier", "severity": "warn"}}]}}"#
                ),
                10,
                10,
            ))
        }

        fn model(&self) -> &str {
            "echo-model"
        }

        fn pricing(&self) -> Pricing {
            Pricing {
                input_per_1k: 0.0,
                output_per_1k: 0.0,
            }
        }
    }

    #[tokio::test]
    async fn test_all_rules_produce_configs() {
        let gateway = Arc::new(LlmGateway::new(
            Box::new(EchoProvider),
            GatewaySettings::default(),
        ));

        let rules = vec![
            "rule-a".to_string(),
            "rule-b".to_string(),
            "rule-c".to_string(),
        ];

        let configs = run(gateway, rules, 8, None).await;

        assert_eq!(configs.len(), 3);
        let patterns: Vec<_> = configs.iter().map(|(_, c)| c.pattern.as_str()).collect();
        assert!(patterns.iter().any(|p| p.contains("alpha")));
        assert!(patterns.iter().any(|p| p.contains("beta")));
        assert!(patterns.iter().any(|p| p.contains("gamma")));
    }

    /// Panics on one specific rule, succeeds on the rest.
    #[derive(Debug)]
    struct PanickingProvider;

    #[async_trait]
    impl LLMProvider for PanickingProvider {
        async fn complete(
            &self,
            messages: &[Message],
            _options: &CompletionOptions,
        ) -> Result<CompletionResponse, LintyError> {
            assert!(
                !messages[0].content.contains("poison"),
                "provider blew up on poisoned rule"
            );
            Ok(CompletionResponse::new(
                r#"{"flags": [{"term": "ok", "context": "Identifier", "severity": "warn"}]}"#
                    .to_string(),
                10,
                10,
            ))
        }

        fn model(&self) -> &str {
            "panicking-model"
        }

        fn pricing(&self) -> Pricing {
            Pricing {
                input_per_1k: 0.0,
                output_per_1k: 0.0,
            }
        }
    }

    #[tokio::test]
    async fn test_one_panicking_task_does_not_abort_siblings() {
        let gateway = Arc::new(LlmGateway::new(
            Box::new(PanickingProvider),
            GatewaySettings::default(),
        ));

        let rules = vec![
            "fine rule one".to_string(),
            "poison".to_string(),
            "fine rule two".to_string(),
        ];

        let configs = run(gateway, rules, 4, None).await;

        // The poisoned task is dropped; the two healthy tasks survive.
        assert_eq!(configs.len(), 2);
    }
}
