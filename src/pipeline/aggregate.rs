//! Aggregation: dedup generated patterns and compute the overall
//! severity for the combined rule entry.

use crate::pipeline::{PatternConfig, Severity};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

/// The final, deduplicated rule set.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateResult {
    /// Deduplicated pattern configs, first-seen order.
    pub patterns: Vec<PatternConfig>,
    /// `error` iff at least one contributing flag was an error.
    pub overall_severity: Severity,
    /// Length of the deduplicated sequence.
    pub pattern_count: usize,
}

/// Collapse all per-flag configs into one rule entry.
///
/// Single pass in the order received: a pattern already seen is
/// skipped (first-seen message wins), and the overall severity is
/// upgraded to `error` on the first error-severity pair, never
/// downgraded. Configs with an empty pattern are malformed and are
/// skipped with a warning rather than propagated.
pub fn aggregate(flag_configs: Vec<(Severity, PatternConfig)>) -> AggregateResult {
    info!(
        configs = flag_configs.len(),
        "Aggregating flag configurations"
    );

    let mut seen_patterns: HashSet<String> = HashSet::new();
    let mut patterns = Vec::new();
    let mut overall_severity = Severity::Warn;

    for (severity, config) in flag_configs {
        if config.pattern.is_empty() {
            warn!("Skipping invalid config object during aggregation: {config:?}");
            continue;
        }
        if !seen_patterns.insert(config.pattern.clone()) {
            continue;
        }
        if severity == Severity::Error {
            overall_severity = Severity::Error;
        }
        patterns.push(config);
    }

    let pattern_count = patterns.len();
    AggregateResult {
        patterns,
        overall_severity,
        pattern_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pattern: &str, message: &str) -> PatternConfig {
        PatternConfig {
            pattern: pattern.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_duplicate_patterns_keep_first_seen_message() {
        let result = aggregate(vec![
            (Severity::Warn, config("Identifier[name='mock']", "first")),
            (Severity::Warn, config("Identifier[name='mock']", "second")),
            (Severity::Warn, config("Identifier[name='dummy']", "third")),
        ]);

        assert_eq!(result.pattern_count, 2);
        assert_eq!(result.patterns[0].message, "first");
    }

    #[test]
    fn test_all_warn_input_stays_warn() {
        let result = aggregate(vec![
            (Severity::Warn, config("a", "m")),
            (Severity::Warn, config("b", "m")),
        ]);
        assert_eq!(result.overall_severity, Severity::Warn);
    }

    #[test]
    fn test_single_error_escalates_overall_severity() {
        let result = aggregate(vec![
            (Severity::Warn, config("a", "m")),
            (Severity::Error, config("b", "m")),
            (Severity::Warn, config("c", "m")),
        ]);
        assert_eq!(result.overall_severity, Severity::Error);
    }

    #[test]
    fn test_empty_input_yields_empty_warn_result() {
        let result = aggregate(Vec::new());
        assert_eq!(result.pattern_count, 0);
        assert!(result.patterns.is_empty());
        assert_eq!(result.overall_severity, Severity::Warn);
    }

    #[test]
    fn test_empty_pattern_configs_are_skipped() {
        let result = aggregate(vec![
            (Severity::Error, config("", "malformed")),
            (Severity::Warn, config("a", "fine")),
        ]);

        // The malformed config neither appears nor escalates severity.
        assert_eq!(result.pattern_count, 1);
        assert_eq!(result.overall_severity, Severity::Warn);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let input = vec![
            (Severity::Error, config("a", "one")),
            (Severity::Warn, config("b", "two")),
            (Severity::Warn, config("a", "dupe")),
        ];

        let first = aggregate(input);
        let rewrapped: Vec<_> = first
            .patterns
            .iter()
            .cloned()
            .map(|c| (first.overall_severity, c))
            .collect();
        let second = aggregate(rewrapped);

        assert_eq!(first.patterns, second.patterns);
        assert_eq!(first.overall_severity, second.overall_severity);
        assert_eq!(first.pattern_count, second.pattern_count);
    }
}
