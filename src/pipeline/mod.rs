//! The rule-processing pipeline.
//!
//! Raw lines flow strictly downstream:
//! filter (one call over all lines) → refine (sequential, per line) →
//! extract (parallel fan-out, per refined rule) → aggregate (dedup +
//! severity escalation). Each stage owns its output outright; nothing is
//! mutated after a later stage has seen it.

pub mod aggregate;
pub mod extract;
pub mod filter;
pub mod orchestrator;
pub mod refine;

use serde::{Deserialize, Serialize};

/// Enforcement level for a flagged term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    #[default]
    Warn,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warn => "warn",
        }
    }
}

/// The syntactic role a flagged term plays in code.
///
/// Anything the model invents beyond the six recognized tags
/// deserializes to `Unknown`, which selects the broadest match template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SyntaxContext {
    Identifier,
    Literal,
    Operator,
    Keyword,
    Property,
    Import,
    #[default]
    #[serde(other)]
    Unknown,
}

/// One concrete thing to detect: a term, where it appears, how loudly to
/// complain. Extracted from a refined rule; zero or more per rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    pub term: String,
    #[serde(default)]
    pub context: SyntaxContext,
    #[serde(default)]
    pub severity: Severity,
}

/// A generated detection rule: a match pattern plus the human-readable
/// message shown when it fires. Two configs are duplicates iff their
/// `pattern` fields are equal; messages are ignored for dedup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    pub pattern: String,
    pub message: String,
}

/// How the refine stage classified a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefineOutcome {
    PassedThrough,
    Translated,
    Untranslatable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serde_round_trip() {
        assert_eq!(serde_json::to_string(&Severity::Error).unwrap(), "\"error\"");
        let parsed: Severity = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(parsed, Severity::Warn);
    }

    #[test]
    fn test_unknown_context_falls_back() {
        let parsed: SyntaxContext = serde_json::from_str("\"TemplateElement\"").unwrap();
        assert_eq!(parsed, SyntaxContext::Unknown);
    }

    #[test]
    fn test_flag_defaults_for_missing_fields() {
        let flag: Flag = serde_json::from_str(r#"{"term": "=="}"#).unwrap();
        assert_eq!(flag.context, SyntaxContext::Unknown);
        assert_eq!(flag.severity, Severity::Warn);
    }

    #[test]
    fn test_refine_outcome_snake_case() {
        let parsed: RefineOutcome = serde_json::from_str("\"passed_through\"").unwrap();
        assert_eq!(parsed, RefineOutcome::PassedThrough);
    }
}
