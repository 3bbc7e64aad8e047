//! Prompt construction for the three pipeline stages.
//!
//! Templates live under `prompts/` and are compiled in with
//! `include_str!`. Builders substitute `{{placeholder}}` variables; no
//! templating engine, the prompts only ever need plain replacement.

/// Load the filter-stage prompt template.
pub fn filter_prompt() -> &'static str {
    include_str!("../../prompts/filter.md")
}

/// Load the refine-stage prompt template.
pub fn refine_prompt() -> &'static str {
    include_str!("../../prompts/refine.md")
}

/// Load the extract-stage prompt template.
pub fn extract_prompt() -> &'static str {
    include_str!("../../prompts/extract.md")
}

/// Build the filter prompt over the full set of raw input lines.
///
/// The whole file goes out in a single call; the model sees every line
/// at once so it can recognize section headers and comment blocks.
pub fn build_filter_prompt(raw_lines: &[String]) -> String {
    filter_prompt().replace("{{input_lines}}", &raw_lines.join("\n"))
}

/// Build the refine prompt for a single lintable rule.
pub fn build_refine_prompt(rule_text: &str) -> String {
    refine_prompt().replace("{{rule_text}}", rule_text)
}

/// Build the extract prompt for a single refined rule.
pub fn build_extract_prompt(rule_text: &str) -> String {
    extract_prompt().replace("{{rule_text}}", rule_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_prompt_joins_lines() {
        let lines = vec!["Use === instead of ==".to_string(), "# comment".to_string()];
        let prompt = build_filter_prompt(&lines);

        assert!(prompt.contains("Use === instead of ==\n# comment"));
        assert!(prompt.contains("lintable_rules"));
        assert!(!prompt.contains("{{input_lines}}"));
    }

    #[test]
    fn test_build_refine_prompt_substitutes_rule() {
        let prompt = build_refine_prompt("WE DONT USE FALLBACKS. EVER.");

        assert!(prompt.contains("WE DONT USE FALLBACKS. EVER."));
        assert!(prompt.contains("passed_through"));
        assert!(prompt.contains("untranslatable"));
        assert!(!prompt.contains("{{rule_text}}"));
    }

    #[test]
    fn test_build_extract_prompt_substitutes_rule() {
        let prompt = build_extract_prompt("Avoid using Math.random()");

        assert!(prompt.contains("Avoid using Math.random()"));
        assert!(prompt.contains("no-restricted-syntax"));
        assert!(!prompt.contains("{{rule_text}}"));
    }
}
