//! Pattern templates for ESLint's `no-restricted-syntax`.
//!
//! Each syntactic context maps to an AST selector template. Rendering is
//! total: any term and rule text produce a valid `PatternConfig`, with
//! unrecognized contexts handled by the `Unknown` catch-all before they
//! ever reach this module.

use crate::pipeline::{PatternConfig, SyntaxContext};

/// Render the match pattern and message for one flagged term.
///
/// The term is escaped twice, once per embedding target: selectors only
/// need their own quoting character escaped, messages need backslashes
/// and both quote characters escaped so they survive as JS string
/// literals in the generated config.
pub fn render(context: SyntaxContext, term: &str, rule_text: &str) -> PatternConfig {
    let t = escape_pattern(term);
    let msg_term = escape_message(term);
    let msg_rule = escape_message(rule_text);

    match context {
        SyntaxContext::Identifier => PatternConfig {
            pattern: format!("Identifier[name='{t}']"),
            message: format!("Usage of identifier '{msg_term}' is restricted by rule: {msg_rule}"),
        },
        SyntaxContext::Literal => PatternConfig {
            pattern: format!("Literal[value='{t}']"),
            message: format!("Usage of literal '{msg_term}' is restricted by rule: {msg_rule}"),
        },
        SyntaxContext::Operator => PatternConfig {
            pattern: format!(":matches(BinaryExpression, LogicalExpression)[operator='{t}']"),
            message: format!("Usage of operator '{msg_term}' is restricted by rule: {msg_rule}"),
        },
        // Best-effort selector for statement keywords like 'try' or 'var'
        SyntaxContext::Keyword => PatternConfig {
            pattern: format!("{}Statement", capitalize_first(&t)),
            message: format!("Usage of keyword '{msg_term}' is restricted by rule: {msg_rule}"),
        },
        SyntaxContext::Property => PatternConfig {
            pattern: format!("MemberExpression[property.name='{t}']"),
            message: format!("Usage of property '{msg_term}' is restricted by rule: {msg_rule}"),
        },
        SyntaxContext::Import => PatternConfig {
            pattern: format!("ImportDeclaration[source.value='{t}']"),
            message: format!("Import from '{msg_term}' is restricted by rule: {msg_rule}"),
        },
        SyntaxContext::Unknown => PatternConfig {
            pattern: format!(":matches(Identifier[name='{t}'], Literal[value='{t}'])"),
            message: format!(
                "Usage of '{msg_term}' is restricted by rule: {msg_rule} (context unknown)"
            ),
        },
    }
}

/// Escape a term for embedding inside a single-quoted selector string.
fn escape_pattern(term: &str) -> String {
    term.replace('\'', "\\'")
}

/// Escape text for embedding inside a JS string literal in the message.
fn escape_message(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('"', "\\\"")
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
