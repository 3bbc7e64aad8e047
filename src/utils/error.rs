use console::style;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

/// Compiled regex patterns for redacting sensitive data.
/// Using LazyLock for thread-safe one-time initialization.
///
/// Note: These patterns are static compile-time constants that are validated by tests.
/// The expect() calls here are acceptable because:
/// 1. Patterns are known-valid literals, not runtime input
/// 2. Tests verify all patterns compile successfully
/// 3. Any regex error would be caught immediately at first use
static REDACTION_PATTERNS: LazyLock<[(regex::Regex, &'static str); 4]> = LazyLock::new(|| {
    [
        (
            regex::Regex::new(r"(api[_-]?key[=:\s]+)[^\s]+")
                .expect("api_key redaction pattern is invalid"),
            "${1}[REDACTED]",
        ),
        (
            regex::Regex::new(r"(token[=:\s]+)[^\s]+").expect("token redaction pattern is invalid"),
            "${1}[REDACTED]",
        ),
        (
            regex::Regex::new(r"(?i)(bearer\s+)[^\s]+")
                .expect("bearer redaction pattern is invalid"),
            "${1}[REDACTED]",
        ),
        (
            regex::Regex::new(r"(sk-[a-zA-Z0-9]{8,})")
                .expect("sk-key redaction pattern is invalid"),
            "[REDACTED]",
        ),
    ]
});

#[derive(Debug, Error)]
pub enum LintyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("LLM provider error: {provider} - {}", redact_sensitive_data(message))]
    Provider { provider: String, message: String },

    #[error("Rate limited by {provider}, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("{stage} call timed out after {timeout:?}")]
    Timeout { stage: String, timeout: Duration },

    #[error("Malformed {stage} response: {message}")]
    MalformedResponse { stage: String, message: String },

    #[error("Parse error: {message}")]
    ParseError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Output error: {0}")]
    Output(String),

    #[error("Validation error: {message}\nSuggestion: {suggestion}")]
    ValidationError { message: String, suggestion: String },

    #[error("Network error: {message}")]
    NetworkError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Redact sensitive information from error messages.
fn redact_sensitive_data(message: &str) -> String {
    let mut result = message.to_string();
    for (pattern, replacement) in REDACTION_PATTERNS.iter() {
        result = pattern.replace_all(&result, *replacement).to_string();
    }
    result
}

impl LintyError {
    pub fn invalid_format(format: &str) -> Self {
        LintyError::ValidationError {
            message: format!("Invalid output format: '{}'", format),
            suggestion: "Valid formats are: eslint, json".to_string(),
        }
    }

    pub fn invalid_provider(provider: &str) -> Self {
        LintyError::ValidationError {
            message: format!("Invalid provider: '{}'", provider),
            suggestion: "Valid providers are: openai, anthropic".to_string(),
        }
    }

    pub fn missing_api_key(provider: &str) -> Self {
        let env_var = format!("{}_API_KEY", provider.to_uppercase());
        LintyError::ValidationError {
            message: format!("API key not configured for provider '{}'", provider),
            suggestion: format!(
                "Set the {} environment variable or add it to your config file",
                env_var
            ),
        }
    }

    pub fn missing_rules_file(path: &std::path::Path) -> Self {
        LintyError::ValidationError {
            message: format!("Rules file not found: {}", path.display()),
            suggestion: "Pass the path to your rules file as the first argument".to_string(),
        }
    }

    pub fn empty_rules_file(path: &std::path::Path) -> Self {
        LintyError::ValidationError {
            message: format!(
                "Rules file is empty or contains only whitespace: {}",
                path.display()
            ),
            suggestion: "Add at least one rule, one per line".to_string(),
        }
    }
}

/// Format an error for terminal display.
///
/// Validation errors carry a suggestion line; in verbose mode the full
/// source chain is printed below the message.
pub fn format_error(error: &LintyError, verbose: bool) -> String {
    let mut out = format!(
        "\n{} {}",
        style("\u{26a0}").red().bold(),
        style(error.to_string()).bold()
    );

    if verbose {
        let mut source = std::error::Error::source(error);
        let mut first = true;
        while let Some(cause) = source {
            if first {
                out.push_str("\n\nCaused by:");
                first = false;
            }
            out.push_str(&format!("\n  {}", cause));
            source = cause.source();
        }
    }

    out
}

impl From<serde_json::Error> for LintyError {
    fn from(err: serde_json::Error) -> Self {
        LintyError::ParseError {
            message: "Failed to parse JSON response".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::de::Error> for LintyError {
    fn from(err: toml::de::Error) -> Self {
        LintyError::ParseError {
            message: "Failed to parse TOML configuration".to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<reqwest::Error> for LintyError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Request timed out. Check your network connection.".to_string()
        } else if err.is_connect() {
            "Failed to connect to server. Check your network connection.".to_string()
        } else if err.is_status() {
            format!(
                "HTTP error: {}",
                err.status()
                    .map_or("unknown".to_string(), |s| s.to_string())
            )
        } else {
            "Network request failed".to_string()
        };

        LintyError::NetworkError {
            message,
            source: Some(Box::new(err)),
        }
    }
}
