use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    Eslint,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Eslint => "eslint",
            OutputFormat::Json => "json",
        }
    }
}

/// CLI argument parsing with environment variable support.
///
/// Environment variables follow the pattern `LINTY_*` and are overridden
/// by CLI flags. Example: `LINTY_PROVIDER=anthropic` is overridden by
/// `--provider openai`.
///
/// Options that also exist in `linty.toml` are `Option`s here so the
/// config merge can tell "not given" apart from an explicit value.
#[derive(Parser, Debug)]
#[command(name = "linty")]
#[command(about = "Turn natural-language style rules into an enforceable ESLint config")]
#[command(version)]
pub struct Args {
    /// Path to the rules file (one rule per line)
    #[arg(default_value = ".cursorrules")]
    pub rules_file: PathBuf,

    /// Output file path
    #[arg(short, long, env = "LINTY_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, env = "LINTY_FORMAT")]
    pub format: Option<OutputFormat>,

    /// LLM provider
    #[arg(short, long, env = "LINTY_PROVIDER")]
    pub provider: Option<String>,

    /// Model to use for every stage (overrides per-stage config)
    #[arg(short, long, env = "LINTY_MODEL")]
    pub model: Option<String>,

    /// Maximum concurrent extraction workers
    #[arg(long, env = "LINTY_MAX_WORKERS")]
    pub max_workers: Option<usize>,

    /// Config file path
    #[arg(short, long, default_value = "linty.toml", env = "LINTY_CONFIG")]
    pub config: PathBuf,

    /// Overwrite an existing output file without asking
    #[arg(long, env = "LINTY_FORCE")]
    pub force: bool,

    /// Do not create a .bak backup when overwriting
    #[arg(long)]
    pub no_backup: bool,

    /// Never prompt interactively
    #[arg(long, env = "LINTY_NO_CONFIRM")]
    pub no_confirm: bool,

    /// Show what would be processed without calling the LLM
    #[arg(long, env = "LINTY_DRY_RUN")]
    pub dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short)]
    pub quiet: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
