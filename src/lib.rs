//! # linty pipeline infrastructure
//!
//! linty turns a file of free-form natural-language style rules into an
//! ESLint flat config, using an LLM as the translator from prose to
//! syntactic patterns. The run is staged:
//!
//! 1. **Init** - Configuration validation and gateway setup
//! 2. **Reading** - Loading the rules file
//! 3. **Filtering** - One LLM call classifying lines as lintable or not
//! 4. **Refining** - Sequential per-rule expansion into concrete sub-rules
//! 5. **Extracting** - Parallel per-rule flag extraction and codegen
//! 6. **Aggregating** - Dedup and severity escalation
//! 7. **Writing** - Emitting the generated config file
//! 8. **Reporting** - Success summary
//!
//! ## Architecture
//!
//! The `MergedConfig` struct is the single source of truth for all
//! configuration values, resolved from CLI flags over `LINTY_*`
//! environment variables over `linty.toml` files. The LLM connection is
//! an explicit `LlmGateway` capability constructed once here and passed
//! by reference into every stage; stages recover from gateway failures
//! with stage-specific safe defaults and the run always produces the
//! best output the surviving calls allow.

pub mod cli;
pub mod generator;
pub mod input;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod utils;

use crate::llm::gateway::GatewaySettings;
use crate::llm::{LlmGateway, create_provider};
use crate::output::writer::WriteOptions;
use crate::output::{Metadata, get_formatter};
use crate::pipeline::{aggregate, filter, orchestrator, refine};
use crate::utils::progress::{ProgressManager, stages};
use crate::utils::summary::{RunStats, display_success_summary};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Final resolved configuration after merging all sources (CLI, env,
/// config files).
#[derive(Debug, Clone)]
pub struct MergedConfig {
    /// Path to the rules file (one rule per line)
    pub rules_file: PathBuf,
    /// Output file path
    pub output: PathBuf,
    /// Output format ("eslint" or "json")
    pub format: String,
    /// LLM provider (e.g., "openai", "anthropic")
    pub provider: String,
    /// Model name applied to every stage unless a stage overrides it
    pub model: Option<String>,
    /// Maximum concurrent extraction workers
    pub max_workers: usize,
    /// Per-stage gateway settings (model, timeout, temperature)
    pub gateway: GatewaySettings,
    /// Overwrite existing output without asking
    pub force: bool,
    /// Back up an existing output file before overwriting
    pub create_backups: bool,
    /// Never prompt interactively
    pub no_confirm: bool,
    /// Show what would be processed without calling the LLM
    pub dry_run: bool,
    /// Verbosity level (0-3)
    pub verbose: u8,
    /// Quiet mode (suppress non-essential output)
    pub quiet: bool,
}

/// Tracks the current stage of pipeline execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Configuration validation and gateway setup
    Init,
    /// Loading the rules file
    Reading,
    /// LLM classification of raw lines
    Filtering,
    /// Sequential rule refinement
    Refining,
    /// Parallel flag extraction
    Extracting,
    /// Dedup and severity escalation
    Aggregating,
    /// Writing the generated config
    Writing,
    /// Success summary
    Reporting,
    /// Pipeline completed successfully
    Complete,
}

/// Initialize logging based on verbosity level.
///
/// `RUST_LOG` wins when set; otherwise verbosity maps to a default
/// filter that keeps normal runs quiet under the progress bars.
pub fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "linty=info",
        2 => "linty=debug",
        _ => "trace",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

pub async fn run(config: MergedConfig) -> Result<()> {
    let start = Instant::now();

    tracing::info!("linty v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "Configuration: provider={}, model={:?}, format={}, max_workers={}",
        config.provider,
        config.model,
        config.format,
        config.max_workers
    );

    // Stage 1: Init
    let mut stage = PipelineStage::Init;
    tracing::info!("Pipeline stage: {:?}", stage);

    if config.dry_run {
        display_dry_run_config(&config);
        return Ok(());
    }

    // Stage 2: Reading
    stage = PipelineStage::Reading;
    tracing::info!("Pipeline stage: {:?}", stage);
    let raw_lines = input::read_rules_file(&config.rules_file)
        .context("Failed to read rules file")?;

    // Provider construction is fatal on a missing credential, before
    // any pipeline stage runs.
    let provider = create_provider(&config.provider, config.model.as_deref())
        .context("Failed to initialize LLM provider")?;
    let gateway = Arc::new(LlmGateway::new(provider, config.gateway.clone()));

    let mut progress = ProgressManager::new();
    let mut stats = RunStats {
        lines_read: raw_lines.len(),
        ..RunStats::default()
    };

    // Stage 3: Filtering
    stage = PipelineStage::Filtering;
    tracing::info!("Pipeline stage: {:?}", stage);
    let filter_bar = progress.add_stage(stages::FILTERING, 1);
    filter_bar.set_message(format!("{} lines", raw_lines.len()));

    let filter_outcome = filter::filter_rules(&gateway, &raw_lines).await;
    progress.finish(
        stages::FILTERING,
        &format!(
            "Filtering complete: {} potential rules",
            filter_outcome.lintable.len()
        ),
    );

    if !config.quiet && !filter_outcome.filtered_out.is_empty() {
        println!("\nThe following lines were filtered out as non-lintable:");
        for line in filter_outcome.filtered_out.iter().filter(|l| !l.is_empty()) {
            println!("  - '{line}'");
        }
    }

    stats.lintable_rules = filter_outcome.lintable.len();
    if filter_outcome.lintable.is_empty() {
        println!("\nNo potentially lintable rules found after filtering. Exiting.");
        return Ok(());
    }

    // Stage 4: Refining
    stage = PipelineStage::Refining;
    tracing::info!("Pipeline stage: {:?}", stage);
    let refine_bar = progress.add_stage(stages::REFINING, filter_outcome.lintable.len() as u64);

    let report = refine::refine_rules(&gateway, &filter_outcome.lintable, Some(&refine_bar)).await;
    progress.finish(
        stages::REFINING,
        &format!("Refinement complete: {} concrete rules", report.refined.len()),
    );

    if !config.quiet && !report.untranslatable.is_empty() {
        println!("\nThe following rules could not be translated into concrete checks:");
        for rule in &report.untranslatable {
            println!("  - '{rule}'");
        }
    }

    stats.refined_rules = report.refined.len();
    stats.untranslatable_rules = report.untranslatable.len();
    if report.refined.is_empty() {
        println!("\nNo rules remaining after refinement. Exiting.");
        return Ok(());
    }

    // Stage 5: Extracting
    stage = PipelineStage::Extracting;
    tracing::info!("Pipeline stage: {:?}", stage);
    let extract_bar = progress.add_stage(stages::EXTRACTING, report.refined.len() as u64);

    let flag_configs = orchestrator::run(
        Arc::clone(&gateway),
        report.refined.clone(),
        config.max_workers,
        Some(&extract_bar),
    )
    .await;
    progress.finish(
        stages::EXTRACTING,
        &format!("Extraction complete: {} flag configs", flag_configs.len()),
    );

    // Stage 6: Aggregating
    stage = PipelineStage::Aggregating;
    tracing::info!("Pipeline stage: {:?}", stage);
    let result = aggregate::aggregate(flag_configs);
    stats.patterns_emitted = result.pattern_count;
    stats.overall_severity = result.overall_severity.as_str();

    // Stage 7: Writing
    stage = PipelineStage::Writing;
    tracing::info!("Pipeline stage: {:?}", stage);
    let formatter = get_formatter(&config.format).context("Failed to resolve output format")?;
    let metadata = Metadata {
        generated_at: chrono::Utc::now(),
        rules_processed: report.refined.len(),
        untranslatable: report.untranslatable.clone(),
    };
    let content = formatter
        .format(&result, &metadata)
        .context("Failed to render output")?;

    let write_options = WriteOptions::new(&config.output)
        .with_backups(config.create_backups)
        .with_force(config.force)
        .with_no_confirm(config.no_confirm);
    let output_result = output::writer::write_output(&content, &write_options)
        .context("Failed to write output file")?;

    // Stage 8: Reporting
    stage = PipelineStage::Reporting;
    tracing::info!("Pipeline stage: {:?}", stage);
    stats.tokens_used = gateway.tokens_used();
    display_success_summary(&output_result, &stats, start.elapsed(), config.quiet)?;

    stage = PipelineStage::Complete;
    tracing::info!("Pipeline stage: {:?}", stage);

    Ok(())
}

/// Display configuration summary for dry-run mode.
fn display_dry_run_config(config: &MergedConfig) {
    println!("Dry Run Mode - Configuration Summary");
    println!("=====================================");
    println!("Rules file:   {}", config.rules_file.display());
    println!("Output:       {}", config.output.display());
    println!("Format:       {}", config.format);
    println!("Provider:     {}", config.provider);
    println!(
        "Model:        {}",
        config.model.as_deref().unwrap_or("provider default")
    );
    println!("Max workers:  {}", config.max_workers);
    println!("Force:        {}", config.force);
    println!();
    println!("No LLM calls will be made.");
}
