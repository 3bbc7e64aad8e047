//! Configuration management using the `config` crate for hierarchical
//! discovery and merging.
//!
//! ## Configuration sources (highest to lowest precedence):
//! 1. **CLI flags**
//! 2. **Environment variables** (`LINTY_*` prefix)
//! 3. **Config files**
//!
//! ## Config file discovery (in merge order, later overrides earlier):
//! 1. `~/.config/linty/config.toml` (user config directory)
//! 2. `linty.toml` in the git repository root
//! 3. `./linty.toml` in the current directory
//! 4. Explicit `--config` path (if provided and exists)

use crate::MergedConfig;
use crate::cli::args::Args;
use crate::llm::gateway::{GatewaySettings, StageSettings};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure loaded from config files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub stages: StagesConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    pub model: Option<String>,
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            max_workers: default_max_workers(),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_max_workers() -> usize {
    8
}

/// Per-stage model/timeout/temperature overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StagesConfig {
    #[serde(default)]
    pub filter: StageSettings,
    #[serde(default)]
    pub refine: StageSettings,
    #[serde(default)]
    pub extract: StageSettings,
}

/// Output format and path configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub format: Option<String>,
    pub backups: Option<bool>,
}

/// LLM provider configurations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub openai: Option<ProviderConfig>,
    pub anthropic: Option<ProviderConfig>,
}

/// Configuration for a single LLM provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub model: Option<String>,
    pub max_tokens: Option<usize>,
}

fn discover_config_paths(explicit_path: &PathBuf) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // User config (lowest precedence)
    if let Some(user_config) = get_user_config_path() {
        paths.push(user_config);
    }

    // Git root config
    if let Some(git_root) = find_git_root() {
        let git_config = git_root.join("linty.toml");
        if git_config.exists() {
            paths.push(git_config);
        }
    }

    // Current directory config
    let current_dir_config = PathBuf::from("linty.toml");
    if current_dir_config.exists() {
        paths.push(current_dir_config);
    }

    // Explicit --config path (highest precedence)
    if explicit_path != &PathBuf::from("linty.toml") && explicit_path.exists() {
        paths.push(explicit_path.clone());
    }

    paths
}

fn find_git_root() -> Option<PathBuf> {
    git2::Repository::discover(".")
        .ok()
        .and_then(|repo| repo.workdir().map(|p| p.to_path_buf()))
}

fn get_user_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|config_dir| config_dir.join("linty").join("config.toml"))
        .filter(|path| path.exists())
}

/// Load configuration from discovered config files and environment variables.
pub fn load(args: &Args) -> Result<Config> {
    let mut builder = config::Config::builder();

    for config_path in discover_config_paths(&args.config) {
        builder = builder.add_source(config::File::from(config_path));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("LINTY")
            .separator("_")
            .try_parsing(true),
    );

    let settings = builder.build().context("Failed to build configuration")?;

    settings
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

/// Merge CLI args over file/env config into the final resolved config.
pub fn merge_config(args: &Args, config: Config) -> MergedConfig {
    let format = args
        .format
        .map(|f| f.as_str().to_string())
        .or(config.output.format)
        .unwrap_or_else(|| "eslint".to_string());

    let output = args
        .output
        .clone()
        .or_else(|| config.output.path.map(PathBuf::from))
        .unwrap_or_else(|| default_output_path(&format));

    let provider = args
        .provider
        .clone()
        .unwrap_or(config.general.provider);

    // Provider-level model default; the CLI --model wins, per-stage
    // models from [stages.*] win over both at call time.
    let provider_model = match provider.as_str() {
        "openai" => config.providers.openai.as_ref().and_then(|p| p.model.clone()),
        "anthropic" => config
            .providers
            .anthropic
            .as_ref()
            .and_then(|p| p.model.clone()),
        _ => None,
    };
    let model = args
        .model
        .clone()
        .or(config.general.model)
        .or(provider_model);

    let gateway = resolve_gateway_settings(&config.stages);

    MergedConfig {
        rules_file: args.rules_file.clone(),
        output,
        format,
        provider,
        model,
        max_workers: args.max_workers.unwrap_or(config.general.max_workers),
        gateway,
        force: args.force,
        create_backups: !args.no_backup && config.output.backups.unwrap_or(true),
        no_confirm: args.no_confirm,
        dry_run: args.dry_run,
        verbose: args.verbose,
        quiet: args.quiet,
    }
}

fn default_output_path(format: &str) -> PathBuf {
    match format {
        "json" => PathBuf::from("linty-rules.json"),
        _ => PathBuf::from("eslint.config.mjs"),
    }
}

/// Overlay file-level stage settings onto the built-in defaults.
fn resolve_gateway_settings(stages: &StagesConfig) -> GatewaySettings {
    let mut settings = GatewaySettings::default();
    overlay_stage(&mut settings.filter, &stages.filter);
    overlay_stage(&mut settings.refine, &stages.refine);
    overlay_stage(&mut settings.extract, &stages.extract);
    settings
}

fn overlay_stage(base: &mut StageSettings, overlay: &StageSettings) {
    if overlay.model.is_some() {
        base.model = overlay.model.clone();
    }
    if overlay.timeout_secs.is_some() {
        base.timeout_secs = overlay.timeout_secs;
    }
    if overlay.temperature.is_some() {
        base.temperature = overlay.temperature;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args_from(argv: &[&str]) -> Args {
        Args::parse_from(argv)
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.general.provider, "openai");
        assert_eq!(config.general.max_workers, 8);
    }

    #[test]
    fn test_config_parses_stage_overrides() {
        let toml_str = r#"
[general]
provider = "anthropic"
max_workers = 4

[stages.extract]
timeout_secs = 30
temperature = 0.0
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.provider, "anthropic");
        assert_eq!(config.stages.extract.timeout_secs, Some(30));
        assert_eq!(config.stages.extract.temperature, Some(0.0));
        assert!(config.stages.filter.timeout_secs.is_none());
    }

    #[test]
    fn test_merge_cli_overrides_file() {
        let toml_str = r#"
[general]
provider = "anthropic"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let args = args_from(&["linty", "--provider", "openai"]);

        let merged = merge_config(&args, config);
        assert_eq!(merged.provider, "openai");
    }

    #[test]
    fn test_merge_falls_back_to_file_then_defaults() {
        let config: Config = toml::from_str("").unwrap();
        let args = args_from(&["linty"]);

        let merged = merge_config(&args, config);
        assert_eq!(merged.provider, "openai");
        assert_eq!(merged.format, "eslint");
        assert_eq!(merged.output, PathBuf::from("eslint.config.mjs"));
        assert_eq!(merged.max_workers, 8);
        assert!(merged.create_backups);
    }

    #[test]
    fn test_merge_stage_settings_keep_defaults_unless_overridden() {
        let toml_str = r#"
[stages.refine]
timeout_secs = 90
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let args = args_from(&["linty"]);

        let merged = merge_config(&args, config);
        assert_eq!(merged.gateway.refine.timeout_secs, Some(90));
        // Untouched defaults survive the overlay
        assert_eq!(merged.gateway.refine.temperature, Some(0.2));
        assert_eq!(merged.gateway.extract.timeout_secs, Some(45));
    }

    #[test]
    fn test_json_format_changes_default_output() {
        let config = Config::default();
        let args = args_from(&["linty", "--format", "json"]);

        let merged = merge_config(&args, config);
        assert_eq!(merged.output, PathBuf::from("linty-rules.json"));
    }

    #[test]
    fn test_provider_model_fallback() {
        let toml_str = r#"
[providers.openai]
model = "gpt-4o-mini"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let args = args_from(&["linty"]);

        let merged = merge_config(&args, config);
        assert_eq!(merged.model.as_deref(), Some("gpt-4o-mini"));
    }
}
