use std::collections::HashMap;

use console::Term;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Stage name constants for consistent progress tracking.
pub mod stages {
    /// LLM filtering of raw lines (spinner, single call).
    pub const FILTERING: &str = "filtering";
    /// Sequential rule refinement.
    pub const REFINING: &str = "refining";
    /// Parallel flag extraction.
    pub const EXTRACTING: &str = "extracting";
    /// Output file writing.
    pub const WRITING: &str = "writing";
}

/// Manager for multi-stage progress bars.
///
/// Coordinates the per-stage bars through one `MultiProgress` so
/// narration lines print above active bars instead of tearing them.
/// When stdout is not a TTY (piped output, CI), bars are created hidden
/// and produce no output.
pub struct ProgressManager {
    multi: MultiProgress,
    bars: HashMap<String, ProgressBar>,
    is_tty: bool,
}

impl ProgressManager {
    #[must_use]
    pub fn new() -> Self {
        let is_tty = Term::stdout().is_term();
        Self {
            multi: MultiProgress::new(),
            bars: HashMap::new(),
            is_tty,
        }
    }

    /// Add a progress stage. `total` is ignored for spinner stages.
    #[must_use]
    pub fn add_stage(&mut self, name: &str, total: u64) -> ProgressBar {
        let pb = if self.is_tty {
            if name == stages::FILTERING {
                // Single LLM call, indeterminate
                let spinner = ProgressBar::new_spinner();
                spinner.enable_steady_tick(std::time::Duration::from_millis(100));
                self.multi.add(spinner)
            } else {
                self.multi.add(ProgressBar::new(total))
            }
        } else {
            ProgressBar::hidden()
        };

        pb.set_style(Self::style_for_stage(name));
        self.bars.insert(name.to_string(), pb.clone());
        pb
    }

    /// Update position and message; no-op for unknown stages.
    pub fn update(&self, stage: &str, current: u64, message: &str) {
        if let Some(pb) = self.bars.get(stage) {
            pb.set_position(current);
            pb.set_message(message.to_string());
        }
    }

    /// Finish a stage, clearing its bar and printing a final message.
    pub fn finish(&self, stage: &str, message: &str) {
        if let Some(pb) = self.bars.get(stage) {
            pb.finish_and_clear();
            let _ = self.multi.println(message);
        }
    }

    /// Abandon a stage after an error, leaving its bar in place.
    pub fn abandon(&self, stage: &str) {
        if let Some(pb) = self.bars.get(stage) {
            pb.abandon();
        }
    }

    fn style_for_stage(name: &str) -> ProgressStyle {
        let template = match name {
            stages::FILTERING => "{spinner:.green} Filtering rules... {msg}",
            stages::REFINING => "[{bar:40.cyan/blue}] {pos}/{len} Refining rules... {msg}",
            stages::EXTRACTING => "[{bar:40.cyan/blue}] {pos}/{len} Extracting flags... {msg}",
            stages::WRITING => "[{bar:40.cyan/blue}] {pos}/{len} Writing output... {msg}",
            _ => "[{bar:40.cyan/blue}] {pos}/{len} {msg}",
        };

        ProgressStyle::default_bar()
            .template(template)
            .unwrap_or_else(|e| {
                tracing::warn!(
                    "Failed to parse progress style template for stage '{}': {e}",
                    name
                );
                ProgressStyle::default_bar()
            })
            .progress_chars("#>-")
    }

    #[must_use]
    pub fn is_tty(&self) -> bool {
        self.is_tty
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProgressManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressManager")
            .field("stages", &self.bars.keys().collect::<Vec<_>>())
            .field("is_tty", &self.is_tty)
            .finish_non_exhaustive()
    }
}
