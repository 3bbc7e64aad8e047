//! Success summary display for completed runs.

use crate::output::writer::OutputResult;
use anyhow::Result;
use console::{Term, style};
use std::io::Write;
use std::time::Duration;

/// Per-run statistics gathered along the pipeline.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub lines_read: usize,
    pub lintable_rules: usize,
    pub refined_rules: usize,
    pub untranslatable_rules: usize,
    pub patterns_emitted: usize,
    pub overall_severity: &'static str,
    pub tokens_used: usize,
}

/// Display a success summary after generation completes.
///
/// Shows the output file with its size, pipeline statistics, and the
/// elapsed time. Suppressed entirely in quiet mode.
pub fn display_success_summary(
    output: &OutputResult,
    stats: &RunStats,
    elapsed: Duration,
    quiet: bool,
) -> Result<()> {
    if quiet {
        return Ok(());
    }

    let mut term = Term::stdout();

    writeln!(term)?;
    writeln!(
        term,
        "{} {}",
        style("\u{2713}").green().bold(),
        style("Lint config generated successfully").bold()
    )?;

    writeln!(term)?;
    writeln!(term, "{}:", style("Output").bold())?;
    let size = std::fs::metadata(&output.path).map(|m| m.len()).unwrap_or(0);
    writeln!(
        term,
        "{} {} ({})",
        style("\u{2514}\u{2500}").dim(),
        output.path.display(),
        format_size(size)
    )?;
    if let Some(backup) = &output.backup_path {
        writeln!(
            term,
            "   {} previous config backed up to {}",
            style("\u{21b3}").dim(),
            backup.display()
        )?;
    }

    writeln!(term)?;
    writeln!(term, "{}:", style("Statistics").bold())?;
    let rows = [
        ("Lines read", stats.lines_read.to_string()),
        ("Lintable rules", stats.lintable_rules.to_string()),
        ("Refined rules", stats.refined_rules.to_string()),
        ("Untranslatable", stats.untranslatable_rules.to_string()),
        ("Patterns emitted", stats.patterns_emitted.to_string()),
        ("Severity", stats.overall_severity.to_string()),
        ("Tokens used", format_number(stats.tokens_used)),
    ];
    for (i, (label, value)) in rows.iter().enumerate() {
        let prefix = if i == rows.len() - 1 {
            "\u{2514}\u{2500}"
        } else {
            "\u{251c}\u{2500}"
        };
        writeln!(term, "{} {}: {}", style(prefix).dim(), label, value)?;
    }

    writeln!(term)?;
    writeln!(
        term,
        "Completed in {}",
        style(format!("{:.2}s", elapsed.as_secs_f64())).bold()
    )?;

    Ok(())
}

/// Format a number with thousands separators.
fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_quiet_mode_suppresses_output() {
        let output = OutputResult {
            path: std::path::PathBuf::from("/nonexistent"),
            backup_path: None,
            is_new: true,
        };
        let stats = RunStats::default();
        assert!(display_success_summary(&output, &stats, Duration::from_secs(1), true).is_ok());
    }
}
