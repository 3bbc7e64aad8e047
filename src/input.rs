//! Rules-file reading.
//!
//! Lines are kept verbatim, blanks and comments included; deciding
//! which lines are rules is the filter stage's job, not the reader's.

use crate::utils::error::LintyError;
use std::path::Path;

/// Read the rules file into one string per line.
///
/// A missing file or a file with only whitespace is a fatal setup
/// failure; nothing downstream can do useful work without input.
pub fn read_rules_file(path: &Path) -> Result<Vec<String>, LintyError> {
    if !path.exists() {
        return Err(LintyError::missing_rules_file(path));
    }

    let content = std::fs::read_to_string(path)?;
    let lines: Vec<String> = content
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect();

    if lines.iter().all(|line| line.trim().is_empty()) {
        return Err(LintyError::empty_rules_file(path));
    }

    Ok(lines)
}
