//! Output file writing: overwrite protection, backups, directory
//! creation.

use crate::utils::error::LintyError;
use console::Term;
use dialoguer::Confirm;
use std::path::{Path, PathBuf};

/// Options for controlling output file writing.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Where the generated file goes.
    pub path: PathBuf,
    /// Whether to create a backup of an existing file before overwrite.
    pub create_backups: bool,
    /// Overwrite existing files without asking.
    pub force: bool,
    /// Never prompt interactively (CI mode); implies overwrite refusal
    /// unless `force` is set.
    pub no_confirm: bool,
}

impl WriteOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            create_backups: true,
            force: false,
            no_confirm: false,
        }
    }

    #[must_use]
    pub fn with_backups(mut self, create_backups: bool) -> Self {
        self.create_backups = create_backups;
        self
    }

    #[must_use]
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    #[must_use]
    pub fn with_no_confirm(mut self, no_confirm: bool) -> Self {
        self.no_confirm = no_confirm;
        self
    }
}

/// Result of writing the output file.
#[derive(Debug, Clone)]
pub struct OutputResult {
    pub path: PathBuf,
    pub backup_path: Option<PathBuf>,
    /// Whether the file was newly created (vs overwritten).
    pub is_new: bool,
}

/// Write the generated content to disk.
///
/// An existing file is only overwritten with `--force` or an
/// interactive confirmation; with backups enabled, the previous content
/// is preserved next to the file first.
pub fn write_output(content: &str, options: &WriteOptions) -> Result<OutputResult, LintyError> {
    let is_new = !options.path.exists();
    let mut backup_path = None;

    if !is_new {
        if !options.force && !confirm_overwrite(&options.path, options.no_confirm) {
            return Err(LintyError::Output(format!(
                "Output file already exists: {}. Use --force to overwrite.",
                options.path.display()
            )));
        }
        if options.create_backups {
            backup_path = Some(create_backup(&options.path)?);
        }
    }

    if let Some(parent) = options.path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| {
                LintyError::Output(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    std::fs::write(&options.path, content).map_err(|e| {
        LintyError::Output(format!("Failed to write {}: {}", options.path.display(), e))
    })?;

    tracing::info!("Wrote output to {}", options.path.display());

    Ok(OutputResult {
        path: options.path.clone(),
        backup_path,
        is_new,
    })
}

/// Ask the user whether an existing file may be overwritten. Returns
/// false in non-interactive contexts, where only `--force` may decide.
fn confirm_overwrite(path: &Path, no_confirm: bool) -> bool {
    if no_confirm || !Term::stdout().is_term() {
        return false;
    }

    Confirm::new()
        .with_prompt(format!("Overwrite existing {}?", path.display()))
        .default(false)
        .interact()
        .unwrap_or(false)
}

/// Create a backup of an existing file, returning its path.
fn create_backup(path: &Path) -> Result<PathBuf, LintyError> {
    let backup_path = generate_backup_path(path);

    std::fs::copy(path, &backup_path).map_err(|e| {
        LintyError::Output(format!(
            "Failed to create backup of {}: {}",
            path.display(),
            e
        ))
    })?;

    tracing::debug!(
        "Created backup: {} -> {}",
        path.display(),
        backup_path.display()
    );

    Ok(backup_path)
}

/// `file.ext` -> `file.ext.bak`
fn generate_backup_path(path: &Path) -> PathBuf {
    let backup_name = format!(
        "{}.bak",
        path.file_name()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default()
    );

    path.with_file_name(backup_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_backup_path() {
        let path = Path::new("/project/eslint.config.mjs");
        assert_eq!(
            generate_backup_path(path),
            PathBuf::from("/project/eslint.config.mjs.bak")
        );
    }

    #[test]
    fn test_write_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("eslint.config.mjs");

        let result = write_output("export default [];\n", &WriteOptions::new(&path)).unwrap();

        assert!(result.is_new);
        assert!(result.backup_path.is_none());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "export default [];\n"
        );
    }

    #[test]
    fn test_existing_file_requires_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("eslint.config.mjs");
        fs::write(&path, "old").unwrap();

        let options = WriteOptions::new(&path).with_no_confirm(true);
        let err = write_output("new", &options).unwrap_err();

        assert!(err.to_string().contains("--force"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
    }

    #[test]
    fn test_force_overwrites_and_backs_up() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("eslint.config.mjs");
        fs::write(&path, "old content").unwrap();

        let options = WriteOptions::new(&path).with_force(true);
        let result = write_output("new content", &options).unwrap();

        assert!(!result.is_new);
        let backup = result.backup_path.unwrap();
        assert_eq!(fs::read_to_string(&backup).unwrap(), "old content");
        assert_eq!(fs::read_to_string(&path).unwrap(), "new content");
    }

    #[test]
    fn test_backups_can_be_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("eslint.config.mjs");
        fs::write(&path, "old").unwrap();

        let options = WriteOptions::new(&path).with_force(true).with_backups(false);
        let result = write_output("new", &options).unwrap();

        assert!(result.backup_path.is_none());
        assert!(!path.with_file_name("eslint.config.mjs.bak").exists());
    }

    #[test]
    fn test_parent_directories_are_created() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/dir/eslint.config.mjs");

        let result = write_output("content", &WriteOptions::new(&path)).unwrap();

        assert!(result.path.exists());
    }
}
