//! Common types and utilities for command execution

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use claude_sync_core::config::PatternMatcher;
use claude_sync_core::{Config, ConfigManager, FileHandler, FileHandlerConfig, Roots, Scanner};
use console::Term;

use crate::cli::Cli;

/// Name of the configuration root on both sides
const CLAUDE_DIR: &str = ".claude";

/// Backup directory created under the global root by default
const DEFAULT_BACKUP_DIR: &str = "backups";

/// Resolved roots and merged configuration for one invocation
#[derive(Debug)]
pub struct Workspace {
    /// Project and global roots
    pub roots: Roots,
    /// Merged configuration (empty with `--no-config`)
    pub config: Config,
    /// Backup root after CLI and config overrides
    pub backup_root: PathBuf,
    /// Whether backups are taken before overwriting
    pub backups_enabled: bool,
}

impl Workspace {
    /// Resolve roots and load configuration from the command line
    ///
    /// # Errors
    ///
    /// Returns an error if the current or home directory cannot be
    /// determined, or a config file is invalid.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let project = match &cli.project_dir {
            Some(path) => resolve_root(path),
            None => resolve_root(&cwd.join(CLAUDE_DIR)),
        };
        let global = match &cli.global_dir {
            Some(path) => resolve_root(path),
            None => {
                let home = dirs::home_dir().context("Failed to determine home directory")?;
                resolve_root(&home.join(CLAUDE_DIR))
            }
        };

        let config = if cli.no_config {
            Config::default()
        } else {
            ConfigManager::load(cli.config.as_deref(), &cwd).context("Failed to load configuration")?
        };

        let backup_root = cli
            .backup_dir
            .clone()
            .or_else(|| config.backup_dir.clone())
            .unwrap_or_else(|| global.join(DEFAULT_BACKUP_DIR));
        let backups_enabled = !cli.no_backup && config.backups_enabled();

        tracing::debug!(
            project = %project.display(),
            global = %global.display(),
            backups = %backup_root.display(),
            backups_enabled,
            "workspace resolved"
        );

        Ok(Self {
            roots: Roots::new(project, global),
            config,
            backup_root,
            backups_enabled,
        })
    }

    /// Scanner honoring the configured `ignore` and `exclude` patterns
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is invalid.
    pub fn scanner(&self) -> Result<Scanner> {
        let ignore = PatternMatcher::with_patterns(&self.config.ignore)
            .context("Invalid ignore pattern in configuration")?;
        let excludes = PatternMatcher::for_exclusions(&self.config.exclude)
            .context("Invalid exclude pattern in configuration")?;
        Ok(Scanner::new(ignore, excludes))
    }

    /// File handler writing backups under the resolved backup root
    ///
    /// # Errors
    ///
    /// Returns an error if an exclusion pattern is invalid.
    pub fn file_handler(&self) -> Result<FileHandler> {
        let mut config = FileHandlerConfig::new(&self.backup_root);
        config.backups_enabled = self.backups_enabled;
        config.exclude.clone_from(&self.config.exclude);
        FileHandler::new(config)
    }
}

/// Canonicalize a root when it exists; missing roots are reported later
fn resolve_root(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Whether prompts may be shown for this invocation
pub fn is_interactive(cli: &Cli) -> bool {
    !(cli.dry_run || cli.force || cli.non_interactive)
        && Term::stdout().is_term()
        && Term::stderr().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_overrides_and_no_config() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        let backups = TempDir::new().unwrap();

        let cli = Cli::parse_from([
            "claude-sync",
            "--project-dir",
            project.path().to_str().unwrap(),
            "--global-dir",
            global.path().to_str().unwrap(),
            "--backup-dir",
            backups.path().to_str().unwrap(),
            "--no-backup",
            "--no-config",
        ]);

        let workspace = Workspace::load(&cli).unwrap();

        assert_eq!(workspace.roots.project, dunce::canonicalize(project.path()).unwrap());
        assert_eq!(workspace.roots.global, dunce::canonicalize(global.path()).unwrap());
        assert_eq!(workspace.backup_root, backups.path());
        assert!(!workspace.backups_enabled);
        assert_eq!(workspace.config, Config::default());
    }

    #[test]
    fn test_default_backup_root_under_global() {
        let global = TempDir::new().unwrap();
        let missing = global.path().join("missing-project");

        let cli = Cli::parse_from([
            "claude-sync",
            "--project-dir",
            missing.to_str().unwrap(),
            "--global-dir",
            global.path().to_str().unwrap(),
            "--no-config",
        ]);

        let workspace = Workspace::load(&cli).unwrap();

        assert_eq!(workspace.roots.project, missing);
        assert_eq!(
            workspace.backup_root,
            dunce::canonicalize(global.path()).unwrap().join("backups")
        );
        assert!(workspace.backups_enabled);
    }

    #[test]
    fn test_config_file_applies() {
        let tmp = TempDir::new().unwrap();
        let config_file = tmp.path().join("claude-sync.toml");
        std::fs::write(&config_file, "backups = false\nexclude = [\"*.bak\"]\n").unwrap();

        let cli = Cli::parse_from([
            "claude-sync",
            "--project-dir",
            tmp.path().to_str().unwrap(),
            "--global-dir",
            tmp.path().to_str().unwrap(),
            "--config",
            config_file.to_str().unwrap(),
        ]);

        let workspace = Workspace::load(&cli).unwrap();
        assert!(!workspace.backups_enabled);
        assert!(workspace.config.exclude.contains(&"*.bak".to_string()));
        assert!(workspace.file_handler().is_ok());
        assert!(workspace.scanner().is_ok());
    }
}
