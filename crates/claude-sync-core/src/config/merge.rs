//! Configuration merging with precedence rules
//!
//! # Merging Semantics
//!
//! - **Arrays** (`ignore`, `exclude`): additive, values from all configs are combined
//! - **Options** (`backup_dir`, `backups`, `comparison`, `include_prompts`):
//!   a value set in a higher-precedence file replaces the lower one, unset
//!   values leave it alone

use std::fs;
use std::path::Path;

use anyhow::Context;

use super::discovery::ConfigFiles;
use super::types::Config;
use crate::error::Result;

/// Configuration merger
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple config files with precedence rules
    ///
    /// Precedence order (highest to lowest):
    /// 1. CLI config
    /// 2. .claude-sync.local.toml
    /// 3. .claude-sync.toml
    /// 4. Global config
    ///
    /// # Errors
    ///
    /// Returns an error if config files cannot be read or parsed.
    pub fn merge(files: &ConfigFiles) -> Result<Config> {
        let mut merged = Config::default();

        // Lowest precedence first
        for path in [&files.global, &files.project, &files.local, &files.cli]
            .into_iter()
            .flatten()
        {
            Self::merge_into(&mut merged, path)?;
        }

        Ok(merged)
    }

    /// Load and merge a single config file into the existing config
    fn merge_into(base: &mut Config, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        base.ignore.extend(config.ignore);
        base.exclude.extend(config.exclude);

        if config.backup_dir.is_some() {
            base.backup_dir = config.backup_dir;
        }
        if config.backups.is_some() {
            base.backups = config.backups;
        }
        if config.comparison.is_some() {
            base.comparison = config.comparison;
        }
        if config.include_prompts.is_some() {
            base.include_prompts = config.include_prompts;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_merge_empty_config() {
        let config = ConfigMerger::merge(&ConfigFiles::default()).unwrap();

        assert!(config.ignore.is_empty());
        assert!(config.exclude.is_empty());
        assert!(config.backup_dir.is_none());
    }

    #[test]
    fn test_merge_precedence() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join("project.toml");
        let cli = tmp.path().join("cli.toml");

        fs::write(
            &global,
            r#"
ignore = ["*.tmp"]
backup_dir = "/global/backups"
backups = false
"#,
        )
        .unwrap();
        fs::write(
            &project,
            r#"
ignore = ["agents/draft-*"]
backup_dir = "/project/backups"
"#,
        )
        .unwrap();
        fs::write(&cli, "backups = true\n").unwrap();

        let files = ConfigFiles {
            cli: Some(cli),
            local: None,
            project: Some(project),
            global: Some(global),
        };

        let config = ConfigMerger::merge(&files).unwrap();

        // Arrays accumulate across files
        assert_eq!(config.ignore.len(), 2);
        // Later files override earlier ones
        assert_eq!(config.backup_dir, Some(PathBuf::from("/project/backups")));
        assert_eq!(config.backups, Some(true));
    }

    #[test]
    fn test_merge_unset_values_do_not_override() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let local = tmp.path().join("local.toml");

        fs::write(&global, "include_prompts = true\n").unwrap();
        fs::write(&local, "exclude = [\"*.log\"]\n").unwrap();

        let files = ConfigFiles {
            local: Some(local),
            global: Some(global),
            ..ConfigFiles::default()
        };

        let config = ConfigMerger::merge(&files).unwrap();
        assert_eq!(config.include_prompts, Some(true));
        assert_eq!(config.exclude, vec!["*.log".to_string()]);
    }
}
