//! Configuration types and structures

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::comparison::ComparisonStrategy;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Relative paths to leave out of audit and sync (gitignore syntax)
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Extra patterns excluded from directory copies
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Where backups are written (default: `<global-root>/backups`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,

    /// Take a backup before overwriting (default: true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backups: Option<bool>,

    /// Content comparison used by audit and sync (default: hash)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonStrategy>,

    /// Sync `prompts/` without asking (default: false)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_prompts: Option<bool>,
}

impl Config {
    /// Whether backups are enabled
    #[must_use]
    pub fn backups_enabled(&self) -> bool {
        self.backups.unwrap_or(true)
    }

    /// Comparison strategy, defaulting to SHA-256 hashing
    #[must_use]
    pub fn comparison_strategy(&self) -> ComparisonStrategy {
        self.comparison.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.ignore.is_empty());
        assert!(config.exclude.is_empty());
        assert!(config.backups_enabled());
        assert_eq!(config.comparison_strategy(), ComparisonStrategy::Hash);
        assert_eq!(config.include_prompts, None);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: Result<Config, _> = toml::from_str("colour = true");
        assert!(result.is_err());
    }

    #[test]
    fn test_comparison_serde() {
        let config: Config = toml::from_str(r#"comparison = "hash""#).unwrap();
        assert_eq!(config.comparison, Some(ComparisonStrategy::Hash));
    }
}
