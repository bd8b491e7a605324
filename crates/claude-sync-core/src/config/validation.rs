//! Configuration validation and error reporting

use super::patterns::PatternMatcher;
use super::types::Config;
use crate::error::Result;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is empty or does not compile, or if the
    /// backup directory is set to an empty path.
    pub fn validate(config: &Config) -> Result<()> {
        for pattern in &config.ignore {
            if pattern.trim().is_empty() {
                anyhow::bail!("Ignore pattern cannot be empty");
            }
        }

        for pattern in &config.exclude {
            if pattern.trim().is_empty() {
                anyhow::bail!("Exclude pattern cannot be empty");
            }
        }

        // Surface glob syntax errors at load time instead of mid-sync
        PatternMatcher::with_patterns(&config.ignore)?;
        PatternMatcher::for_exclusions(&config.exclude)?;

        if config
            .backup_dir
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            anyhow::bail!("backup_dir cannot be empty");
        }

        Ok(())
    }
}
