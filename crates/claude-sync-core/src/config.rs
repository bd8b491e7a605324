//! Configuration file parsing, merging, and pattern matching
//!
//! This module handles:
//! - Config file discovery from multiple locations
//! - TOML parsing with serde
//! - Config merging with precedence rules
//! - Gitignore-style pattern matching for ignored and excluded paths
//! - Validation and error reporting

mod discovery;
mod merge;
mod patterns;
mod types;
mod validation;

use std::path::Path;

pub use discovery::{ConfigDiscovery, ConfigFiles};
pub use merge::ConfigMerger;
pub use patterns::{DEFAULT_EXCLUDES, PatternMatcher};
pub use types::Config;
pub use validation::ConfigValidator;

use crate::error::Result;

/// Configuration manager that coordinates discovery, parsing, merging, and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load and merge configuration from all sources
    ///
    /// `start_dir` is where the upward search for project config files begins.
    ///
    /// # Errors
    ///
    /// Returns an error if config files are invalid or cannot be read.
    pub fn load(cli_config_path: Option<&Path>, start_dir: &Path) -> Result<Config> {
        let config_files = ConfigDiscovery::discover(cli_config_path, start_dir)?;
        let merged = ConfigMerger::merge(&config_files)?;
        ConfigValidator::validate(&merged)?;

        tracing::debug!(sources = config_files.count(), "configuration loaded");
        Ok(merged)
    }
}
