//! Configuration file discovery from multiple locations

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Project config file name
pub const PROJECT_CONFIG: &str = ".claude-sync.toml";

/// Project-local (usually git-ignored) config file name
pub const LOCAL_CONFIG: &str = ".claude-sync.local.toml";

/// Configuration file locations in order of precedence
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigFiles {
    /// Config from CLI flag (highest precedence)
    pub cli: Option<PathBuf>,
    /// Project-local config (.claude-sync.local.toml)
    pub local: Option<PathBuf>,
    /// Project config (.claude-sync.toml)
    pub project: Option<PathBuf>,
    /// Global XDG config
    pub global: Option<PathBuf>,
}

impl ConfigFiles {
    /// Number of config files found
    #[must_use]
    pub fn count(&self) -> usize {
        [&self.cli, &self.local, &self.project, &self.global]
            .iter()
            .filter(|p| p.is_some())
            .count()
    }
}

/// Config file discovery
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Discover all available configuration files
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly requested config file does not exist.
    pub fn discover(cli_path: Option<&Path>, start_dir: &Path) -> Result<ConfigFiles> {
        let cli = match cli_path {
            Some(p) if p.is_file() => Some(p.to_path_buf()),
            Some(p) => anyhow::bail!("Config file not found: {}", p.display()),
            None => None,
        };

        Ok(ConfigFiles {
            cli,
            local: Self::find_file(start_dir, LOCAL_CONFIG),
            project: Self::find_file(start_dir, PROJECT_CONFIG),
            global: Self::find_global_config(),
        })
    }

    /// Find a config file in `start` or any of its parents
    fn find_file(start: &Path, name: &str) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Find global config in XDG config directory
    fn find_global_config() -> Option<PathBuf> {
        let global_config = dirs::config_dir()?.join("claude-sync").join("config.toml");
        global_config.is_file().then_some(global_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_cli_config() {
        let tmp = TempDir::new().unwrap();
        let cli_config = tmp.path().join("custom.toml");
        fs::write(&cli_config, "# config").unwrap();

        let files = ConfigDiscovery::discover(Some(&cli_config), tmp.path()).unwrap();

        assert_eq!(files.cli, Some(cli_config));
    }

    #[test]
    fn test_discover_cli_config_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let cli_config = tmp.path().join("nonexistent.toml");

        let result = ConfigDiscovery::discover(Some(&cli_config), tmp.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_discover_project_config_in_parent() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join(PROJECT_CONFIG), "").unwrap();
        fs::write(nested.join(LOCAL_CONFIG), "").unwrap();

        let files = ConfigDiscovery::discover(None, &nested).unwrap();

        assert_eq!(files.project, Some(tmp.path().join(PROJECT_CONFIG)));
        assert_eq!(files.local, Some(nested.join(LOCAL_CONFIG)));
        assert!(files.cli.is_none());
    }
}
