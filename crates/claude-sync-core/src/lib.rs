//! # claude-sync-core
//!
//! Core library for auditing and synchronizing Claude configuration
//! directories.
//!
//! This library compares a project configuration root (`./.claude`) with the
//! global root (`~/.claude`), copies agents, commands, skills, prompts and
//! hooks between them with backup-before-overwrite semantics, resolves
//! conflicts, and diffs the two `settings.json` documents.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Core error types for the claude-sync library
pub mod error;

/// Configuration categories (agents, commands, skills, prompts, hooks)
pub mod category;

/// Category-aware directory scanning
pub mod scanner;

/// File comparison, hashing, timestamps and diffs
pub mod comparison;

/// Copy, backup and validation primitives
pub mod files;

/// Configuration file parsing and management
pub mod config;

/// Read-only comparison of the project and global roots
pub mod audit;

/// Conflict resolution (interactive, batch, and timestamp-based)
pub mod resolver;

/// Push/pull synchronization engine
pub mod sync;

/// Structural diff of settings.json documents
pub mod settings;

/// Console report rendering
pub mod report;

pub use audit::{AuditManager, AuditResult};
pub use category::Category;
pub use config::{Config, ConfigManager};
pub use error::{Result, SyncError};
pub use files::{FileHandler, FileHandlerConfig};
pub use report::Reporter;
pub use resolver::{ConflictAction, ConflictDetails, ConflictPrompter, ConflictResolver, Resolution};
pub use scanner::Scanner;
pub use settings::{SettingsAnalysis, SettingsAnalyzer};
pub use sync::{SyncDirection, SyncManager, SyncOptions, SyncResult};

use std::path::{Path, PathBuf};

/// The two configuration roots every operation works on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    /// Project configuration root (usually `./.claude`)
    pub project: PathBuf,
    /// Global configuration root (usually `~/.claude`)
    pub global: PathBuf,
}

impl Roots {
    /// Create a new pair of roots
    #[must_use]
    pub fn new(project: impl Into<PathBuf>, global: impl Into<PathBuf>) -> Self {
        Self {
            project: project.into(),
            global: global.into(),
        }
    }

    /// Ensure both roots exist as directories
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingRoot`] for the first root that is missing.
    pub fn ensure_exist(&self) -> std::result::Result<(), SyncError> {
        Self::ensure_dir("project", &self.project)?;
        Self::ensure_dir("global", &self.global)
    }

    fn ensure_dir(label: &'static str, path: &Path) -> std::result::Result<(), SyncError> {
        if path.is_dir() {
            Ok(())
        } else {
            Err(SyncError::MissingRoot {
                label,
                path: path.to_path_buf(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_roots_exist() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        let roots = Roots::new(project.path(), global.path());
        assert!(roots.ensure_exist().is_ok());
    }

    #[test]
    fn test_missing_global_root() {
        let project = TempDir::new().unwrap();
        let missing = project.path().join("nope");

        let roots = Roots::new(project.path(), &missing);
        match roots.ensure_exist() {
            Err(SyncError::MissingRoot { label, path }) => {
                assert_eq!(label, "global");
                assert_eq!(path, missing);
            }
            other => panic!("expected missing global root, got {other:?}"),
        }
    }
}
