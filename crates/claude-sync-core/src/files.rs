//! Copy, backup and validation primitives
//!
//! Every copy that would overwrite an existing destination first backs it
//! up into a fresh timestamped directory, then verifies the copy by
//! comparing SHA-256 digests. A digest mismatch is reported as a failure;
//! the copy is not rolled back.

mod backup;
mod oplog;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

pub use backup::TIMESTAMP_FORMAT;
pub use oplog::{OperationKind, OperationRecord, OperationStatus};

use crate::comparison::{DirectoryComparator, FileHash, FileHasher};
use crate::config::PatternMatcher;
use crate::error::Result;

/// Settings for a [`FileHandler`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandlerConfig {
    /// Directory receiving timestamped backups
    pub backup_root: PathBuf,
    /// Back up destinations before overwriting them
    pub backups_enabled: bool,
    /// Extra directory-copy exclusions on top of the built-in denylist
    pub exclude: Vec<String>,
}

impl FileHandlerConfig {
    /// Backups enabled under `backup_root`, no extra exclusions
    #[must_use]
    pub fn new(backup_root: impl Into<PathBuf>) -> Self {
        Self {
            backup_root: backup_root.into(),
            backups_enabled: true,
            exclude: Vec::new(),
        }
    }
}

/// File operations with backups, validation, and an operations log
#[derive(Debug)]
pub struct FileHandler {
    config: FileHandlerConfig,
    excludes: PatternMatcher,
    operations: Vec<OperationRecord>,
}

impl FileHandler {
    /// Create a handler
    ///
    /// # Errors
    ///
    /// Returns an error if an exclusion pattern is invalid.
    pub fn new(config: FileHandlerConfig) -> Result<Self> {
        let excludes = PatternMatcher::for_exclusions(&config.exclude)?;
        Ok(Self {
            config,
            excludes,
            operations: Vec::new(),
        })
    }

    /// Handler settings
    #[must_use]
    pub const fn config(&self) -> &FileHandlerConfig {
        &self.config
    }

    /// Matcher for entries left out of directory copies
    #[must_use]
    pub const fn excludes(&self) -> &PatternMatcher {
        &self.excludes
    }

    /// Operations performed so far, oldest first
    #[must_use]
    pub fn operations(&self) -> &[OperationRecord] {
        &self.operations
    }

    /// Copy a single file, backing up an existing destination first
    ///
    /// # Errors
    ///
    /// Returns an error if the backup, the copy, or its validation fails.
    pub fn copy_file(&mut self, source: &Path, dest: &Path) -> Result<()> {
        let outcome = self.copy_file_inner(source, dest);
        self.record(OperationKind::CopyFile, source, dest, &outcome);
        outcome
    }

    fn copy_file_inner(&mut self, source: &Path, dest: &Path) -> Result<()> {
        if dest.exists() && self.config.backups_enabled {
            self.create_backup(dest)?;
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::copy(source, dest).with_context(|| {
            format!("Failed to copy {} to {}", source.display(), dest.display())
        })?;

        if !self.validate_copy(source, dest)? {
            anyhow::bail!(
                "Copy validation failed: {} does not match {}",
                dest.display(),
                source.display()
            );
        }

        tracing::debug!(source = %source.display(), dest = %dest.display(), "copied file");
        Ok(())
    }

    /// Copy a directory tree, replacing an existing destination
    ///
    /// The destination is backed up (when enabled) and removed before the
    /// copy, so files absent from the source do not survive. Excluded
    /// entries are never copied.
    ///
    /// # Errors
    ///
    /// Returns an error if the backup, removal, copy, or validation fails.
    pub fn copy_directory(&mut self, source: &Path, dest: &Path) -> Result<()> {
        let outcome = self.copy_directory_inner(source, dest);
        self.record(OperationKind::CopyDirectory, source, dest, &outcome);
        outcome
    }

    fn copy_directory_inner(&mut self, source: &Path, dest: &Path) -> Result<()> {
        if dest.exists() {
            if self.config.backups_enabled {
                self.create_backup(dest)?;
            }
            if dest.is_dir() {
                fs::remove_dir_all(dest)
                    .with_context(|| format!("Failed to remove directory: {}", dest.display()))?;
            } else {
                fs::remove_file(dest)
                    .with_context(|| format!("Failed to remove file: {}", dest.display()))?;
            }
        }

        copy_tree(source, dest, &self.excludes)?;

        if !self.validate_copy(source, dest)? {
            anyhow::bail!(
                "Copy validation failed: {} does not match {}",
                dest.display(),
                source.display()
            );
        }

        tracing::debug!(source = %source.display(), dest = %dest.display(), "copied directory");
        Ok(())
    }

    /// Back up a file or directory into a fresh timestamped directory
    ///
    /// Returns the path of the copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist or cannot be copied.
    pub fn create_backup(&mut self, path: &Path) -> Result<PathBuf> {
        let outcome = self.create_backup_inner(path);
        let dest = outcome.as_ref().map_or_else(|_| self.config.backup_root.clone(), Clone::clone);
        self.record(OperationKind::Backup, path, dest, &outcome);
        outcome
    }

    fn create_backup_inner(&self, path: &Path) -> Result<PathBuf> {
        let name = path
            .file_name()
            .with_context(|| format!("Cannot back up path without a name: {}", path.display()))?;
        let backup_dir = backup::allocate_dir(&self.config.backup_root, Local::now())?;
        let target = backup_dir.join(name);

        if path.is_dir() {
            copy_tree(path, &target, &PatternMatcher::new())?;
        } else {
            fs::copy(path, &target).with_context(|| {
                format!("Failed to back up {} to {}", path.display(), target.display())
            })?;
        }

        tracing::debug!(path = %path.display(), backup = %target.display(), "created backup");
        Ok(target)
    }

    /// Whether a copy matches its source by SHA-256
    ///
    /// Directories compare their tree digests.
    ///
    /// # Errors
    ///
    /// Returns an error if either side cannot be read.
    pub fn validate_copy(&self, source: &Path, dest: &Path) -> Result<bool> {
        if source.is_dir() {
            Ok(self.hash_directory(source)? == self.hash_directory(dest)?)
        } else {
            Ok(self.hash(source)? == self.hash(dest)?)
        }
    }

    /// SHA-256 digest of a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn hash(&self, path: &Path) -> Result<FileHash> {
        FileHasher::hash(path)
    }

    /// Digest of a directory tree over its non-excluded files
    ///
    /// Covers relative paths and contents, so a rename changes the digest.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be traversed or a file read.
    pub fn hash_directory(&self, dir: &Path) -> Result<FileHash> {
        let mut hasher = Sha256::new();

        for (rel_path, path) in DirectoryComparator::collect_files(dir, &self.excludes)? {
            hasher.update(rel_path.to_string_lossy().as_bytes());
            hasher.update([0u8]);
            hasher.update(FileHasher::hash(&path)?);
        }

        Ok(hasher.finalize().into())
    }

    fn record<T>(
        &mut self,
        kind: OperationKind,
        source: &Path,
        dest: impl Into<PathBuf>,
        outcome: &Result<T>,
    ) {
        let status = match outcome {
            Ok(_) => OperationStatus::Success,
            Err(e) => OperationStatus::Failed(format!("{e:#}")),
        };
        self.operations
            .push(OperationRecord::now(kind, source, dest, status));
    }
}

/// Copy every non-excluded regular file below `source` into `dest`
fn copy_tree(source: &Path, dest: &Path, excludes: &PatternMatcher) -> Result<()> {
    fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create directory: {}", dest.display()))?;

    let walker = WalkDir::new(source)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || entry.path().strip_prefix(source).is_ok_and(|rel| {
                    excludes.should_include(rel, entry.file_type().is_dir())
                })
        });

    for entry in walker {
        let entry =
            entry.with_context(|| format!("Failed to traverse directory: {}", source.display()))?;
        if entry.depth() == 0 {
            continue;
        }

        let rel_path = entry
            .path()
            .strip_prefix(source)
            .with_context(|| format!("Failed to strip prefix from {}", entry.path().display()))?;
        let target = dest.join(rel_path);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create directory: {}", target.display()))?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target).with_context(|| {
                format!("Failed to copy {} to {}", entry.path().display(), target.display())
            })?;
        } else {
            tracing::debug!(path = %entry.path().display(), "skipping non-regular file");
        }
    }

    Ok(())
}
