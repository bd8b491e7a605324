//! Directory comparison for whole-directory (skill) units
//!
//! Compares two directory trees file by file, honouring the copy
//! exclusions, to identify files that are added, modified, removed, or
//! unchanged between source and destination.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Context;
use walkdir::WalkDir;

use super::hash::FileHasher;
use crate::config::PatternMatcher;
use crate::error::Result;

/// Result of comparing two directories recursively
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryComparison {
    /// Files present in source but not in destination
    pub added: Vec<PathBuf>,
    /// Files with different content between source and destination
    pub modified: Vec<PathBuf>,
    /// Files present in destination but not in source
    pub removed: Vec<PathBuf>,
    /// Files with identical content in both locations
    pub unchanged: Vec<PathBuf>,
}

impl DirectoryComparison {
    /// Check if directories are identical (no changes)
    #[must_use]
    pub const fn is_identical(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }

    /// Count total number of changes
    #[must_use]
    pub const fn change_count(&self) -> usize {
        self.added.len() + self.modified.len() + self.removed.len()
    }
}

/// Directory comparator for recursive comparison
pub struct DirectoryComparator;

impl DirectoryComparator {
    /// Compare two directories recursively
    ///
    /// Returns paths relative to the source/destination roots.
    ///
    /// # Errors
    ///
    /// Returns an error if directory traversal or file operations fail.
    pub fn compare(
        source: &Path,
        destination: &Path,
        excludes: &PatternMatcher,
    ) -> Result<DirectoryComparison> {
        let source_files = Self::collect_files(source, excludes)?;
        let dest_files = if destination.exists() {
            Self::collect_files(destination, excludes)?
        } else {
            BTreeMap::new()
        };

        let mut comparison = DirectoryComparison::default();

        for (rel_path, source_file) in &source_files {
            match dest_files.get(rel_path) {
                Some(dest_file) => {
                    if FileHasher::hash(source_file)? == FileHasher::hash(dest_file)? {
                        comparison.unchanged.push(rel_path.clone());
                    } else {
                        comparison.modified.push(rel_path.clone());
                    }
                }
                None => comparison.added.push(rel_path.clone()),
            }
        }

        comparison.removed = dest_files
            .keys()
            .filter(|rel_path| !source_files.contains_key(*rel_path))
            .cloned()
            .collect();

        Ok(comparison)
    }

    /// Collect every non-excluded file below `dir`, keyed by relative path
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be traversed.
    pub fn collect_files(
        dir: &Path,
        excludes: &PatternMatcher,
    ) -> Result<BTreeMap<PathBuf, PathBuf>> {
        let mut files = BTreeMap::new();

        let walker = WalkDir::new(dir)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || entry.path().strip_prefix(dir).is_ok_and(|rel| {
                        excludes.should_include(rel, entry.file_type().is_dir())
                    })
            });

        for entry in walker {
            let entry =
                entry.with_context(|| format!("Failed to traverse directory: {}", dir.display()))?;
            if entry.file_type().is_file() {
                let rel_path = entry
                    .path()
                    .strip_prefix(dir)
                    .with_context(|| format!("Failed to strip prefix from {}", entry.path().display()))?
                    .to_path_buf();
                files.insert(rel_path, entry.into_path());
            }
        }

        Ok(files)
    }

    /// Most recent modification time of any file in the tree
    ///
    /// # Errors
    ///
    /// Returns an error if file metadata cannot be read.
    pub fn newest_modification(dir: &Path, excludes: &PatternMatcher) -> Result<Option<SystemTime>> {
        let mut newest = None;
        for path in Self::collect_files(dir, excludes)?.values() {
            let modified = fs::metadata(path)
                .and_then(|m| m.modified())
                .with_context(|| format!("Failed to get modification time for: {}", path.display()))?;
            newest = newest.max(Some(modified));
        }
        Ok(newest)
    }

    /// Combined size in bytes of all files in the tree
    ///
    /// # Errors
    ///
    /// Returns an error if file metadata cannot be read.
    pub fn total_size(dir: &Path, excludes: &PatternMatcher) -> Result<u64> {
        Self::collect_files(dir, excludes)?
            .values()
            .try_fold(0u64, |total, path| {
                let len = fs::metadata(path)
                    .with_context(|| format!("Failed to read metadata for: {}", path.display()))?
                    .len();
                Ok(total + len)
            })
    }
}
