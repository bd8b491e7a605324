//! Sync orchestration - coordinates the sync workflow

use std::path::Path;

use super::actions::SyncActionResolver;
use super::executor::SyncExecutor;
use super::{SyncDirection, SyncOptions, SyncResult};
use crate::Roots;
use crate::category::{Category, CategoryKind};
use crate::comparison::{ComparisonResult, ComparisonStrategy, ContentComparator, DirectoryComparator};
use crate::config::PatternMatcher;
use crate::error::Result;
use crate::files::FileHandler;
use crate::resolver::{ConflictPrompter, ConflictResolver, Resolution};
use crate::scanner::Scanner;

/// Push/pull engine between the project and global roots
pub struct SyncManager {
    roots: Roots,
    scanner: Scanner,
    comparator: ContentComparator,
    files: FileHandler,
    options: SyncOptions,
}

impl SyncManager {
    /// Create a sync manager comparing file contents by SHA-256
    #[must_use]
    pub fn new(roots: Roots, scanner: Scanner, files: FileHandler, options: SyncOptions) -> Self {
        Self {
            roots,
            scanner,
            comparator: ContentComparator::default(),
            files,
            options,
        }
    }

    /// Use a different content comparison strategy
    #[must_use]
    pub const fn with_strategy(mut self, strategy: ComparisonStrategy) -> Self {
        self.comparator = ContentComparator::new(strategy);
        self
    }

    /// Run flags
    #[must_use]
    pub const fn options(&self) -> SyncOptions {
        self.options
    }

    /// File handler, including its operations log
    #[must_use]
    pub const fn files(&self) -> &FileHandler {
        &self.files
    }

    /// Sync the given categories (default: every category except prompts)
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingRoot`](crate::SyncError::MissingRoot) if
    /// either root does not exist. Per-file and per-category failures are
    /// recorded in the result.
    pub fn sync(&mut self, direction: SyncDirection, categories: Option<&[Category]>) -> Result<SyncResult> {
        self.roots.ensure_exist()?;

        let categories = categories.unwrap_or(&Category::SYNC_DEFAULT[..]);
        let mut result = SyncResult::new(direction, self.options.dry_run);

        tracing::debug!(
            %direction,
            dry_run = self.options.dry_run,
            force = self.options.force,
            ?categories,
            "starting sync"
        );

        for &category in categories {
            self.sync_category(direction, category, &mut result);
        }

        let summary = result.summary();
        tracing::debug!(
            copied = summary.copied,
            skipped = summary.skipped,
            conflicts = summary.conflicts,
            resolved = summary.resolved,
            errors = summary.errors,
            "sync complete"
        );
        Ok(result)
    }

    fn sync_category(&mut self, direction: SyncDirection, category: Category, result: &mut SyncResult) {
        let source_root = direction.source_root(&self.roots).to_path_buf();
        let dest_root = direction.dest_root(&self.roots).to_path_buf();
        let is_dir = category.kind() == CategoryKind::WholeDirectory;

        let units = match self.scanner.scan_units(&source_root, category) {
            Ok(units) => units,
            Err(e) => {
                tracing::warn!(%category, "scan failed: {e:#}");
                result.errors.push(format!("{category}: {e:#}"));
                return;
            }
        };

        let excludes = self.files.excludes().clone();
        let mut executor = SyncExecutor::new(&mut self.files, self.options, direction);

        for unit in units {
            let dest = dest_root.join(&unit.relative);
            let comparison = if is_dir {
                compare_directories(&unit.path, &dest, &excludes)
            } else {
                self.comparator.compare(&unit.path, &dest)
            };

            match comparison {
                Ok(comparison) => {
                    let action = SyncActionResolver::resolve(unit, dest, is_dir, comparison);
                    executor.execute(action, result);
                }
                Err(e) => {
                    tracing::warn!(path = %unit.relative, "comparison failed: {e:#}");
                    result.record_error(&unit.relative, &e);
                }
            }
        }
    }

    /// Apply resolver decisions to every conflict surfaced by [`Self::sync`]
    ///
    /// Each decided path moves from `files_skipped` into
    /// `conflicts_resolved`. Copies already made stay on disk when the
    /// operator cancels.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Cancelled`](crate::SyncError::Cancelled) when the
    /// operator cancels a prompt.
    pub fn resolve_conflicts<P: ConflictPrompter>(
        &mut self,
        resolver: &mut ConflictResolver<P>,
        result: &mut SyncResult,
    ) -> Result<()> {
        let pending = std::mem::take(&mut result.conflicts);

        for (idx, rel_path) in pending.iter().enumerate() {
            let project_path = self.roots.project.join(rel_path);
            let global_path = self.roots.global.join(rel_path);

            let resolution = match resolver.resolve(rel_path, &project_path, &global_path) {
                Ok(resolution) => resolution,
                Err(e) => {
                    result.conflicts.extend(pending[idx..].iter().cloned());
                    return Err(e);
                }
            };

            match self.apply_resolution(resolution, &project_path, &global_path) {
                Ok(()) => {
                    result.files_skipped.retain(|p| p != rel_path);
                    result.conflicts_resolved.insert(rel_path.clone(), resolution);
                }
                Err(e) => {
                    result.record_error(rel_path, &e);
                    result.conflicts.push(rel_path.clone());
                }
            }
        }

        Ok(())
    }

    fn apply_resolution(&mut self, resolution: Resolution, project_path: &Path, global_path: &Path) -> Result<()> {
        let (source, dest) = match resolution {
            Resolution::KeepProject => (project_path, global_path),
            Resolution::KeepGlobal => (global_path, project_path),
            Resolution::Skip => return Ok(()),
        };

        if self.options.dry_run {
            tracing::info!("[dry-run] would copy {} to {}", source.display(), dest.display());
            return Ok(());
        }

        if source.is_dir() {
            self.files.copy_directory(source, dest)
        } else {
            self.files.copy_file(source, dest)
        }
    }
}

/// Classify a skill directory against its destination by tree content
fn compare_directories(
    source: &Path,
    dest: &Path,
    excludes: &PatternMatcher,
) -> Result<ComparisonResult> {
    if !dest.exists() {
        return Ok(ComparisonResult::SourceOnly);
    }
    if !dest.is_dir() {
        return Ok(ComparisonResult::Different);
    }

    let comparison = DirectoryComparator::compare(source, dest, excludes)?;
    Ok(if comparison.is_identical() {
        ComparisonResult::Identical
    } else {
        ComparisonResult::Different
    })
}
