//! Applies sync actions through the file handler

use std::path::Path;

use super::actions::SyncAction;
use super::{SyncDirection, SyncOptions, SyncResult};
use crate::files::FileHandler;

/// Executes sync actions, honouring dry-run and force
pub struct SyncExecutor<'a> {
    files: &'a mut FileHandler,
    options: SyncOptions,
    direction: SyncDirection,
}

impl<'a> SyncExecutor<'a> {
    /// Create an executor for one sync run
    pub const fn new(files: &'a mut FileHandler, options: SyncOptions, direction: SyncDirection) -> Self {
        Self {
            files,
            options,
            direction,
        }
    }

    /// Execute a sync action, recording its outcome
    ///
    /// Copy failures are recorded in `result.errors`; they never abort the run.
    pub fn execute(&mut self, action: SyncAction, result: &mut SyncResult) {
        match action {
            SyncAction::Copy {
                rel_path,
                source,
                dest,
                is_dir,
            } => {
                if self.options.dry_run {
                    tracing::info!(path = %rel_path, "[dry-run] would copy to {}", dest.display());
                    result.files_copied.push(rel_path);
                } else {
                    match self.copy(&source, &dest, is_dir) {
                        Ok(()) => result.files_copied.push(rel_path),
                        Err(e) => result.record_error(&rel_path, &e),
                    }
                }
            }
            SyncAction::Skip { rel_path, reason } => {
                tracing::debug!(path = %rel_path, reason, "skipping");
                result.files_skipped.push(rel_path);
            }
            SyncAction::Conflict {
                rel_path,
                source,
                dest,
                is_dir,
            } => {
                if !self.options.force {
                    tracing::debug!(path = %rel_path, "conflict left for resolution");
                    result.files_skipped.push(rel_path.clone());
                    result.conflicts.push(rel_path);
                    return;
                }

                let resolution = self.direction.winning_side();
                if self.options.dry_run {
                    tracing::info!(path = %rel_path, "[dry-run] would overwrite {}", dest.display());
                    result.conflicts_resolved.insert(rel_path, resolution);
                } else {
                    match self.copy(&source, &dest, is_dir) {
                        Ok(()) => {
                            tracing::debug!(path = %rel_path, %resolution, "conflict overwritten");
                            result.conflicts_resolved.insert(rel_path, resolution);
                        }
                        Err(e) => result.record_error(&rel_path, &e),
                    }
                }
            }
        }
    }

    fn copy(&mut self, source: &Path, dest: &Path, is_dir: bool) -> crate::error::Result<()> {
        if is_dir {
            self.files.copy_directory(source, dest)
        } else {
            self.files.copy_file(source, dest)
        }
    }
}
