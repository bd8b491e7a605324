//! Sync action determination logic

use std::path::PathBuf;

use crate::comparison::ComparisonResult;
use crate::scanner::ScannedUnit;

/// Sync action to perform for one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Destination is missing: copy the unit
    Copy {
        /// Root-relative path
        rel_path: String,
        /// Source path
        source: PathBuf,
        /// Destination path
        dest: PathBuf,
        /// Whether the unit is a directory
        is_dir: bool,
    },
    /// Nothing to do
    Skip {
        /// Root-relative path
        rel_path: String,
        /// Why the unit is skipped
        reason: &'static str,
    },
    /// Both sides exist with different content
    Conflict {
        /// Root-relative path
        rel_path: String,
        /// Source path
        source: PathBuf,
        /// Destination path
        dest: PathBuf,
        /// Whether the unit is a directory
        is_dir: bool,
    },
}

impl SyncAction {
    /// Root-relative path the action applies to
    #[must_use]
    pub fn rel_path(&self) -> &str {
        match self {
            Self::Copy { rel_path, .. }
            | Self::Skip { rel_path, .. }
            | Self::Conflict { rel_path, .. } => rel_path,
        }
    }
}

/// Resolves comparison results into sync actions
pub struct SyncActionResolver;

impl SyncActionResolver {
    /// Determine the action for a scanned unit
    #[must_use]
    pub fn resolve(unit: ScannedUnit, dest: PathBuf, is_dir: bool, comparison: ComparisonResult) -> SyncAction {
        let ScannedUnit { relative: rel_path, path: source } = unit;

        match comparison {
            ComparisonResult::Identical => SyncAction::Skip {
                rel_path,
                reason: "identical content",
            },
            ComparisonResult::SourceOnly => SyncAction::Copy {
                rel_path,
                source,
                dest,
                is_dir,
            },
            ComparisonResult::DestinationOnly => SyncAction::Skip {
                rel_path,
                reason: "source doesn't exist",
            },
            ComparisonResult::Different => SyncAction::Conflict {
                rel_path,
                source,
                dest,
                is_dir,
            },
        }
    }
}
