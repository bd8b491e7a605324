//! In-memory log of file operations

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Local};

/// Kind of file operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Single file copy
    CopyFile,
    /// Directory tree copy
    CopyDirectory,
    /// Backup taken before an overwrite
    Backup,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CopyFile => "copy",
            Self::CopyDirectory => "copy-dir",
            Self::Backup => "backup",
        })
    }
}

/// Outcome of a file operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    /// Completed and validated
    Success,
    /// Failed with the given reason
    Failed(String),
}

impl OperationStatus {
    /// Whether the operation succeeded
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// One entry of the operations log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRecord {
    /// What was done
    pub kind: OperationKind,
    /// Source path
    pub source: PathBuf,
    /// Destination path
    pub dest: PathBuf,
    /// When the operation finished
    pub timestamp: DateTime<Local>,
    /// How it ended
    pub status: OperationStatus,
}

impl OperationRecord {
    pub(super) fn now(
        kind: OperationKind,
        source: impl Into<PathBuf>,
        dest: impl Into<PathBuf>,
        status: OperationStatus,
    ) -> Self {
        Self {
            kind,
            source: source.into(),
            dest: dest.into(),
            timestamp: Local::now(),
            status,
        }
    }
}

impl fmt::Display for OperationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} -> {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.kind,
            self.source.display(),
            self.dest.display()
        )?;
        if let OperationStatus::Failed(reason) = &self.status {
            write!(f, " (failed: {reason})")?;
        }
        Ok(())
    }
}
