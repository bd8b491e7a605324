//! Error types shared across the library
//!
//! Most functions return [`Result`], an `anyhow` alias carrying context for
//! every failed I/O call. Conditions the caller has to branch on are typed
//! as [`SyncError`] and can be recovered with `downcast_ref`.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `anyhow::Error`
pub type Result<T> = anyhow::Result<T>;

/// Errors the CLI reacts to explicitly
#[derive(Debug, Error)]
pub enum SyncError {
    /// A configuration root does not exist
    #[error("{label} directory not found: {}", path.display())]
    MissingRoot {
        /// Which root is missing ("project" or "global")
        label: &'static str,
        /// The path that was checked
        path: PathBuf,
    },

    /// The operator interrupted an interactive prompt
    #[error("operation cancelled by user")]
    Cancelled,
}

impl SyncError {
    /// Whether an `anyhow` error chain carries a cancellation
    #[must_use]
    pub fn is_cancellation(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<Self>(), Some(Self::Cancelled))
    }
}
