//! Timestamped backup directories
//!
//! Every backup gets a fresh `<root>/<YYYYMMDD_HHMMSS>` directory. When that
//! directory already exists (two backups in the same second) a numeric
//! suffix is appended: `<YYYYMMDD_HHMMSS>-1`, `-2`, ...

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Local};

use crate::error::Result;

/// Timestamp layout of backup directory names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

const MAX_SUFFIX: u32 = 10_000;

/// Create and return a fresh backup directory under `root`
///
/// # Errors
///
/// Returns an error if `root` cannot be created or every candidate name is
/// taken.
pub fn allocate_dir(root: &Path, now: DateTime<Local>) -> Result<PathBuf> {
    fs::create_dir_all(root)
        .with_context(|| format!("Failed to create backup root: {}", root.display()))?;

    let stamp = now.format(TIMESTAMP_FORMAT).to_string();

    for suffix in 0..MAX_SUFFIX {
        let name = if suffix == 0 {
            stamp.clone()
        } else {
            format!("{stamp}-{suffix}")
        };
        let candidate = root.join(name);

        match fs::create_dir(&candidate) {
            Ok(()) => return Ok(candidate),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to create backup directory: {}", candidate.display())
                });
            }
        }
    }

    anyhow::bail!(
        "No free backup directory for {stamp} under {}",
        root.display()
    )
}
