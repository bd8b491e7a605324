//! One-level subdirectory scanning for skills/
//!
//! Skills are organized as `skills/skill-name/SKILL.md` where each skill
//! has its own subdirectory containing a `SKILL.md` file plus optional
//! supporting files. The whole subdirectory is the unit of sync.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::category::SKILL_MARKER;
use crate::error::Result;

/// Every immediate subdirectory of the skills/ directory
///
/// # Errors
///
/// Returns an error if the directory cannot be read or if there are
/// permission issues.
pub fn directories(base: &Path) -> Result<Vec<PathBuf>> {
    let mut directories = Vec::new();

    for entry in fs::read_dir(base)
        .with_context(|| format!("Failed to read directory: {}", base.display()))?
    {
        let entry =
            entry.with_context(|| format!("Failed to read entry in: {}", base.display()))?;
        let path = entry.path();

        if path.is_dir() {
            directories.push(path);
        }
    }

    directories.sort();
    Ok(directories)
}

/// `SKILL.md` files of the skill directories that carry one
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn markers(base: &Path) -> Result<Vec<PathBuf>> {
    Ok(directories(base)?
        .into_iter()
        .map(|dir| dir.join(SKILL_MARKER))
        .filter(|marker| marker.is_file())
        .collect())
}
