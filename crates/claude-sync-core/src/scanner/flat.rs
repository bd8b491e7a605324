//! Flat directory scanning for agents/, commands/, prompts/ and hooks/
//!
//! Members are regular files stored directly in the category directory.
//! No subdirectories are traversed.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::error::Result;

/// Scan a category directory for regular files (flat structure)
///
/// With `extension` set, only files carrying that extension are returned.
///
/// # Errors
///
/// Returns an error if the directory cannot be read or if there are
/// permission issues.
pub fn scan(base: &Path, extension: Option<&str>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(base)
        .with_context(|| format!("Failed to read directory: {}", base.display()))?
    {
        let entry =
            entry.with_context(|| format!("Failed to read entry in: {}", base.display()))?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        if extension.is_none_or(|wanted| path.extension().is_some_and(|ext| ext == wanted)) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
