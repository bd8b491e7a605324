//! Modification times used to pick the newer side of a conflict

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use anyhow::Context;

use super::directory::DirectoryComparator;
use crate::config::PatternMatcher;
use crate::error::Result;

/// Timestamp lookups for files and skill directories
pub struct TimestampComparator;

impl TimestampComparator {
    /// Modification time of a single path
    ///
    /// # Errors
    ///
    /// Returns an error if metadata cannot be read.
    pub fn modified(path: &Path) -> Result<SystemTime> {
        fs::metadata(path)
            .with_context(|| format!("Failed to read metadata for: {}", path.display()))?
            .modified()
            .with_context(|| format!("Failed to get modification time for: {}", path.display()))
    }

    /// Modification time of a file, or of the newest non-excluded file in a
    /// directory (the directory's own time when it holds no files)
    ///
    /// # Errors
    ///
    /// Returns an error if metadata cannot be read.
    pub fn effective_modified(path: &Path, excludes: &PatternMatcher) -> Result<SystemTime> {
        if path.is_dir() {
            if let Some(newest) = DirectoryComparator::newest_modification(path, excludes)? {
                return Ok(newest);
            }
        }
        Self::modified(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::TempDir;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn write_with_mtime(path: &Path, content: &str, secs: u64) {
        fs::write(path, content).unwrap();
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(at(secs))
            .unwrap();
    }

    #[test]
    fn test_file_time() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("a.md");
        write_with_mtime(&file, "a", 1_700_000_000);

        assert_eq!(TimestampComparator::modified(&file).unwrap(), at(1_700_000_000));
        assert_eq!(
            TimestampComparator::effective_modified(&file, &PatternMatcher::new()).unwrap(),
            at(1_700_000_000)
        );
    }

    #[test]
    fn test_directory_uses_newest_file() {
        let tmp = TempDir::new().unwrap();
        let skill = tmp.path().join("tool");
        fs::create_dir_all(skill.join("scripts")).unwrap();
        write_with_mtime(&skill.join("SKILL.md"), "old", 1_600_000_000);
        write_with_mtime(&skill.join("scripts/run.sh"), "new", 1_700_000_000);

        assert_eq!(
            TimestampComparator::effective_modified(&skill, &PatternMatcher::new()).unwrap(),
            at(1_700_000_000)
        );
    }

    #[test]
    fn test_excluded_files_do_not_count() {
        let tmp = TempDir::new().unwrap();
        let skill = tmp.path().join("tool");
        fs::create_dir_all(&skill).unwrap();
        write_with_mtime(&skill.join("SKILL.md"), "skill", 1_600_000_000);
        write_with_mtime(&skill.join(".DS_Store"), "junk", 1_700_000_000);

        let excludes = PatternMatcher::for_exclusions(&[]).unwrap();
        assert_eq!(
            TimestampComparator::effective_modified(&skill, &excludes).unwrap(),
            at(1_600_000_000)
        );
    }

    #[test]
    fn test_missing_path() {
        let tmp = TempDir::new().unwrap();
        assert!(TimestampComparator::modified(&tmp.path().join("missing.md")).is_err());
    }
}
