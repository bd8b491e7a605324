//! Category-aware scanning of a configuration root
//!
//! This module provides the two views audit and sync need:
//! - entries: `*.md` files for flat categories, `skills/*/SKILL.md` for skills
//! - units: every flat regular file, or every skill subdirectory
//!
//! A missing category directory yields an empty result.

mod flat;
mod skills;

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;

use crate::category::{Category, CategoryKind};
use crate::config::PatternMatcher;
use crate::error::Result;

/// A syncable member of a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedUnit {
    /// Path relative to the root (`commands/a.md`, `skills/foo`)
    pub relative: String,
    /// Absolute path on disk
    pub path: PathBuf,
}

/// Scanner applying the `ignore` patterns and the copy exclusions
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    ignore: PatternMatcher,
    excludes: PatternMatcher,
}

impl Scanner {
    /// Create a new scanner
    ///
    /// `ignore` matches root-relative paths; `excludes` matches member names
    /// inside a category directory.
    #[must_use]
    pub const fn new(ignore: PatternMatcher, excludes: PatternMatcher) -> Self {
        Self { ignore, excludes }
    }

    /// Audit view of one category: relative path → absolute path
    ///
    /// # Errors
    ///
    /// Returns an error if the category directory exists but cannot be read.
    pub fn scan_entries(&self, root: &Path, category: Category) -> Result<BTreeMap<String, PathBuf>> {
        let dir = category.path_in(root);
        if !dir.exists() {
            return Ok(BTreeMap::new());
        }

        let paths = match category.kind() {
            CategoryKind::FlatFiles => flat::scan(&dir, Some("md"))?,
            CategoryKind::WholeDirectory => skills::markers(&dir)?,
        };

        let mut entries = BTreeMap::new();
        for path in paths {
            let relative = relative_key(root, &path)?;
            if self.is_wanted(&dir, &path, &relative) {
                entries.insert(relative, path);
            }
        }

        tracing::debug!(%category, root = %root.display(), count = entries.len(), "scanned entries");
        Ok(entries)
    }

    /// Sync view of one category, sorted by relative path
    ///
    /// # Errors
    ///
    /// Returns an error if the category directory exists but cannot be read.
    pub fn scan_units(&self, root: &Path, category: Category) -> Result<Vec<ScannedUnit>> {
        let dir = category.path_in(root);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let paths = match category.kind() {
            CategoryKind::FlatFiles => flat::scan(&dir, None)?,
            CategoryKind::WholeDirectory => skills::directories(&dir)?,
        };

        let mut units = Vec::with_capacity(paths.len());
        for path in paths {
            let relative = relative_key(root, &path)?;
            if self.is_wanted(&dir, &path, &relative) {
                units.push(ScannedUnit { relative, path });
            }
        }

        tracing::debug!(%category, root = %root.display(), count = units.len(), "scanned units");
        Ok(units)
    }

    fn is_wanted(&self, category_dir: &Path, path: &Path, relative: &str) -> bool {
        let is_dir = path.is_dir();
        let member = path.strip_prefix(category_dir).unwrap_or(path);

        self.ignore.should_include(Path::new(relative), is_dir)
            && self.excludes.should_include(member, is_dir)
    }
}

/// Root-relative key with `/` separators
fn relative_key(root: &Path, path: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(root)
        .with_context(|| format!("Failed to strip prefix from {}", path.display()))?;

    Ok(rel
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn populate(root: &Path) {
        fs::create_dir_all(root.join("agents")).unwrap();
        fs::write(root.join("agents/agent1.md"), "agent 1").unwrap();
        fs::write(root.join("agents/draft-x.md"), "draft").unwrap();
        fs::write(root.join("agents/.DS_Store"), "finder").unwrap();
        fs::write(root.join("agents/notes.txt"), "notes").unwrap();

        let skill = root.join("skills/rust-dev");
        fs::create_dir_all(&skill).unwrap();
        fs::write(skill.join("SKILL.md"), "skill").unwrap();
        fs::write(skill.join("helper.py"), "helper").unwrap();
        fs::create_dir_all(root.join("skills/no-marker")).unwrap();
        fs::create_dir_all(root.join("skills/__pycache__")).unwrap();
    }

    fn scanner() -> Scanner {
        Scanner::new(
            PatternMatcher::with_patterns(&["agents/draft-*"]).unwrap(),
            PatternMatcher::for_exclusions(&[]).unwrap(),
        )
    }

    #[test]
    fn test_entries_flat_markdown() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path());

        let entries = scanner().scan_entries(tmp.path(), Category::Agents).unwrap();

        let keys: Vec<&str> = entries.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["agents/agent1.md"]);
        assert_eq!(entries["agents/agent1.md"], tmp.path().join("agents/agent1.md"));
    }

    #[test]
    fn test_entries_skill_markers() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path());

        let entries = scanner().scan_entries(tmp.path(), Category::Skills).unwrap();

        let keys: Vec<&str> = entries.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["skills/rust-dev/SKILL.md"]);
    }

    #[test]
    fn test_units_flat_every_file() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path());

        let units = scanner().scan_units(tmp.path(), Category::Agents).unwrap();

        let keys: Vec<&str> = units.iter().map(|u| u.relative.as_str()).collect();
        assert_eq!(keys, vec!["agents/agent1.md", "agents/notes.txt"]);
    }

    #[test]
    fn test_units_skill_directories() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path());

        let units = scanner().scan_units(tmp.path(), Category::Skills).unwrap();

        let keys: Vec<&str> = units.iter().map(|u| u.relative.as_str()).collect();
        assert_eq!(keys, vec!["skills/no-marker", "skills/rust-dev"]);
        assert!(units[1].path.is_dir());
    }

    #[test]
    fn test_missing_category_is_empty() {
        let tmp = TempDir::new().unwrap();

        let scanner = Scanner::default();
        assert!(scanner.scan_entries(tmp.path(), Category::Hooks).unwrap().is_empty());
        assert!(scanner.scan_units(tmp.path(), Category::Prompts).unwrap().is_empty());
    }
}
