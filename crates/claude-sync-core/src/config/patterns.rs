//! Gitignore-style pattern matching using the ignore crate

use std::path::Path;

use anyhow::Context;
use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::Result;

/// Entries never copied as part of a directory unit: VCS metadata, caches,
/// compiled artifacts and editor droppings
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".git/",
    ".svn/",
    ".hg/",
    "__pycache__/",
    "*.pyc",
    "*.pyo",
    ".pytest_cache/",
    ".mypy_cache/",
    "node_modules/",
    ".DS_Store",
    "*.swp",
];

/// Pattern matcher for file inclusion/exclusion
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    gitignore: Option<Gitignore>,
}

impl PatternMatcher {
    /// Matcher that includes everything
    #[must_use]
    pub const fn new() -> Self {
        Self { gitignore: None }
    }

    /// Build a matcher that excludes every path matching one of `patterns`
    ///
    /// # Errors
    ///
    /// Returns an error if patterns are invalid.
    pub fn with_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(Self::new());
        }

        let mut builder = GitignoreBuilder::new("");
        for pattern in patterns {
            let pattern = pattern.as_ref();
            builder
                .add_line(None, pattern)
                .with_context(|| format!("Invalid pattern: '{pattern}'"))?;
        }

        let gitignore = builder.build().context("Failed to compile patterns")?;
        Ok(Self {
            gitignore: Some(gitignore),
        })
    }

    /// Matcher for directory copies: the built-in denylist plus `extra`
    ///
    /// # Errors
    ///
    /// Returns an error if one of the extra patterns is invalid.
    pub fn for_exclusions(extra: &[String]) -> Result<Self> {
        let patterns: Vec<&str> = DEFAULT_EXCLUDES
            .iter()
            .copied()
            .chain(extra.iter().map(String::as_str))
            .collect();
        Self::with_patterns(&patterns)
    }

    /// Check if a relative path should be included
    ///
    /// A path is excluded when it or any of its parents matches.
    #[must_use]
    pub fn should_include(&self, path: &Path, is_dir: bool) -> bool {
        self.gitignore.as_ref().is_none_or(|gi| {
            !gi.matched_path_or_any_parents(path, is_dir).is_ignore()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_no_patterns() {
        let matcher = PatternMatcher::new();
        assert!(matcher.should_include(&PathBuf::from("any/file.txt"), false));
    }

    #[test]
    fn test_ignore_pattern() {
        let matcher = PatternMatcher::with_patterns(&["*.tmp"]).unwrap();

        assert!(!matcher.should_include(&PathBuf::from("file.tmp"), false));
        assert!(matcher.should_include(&PathBuf::from("file.txt"), false));
    }

    #[test]
    fn test_anchored_relative_pattern() {
        let matcher = PatternMatcher::with_patterns(&["agents/draft-*"]).unwrap();

        assert!(!matcher.should_include(&PathBuf::from("agents/draft-one.md"), false));
        assert!(matcher.should_include(&PathBuf::from("agents/final.md"), false));
        assert!(matcher.should_include(&PathBuf::from("commands/draft-one.md"), false));
    }

    #[test]
    fn test_parent_directory_match() {
        let matcher = PatternMatcher::with_patterns(&["skills/legacy"]).unwrap();

        assert!(!matcher.should_include(&PathBuf::from("skills/legacy"), true));
        assert!(!matcher.should_include(&PathBuf::from("skills/legacy/SKILL.md"), false));
        assert!(matcher.should_include(&PathBuf::from("skills/modern/SKILL.md"), false));
    }

    #[test]
    fn test_default_exclusions() {
        let matcher = PatternMatcher::for_exclusions(&[]).unwrap();

        assert!(!matcher.should_include(&PathBuf::from(".git"), true));
        assert!(!matcher.should_include(&PathBuf::from("scripts/__pycache__"), true));
        assert!(!matcher.should_include(&PathBuf::from("scripts/tool.pyc"), false));
        assert!(!matcher.should_include(&PathBuf::from(".DS_Store"), false));
        assert!(matcher.should_include(&PathBuf::from("scripts/tool.py"), false));
        assert!(matcher.should_include(&PathBuf::from("SKILL.md"), false));
    }

    #[test]
    fn test_extra_exclusions() {
        let matcher = PatternMatcher::for_exclusions(&["*.bak".to_string()]).unwrap();

        assert!(!matcher.should_include(&PathBuf::from("notes.bak"), false));
        assert!(!matcher.should_include(&PathBuf::from("node_modules"), true));
    }
}
