//! Conflict resolution (interactive, batch, and timestamp-based)
//!
//! A [`ConflictResolver`] decides one conflict at a time. Precedence:
//! 1. a batch choice made earlier with an "apply to all" action
//! 2. force mode, which keeps the side with the newer modification time
//!    (ties and unreadable metadata keep the project side)
//! 3. the [`ConflictPrompter`], asked until it returns a terminal action

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Context;

use crate::comparison::{DiffGenerator, DirectoryComparator, TimestampComparator};
use crate::config::PatternMatcher;
use crate::error::Result;

/// A choice offered to the operator for one conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictAction {
    /// Copy the project version over the global one
    KeepProject,
    /// Copy the global version over the project one
    KeepGlobal,
    /// Show a diff and ask again
    ShowDiff,
    /// Leave both sides untouched
    Skip,
    /// Keep the project version for this and every later conflict
    ApplyAllProject,
    /// Keep the global version for this and every later conflict
    ApplyAllGlobal,
}

impl ConflictAction {
    /// Every action, in menu order
    pub const ALL: [Self; 6] = [
        Self::KeepProject,
        Self::KeepGlobal,
        Self::ShowDiff,
        Self::Skip,
        Self::ApplyAllProject,
        Self::ApplyAllGlobal,
    ];

    /// Menu label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::KeepProject => "Keep project version",
            Self::KeepGlobal => "Keep global version",
            Self::ShowDiff => "Show diff",
            Self::Skip => "Skip",
            Self::ApplyAllProject => "Keep project version for all remaining conflicts",
            Self::ApplyAllGlobal => "Keep global version for all remaining conflicts",
        }
    }

    /// Outcome of a terminal action; `None` for [`Self::ShowDiff`]
    #[must_use]
    pub const fn resolution(self) -> Option<Resolution> {
        match self {
            Self::KeepProject | Self::ApplyAllProject => Some(Resolution::KeepProject),
            Self::KeepGlobal | Self::ApplyAllGlobal => Some(Resolution::KeepGlobal),
            Self::Skip => Some(Resolution::Skip),
            Self::ShowDiff => None,
        }
    }

    /// Whether the action also applies to later conflicts
    #[must_use]
    pub const fn is_batch(self) -> bool {
        matches!(self, Self::ApplyAllProject | Self::ApplyAllGlobal)
    }
}

/// Terminal outcome of a conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The project version wins
    KeepProject,
    /// The global version wins
    KeepGlobal,
    /// Neither side changes
    Skip,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::KeepProject => "kept project",
            Self::KeepGlobal => "kept global",
            Self::Skip => "skipped",
        })
    }
}

/// Size and modification time of one side of a conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMeta {
    /// Bytes (summed over the tree for directories)
    pub size: u64,
    /// Modification time (newest file for directories)
    pub modified: SystemTime,
    /// Whether this side is a skill directory
    pub is_dir: bool,
}

/// What the prompter is shown about a conflict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictDetails {
    /// Root-relative path (`commands/b.md`, `skills/foo`)
    pub rel_path: String,
    /// Project side
    pub project_path: PathBuf,
    /// Global side
    pub global_path: PathBuf,
    /// Project metadata, if readable
    pub project: Option<FileMeta>,
    /// Global metadata, if readable
    pub global: Option<FileMeta>,
    /// Why metadata could not be read
    pub metadata_errors: Vec<String>,
}

impl ConflictDetails {
    /// Collect metadata for both sides
    #[must_use]
    pub fn gather(
        rel_path: &str,
        project_path: &Path,
        global_path: &Path,
        excludes: &PatternMatcher,
    ) -> Self {
        let mut metadata_errors = Vec::new();
        let mut meta = |path: &Path| match file_meta(path, excludes) {
            Ok(meta) => Some(meta),
            Err(e) => {
                metadata_errors.push(format!("{}: {e:#}", path.display()));
                None
            }
        };

        let project = meta(project_path);
        let global = meta(global_path);

        Self {
            rel_path: rel_path.to_string(),
            project_path: project_path.to_path_buf(),
            global_path: global_path.to_path_buf(),
            project,
            global,
            metadata_errors,
        }
    }

    /// Whether the conflict is between two skill directories
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.project_path.is_dir()
    }

    /// Render the diff shown for [`ConflictAction::ShowDiff`]
    ///
    /// Lines only in the project version are insertions.
    ///
    /// # Errors
    ///
    /// Returns an error if either side cannot be read as text.
    pub fn diff(&self, excludes: &PatternMatcher) -> Result<String> {
        if self.is_directory() {
            let comparison =
                DirectoryComparator::compare(&self.project_path, &self.global_path, excludes)?;
            Ok(DiffGenerator::generate_directory_summary(
                &comparison,
                &self.project_path,
                &self.global_path,
                &self.rel_path,
            ))
        } else {
            DiffGenerator::generate(&self.project_path, &self.global_path)
        }
    }
}

/// The I/O seam of conflict resolution
pub trait ConflictPrompter {
    /// Show both sides of a conflict; called once per conflict
    fn present(&mut self, details: &ConflictDetails);

    /// Ask for an action
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Cancelled`](crate::SyncError::Cancelled) when the
    /// operator interrupts the prompt, or any terminal error.
    fn choose(&mut self, details: &ConflictDetails) -> Result<ConflictAction>;

    /// Show the rendered diff of a conflict
    fn show_diff(&mut self, details: &ConflictDetails, diff: &str);
}

/// Decision engine for conflicts
pub struct ConflictResolver<P> {
    prompter: P,
    batch_choice: Option<Resolution>,
    force: bool,
    excludes: PatternMatcher,
    warnings: Vec<String>,
}

impl<P: ConflictPrompter> ConflictResolver<P> {
    /// Create a resolver
    #[must_use]
    pub fn new(prompter: P, force: bool) -> Self {
        Self {
            prompter,
            batch_choice: None,
            force,
            excludes: PatternMatcher::new(),
            warnings: Vec::new(),
        }
    }

    /// Ignore entries matching `excludes` when measuring and diffing directories
    #[must_use]
    pub fn with_excludes(mut self, excludes: PatternMatcher) -> Self {
        self.excludes = excludes;
        self
    }

    /// Choice applied to every conflict without asking, if any
    #[must_use]
    pub const fn batch_choice(&self) -> Option<Resolution> {
        self.batch_choice
    }

    /// Forget an "apply to all" choice
    pub fn reset_batch_mode(&mut self) {
        self.batch_choice = None;
    }

    /// Metadata problems met while deciding by modification time
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// The prompter
    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    /// Decide one conflict
    ///
    /// # Errors
    ///
    /// Propagates prompter errors, including
    /// [`SyncError::Cancelled`](crate::SyncError::Cancelled).
    pub fn resolve(
        &mut self,
        rel_path: &str,
        project_path: &Path,
        global_path: &Path,
    ) -> Result<Resolution> {
        if let Some(choice) = self.batch_choice {
            tracing::debug!(path = rel_path, %choice, "batch choice");
            return Ok(choice);
        }

        if self.force {
            return Ok(self.resolve_by_time(rel_path, project_path, global_path));
        }

        let details = ConflictDetails::gather(rel_path, project_path, global_path, &self.excludes);
        self.prompter.present(&details);

        loop {
            let action = self.prompter.choose(&details)?;
            let Some(resolution) = action.resolution() else {
                let diff = details
                    .diff(&self.excludes)
                    .unwrap_or_else(|e| format!("Failed to generate diff: {e:#}"));
                self.prompter.show_diff(&details, &diff);
                continue;
            };

            if action.is_batch() {
                self.batch_choice = Some(resolution);
            }
            tracing::debug!(path = rel_path, %resolution, "conflict resolved");
            return Ok(resolution);
        }
    }

    fn resolve_by_time(&mut self, rel_path: &str, project_path: &Path, global_path: &Path) -> Resolution {
        let modified = |path: &Path| TimestampComparator::effective_modified(path, &self.excludes);
        let times = modified(project_path).and_then(|project| Ok((project, modified(global_path)?)));

        match times {
            Ok((project, global)) if global > project => Resolution::KeepGlobal,
            Ok(_) => Resolution::KeepProject,
            Err(e) => {
                tracing::warn!(path = rel_path, "cannot compare modification times, keeping project: {e:#}");
                self.warnings.push(format!("{rel_path}: {e:#}"));
                Resolution::KeepProject
            }
        }
    }
}

fn file_meta(path: &Path, excludes: &PatternMatcher) -> Result<FileMeta> {
    let is_dir = path.is_dir();
    let size = if is_dir {
        DirectoryComparator::total_size(path, excludes)?
    } else {
        fs::metadata(path)
            .with_context(|| format!("Failed to read metadata for: {}", path.display()))?
            .len()
    };

    Ok(FileMeta {
        size,
        modified: TimestampComparator::effective_modified(path, excludes)?,
        is_dir,
    })
}
