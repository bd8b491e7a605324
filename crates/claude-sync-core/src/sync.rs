//! Push/pull synchronization engine
//!
//! Push copies project → global, pull copies global → project. Files
//! missing at the destination are copied, identical ones skipped, and
//! differing ones surfaced as conflicts (or overwritten in the sync
//! direction with `force`). Conflicts surfaced by a run can then be handed
//! to a [`ConflictResolver`](crate::ConflictResolver) through
//! [`SyncManager::resolve_conflicts`].

mod actions;
mod executor;
mod manager;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

pub use actions::{SyncAction, SyncActionResolver};
pub use manager::SyncManager;

use crate::Roots;
use crate::resolver::Resolution;

/// Direction of a sync run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncDirection {
    /// Project → global
    #[default]
    Push,
    /// Global → project
    Pull,
}

impl SyncDirection {
    /// Root files are copied from
    #[must_use]
    pub fn source_root(self, roots: &Roots) -> &Path {
        match self {
            Self::Push => &roots.project,
            Self::Pull => &roots.global,
        }
    }

    /// Root files are copied to
    #[must_use]
    pub fn dest_root(self, roots: &Roots) -> &Path {
        match self {
            Self::Push => &roots.global,
            Self::Pull => &roots.project,
        }
    }

    /// Side kept when a conflict is overwritten in this direction
    #[must_use]
    pub const fn winning_side(self) -> Resolution {
        match self {
            Self::Push => Resolution::KeepProject,
            Self::Pull => Resolution::KeepGlobal,
        }
    }

    /// Human-readable arrow form
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Push => "project → global",
            Self::Pull => "global → project",
        }
    }
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Push => "push",
            Self::Pull => "pull",
        })
    }
}

/// Run flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Report without touching the filesystem
    pub dry_run: bool,
    /// Overwrite conflicts in the sync direction
    pub force: bool,
}

/// Outcome of a sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncResult {
    /// Direction of the run
    pub direction: SyncDirection,
    /// Whether nothing was written
    pub dry_run: bool,
    /// Units copied (or that would be copied)
    pub files_copied: Vec<String>,
    /// Identical units and unresolved conflicts
    pub files_skipped: Vec<String>,
    /// Conflicts surfaced and not yet resolved (also in `files_skipped`)
    pub conflicts: Vec<String>,
    /// Conflicts decided, by path
    pub conflicts_resolved: BTreeMap<String, Resolution>,
    /// Per-unit and per-category failures
    pub errors: Vec<String>,
}

/// Counts derived from a [`SyncResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSummary {
    /// Units copied
    pub copied: usize,
    /// Units skipped
    pub skipped: usize,
    /// Conflicts awaiting resolution
    pub conflicts: usize,
    /// Conflicts decided
    pub resolved: usize,
    /// Failures
    pub errors: usize,
    /// copied + skipped + resolved
    pub total: usize,
}

impl SyncResult {
    /// Empty result for a run
    #[must_use]
    pub fn new(direction: SyncDirection, dry_run: bool) -> Self {
        Self {
            direction,
            dry_run,
            ..Self::default()
        }
    }

    /// Derived counts
    #[must_use]
    pub fn summary(&self) -> SyncSummary {
        let copied = self.files_copied.len();
        let skipped = self.files_skipped.len();
        let resolved = self.conflicts_resolved.len();

        SyncSummary {
            copied,
            skipped,
            conflicts: self.conflicts.len(),
            resolved,
            errors: self.errors.len(),
            total: copied + skipped + resolved,
        }
    }

    /// Whether the run finished without errors
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fold another run's outcome into this one
    pub fn merge(&mut self, other: Self) {
        self.dry_run |= other.dry_run;
        self.files_copied.extend(other.files_copied);
        self.files_skipped.extend(other.files_skipped);
        self.conflicts.extend(other.conflicts);
        self.conflicts_resolved.extend(other.conflicts_resolved);
        self.errors.extend(other.errors);
    }

    pub(crate) fn record_error(&mut self, rel_path: &str, err: &anyhow::Error) {
        tracing::warn!(path = rel_path, "{err:#}");
        self.errors.push(format!("{rel_path}: {err:#}"));
    }
}

#[cfg(test)]
mod integration_tests {
    use std::collections::VecDeque;
    use std::fs;
    use std::path::{Path, PathBuf};

    use tempfile::TempDir;

    use super::*;
    use crate::SyncError;
    use crate::category::Category;
    use crate::config::PatternMatcher;
    use crate::files::{FileHandler, FileHandlerConfig};
    use crate::resolver::{ConflictAction, ConflictDetails, ConflictPrompter, ConflictResolver};
    use crate::scanner::Scanner;

    struct Fixture {
        tmp: TempDir,
        roots: Roots,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let roots = Roots::new(tmp.path().join("project"), tmp.path().join("global"));
            fs::create_dir_all(&roots.project).unwrap();
            fs::create_dir_all(&roots.global).unwrap();
            Self { tmp, roots }
        }

        fn write(root: &Path, rel: &str, content: &str) {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        fn backup_root(&self) -> PathBuf {
            self.tmp.path().join("backups")
        }

        fn manager(&self, options: SyncOptions) -> SyncManager {
            let files = FileHandler::new(FileHandlerConfig::new(self.backup_root())).unwrap();
            let scanner = Scanner::new(PatternMatcher::new(), PatternMatcher::for_exclusions(&[]).unwrap());
            SyncManager::new(self.roots.clone(), scanner, files, options)
        }

        fn read(root: &Path, rel: &str) -> String {
            fs::read_to_string(root.join(rel)).unwrap()
        }
    }

    struct ScriptedPrompter(VecDeque<ConflictAction>);

    impl ConflictPrompter for ScriptedPrompter {
        fn present(&mut self, _details: &ConflictDetails) {}

        fn choose(&mut self, _details: &ConflictDetails) -> crate::Result<ConflictAction> {
            self.0.pop_front().ok_or_else(|| SyncError::Cancelled.into())
        }

        fn show_diff(&mut self, _details: &ConflictDetails, _diff: &str) {}
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_push_copies_missing_file() {
        let fx = Fixture::new();
        Fixture::write(&fx.roots.project, "commands/a.md", "X");

        let result = fx.manager(SyncOptions::default()).sync(SyncDirection::Push, None).unwrap();

        assert_eq!(result.files_copied, strings(&["commands/a.md"]));
        assert_eq!(Fixture::read(&fx.roots.global, "commands/a.md"), "X");
        assert!(result.is_success());
        assert!(!fx.backup_root().exists());
    }

    #[test]
    fn test_push_surfaces_conflict() {
        let fx = Fixture::new();
        Fixture::write(&fx.roots.project, "commands/b.md", "P");
        Fixture::write(&fx.roots.global, "commands/b.md", "G");

        let result = fx.manager(SyncOptions::default()).sync(SyncDirection::Push, None).unwrap();

        assert!(result.files_copied.is_empty());
        assert_eq!(result.files_skipped, strings(&["commands/b.md"]));
        assert_eq!(result.conflicts, strings(&["commands/b.md"]));
        assert_eq!(Fixture::read(&fx.roots.global, "commands/b.md"), "G");
        assert_eq!(result.summary().total, 1);
    }

    #[test]
    fn test_push_is_idempotent() {
        let fx = Fixture::new();
        Fixture::write(&fx.roots.project, "agents/x.md", "agent");
        Fixture::write(&fx.roots.project, "hooks/pre.sh", "#!/bin/sh");
        Fixture::write(&fx.roots.project, "skills/rust-dev/SKILL.md", "skill");

        let mut manager = fx.manager(SyncOptions::default());
        let first = manager.sync(SyncDirection::Push, None).unwrap();
        assert_eq!(first.files_copied.len(), 3);

        let second = manager.sync(SyncDirection::Push, None).unwrap();
        assert!(second.files_copied.is_empty());
        assert_eq!(second.files_skipped.len(), 3);
        assert!(second.conflicts.is_empty());
    }

    #[test]
    fn test_dry_run_matches_real_run_without_writing() {
        let fx = Fixture::new();
        Fixture::write(&fx.roots.project, "commands/a.md", "X");
        Fixture::write(&fx.roots.project, "commands/b.md", "P");
        Fixture::write(&fx.roots.global, "commands/b.md", "G");
        Fixture::write(&fx.roots.project, "commands/c.md", "same");
        Fixture::write(&fx.roots.global, "commands/c.md", "same");
        Fixture::write(&fx.roots.project, "skills/new-skill/SKILL.md", "skill");

        for force in [false, true] {
            let dry = fx
                .manager(SyncOptions { dry_run: true, force })
                .sync(SyncDirection::Push, None)
                .unwrap();

            assert!(!fx.roots.global.join("commands/a.md").exists());
            assert!(!fx.roots.global.join("skills/new-skill").exists());
            assert_eq!(Fixture::read(&fx.roots.global, "commands/b.md"), "G");
            assert!(!fx.backup_root().exists());
            assert!(dry.dry_run);

            if !force {
                let real = fx
                    .manager(SyncOptions { dry_run: false, force })
                    .sync(SyncDirection::Push, None)
                    .unwrap();
                assert_eq!(dry.summary().copied, real.summary().copied);
                assert_eq!(dry.summary().skipped, real.summary().skipped);
                assert_eq!(dry.conflicts, real.conflicts);

                // Reset for the forced round
                fs::remove_file(fx.roots.global.join("commands/a.md")).unwrap();
                fs::remove_dir_all(fx.roots.global.join("skills/new-skill")).unwrap();
            } else {
                assert_eq!(dry.summary().copied, 2);
                assert_eq!(dry.summary().resolved, 1);
                assert_eq!(dry.summary().skipped, 1);
            }
        }
    }

    #[test]
    fn test_force_push_overwrites_with_backup() {
        let fx = Fixture::new();
        Fixture::write(&fx.roots.project, "commands/b.md", "P");
        Fixture::write(&fx.roots.global, "commands/b.md", "G");

        let mut manager = fx.manager(SyncOptions { dry_run: false, force: true });
        let result = manager.sync(SyncDirection::Push, None).unwrap();

        assert_eq!(Fixture::read(&fx.roots.global, "commands/b.md"), "P");
        assert_eq!(
            result.conflicts_resolved.get("commands/b.md"),
            Some(&Resolution::KeepProject)
        );
        assert!(result.conflicts.is_empty());
        assert_eq!(fs::read_dir(fx.backup_root()).unwrap().count(), 1);
        assert_eq!(manager.files().operations().len(), 2);
    }

    #[test]
    fn test_force_pull_keeps_global() {
        let fx = Fixture::new();
        Fixture::write(&fx.roots.project, "agents/x.md", "P");
        Fixture::write(&fx.roots.global, "agents/x.md", "G");
        Fixture::write(&fx.roots.global, "agents/only-global.md", "new");

        let result = fx
            .manager(SyncOptions { dry_run: false, force: true })
            .sync(SyncDirection::Pull, None)
            .unwrap();

        assert_eq!(Fixture::read(&fx.roots.project, "agents/x.md"), "G");
        assert_eq!(Fixture::read(&fx.roots.project, "agents/only-global.md"), "new");
        assert_eq!(
            result.conflicts_resolved.get("agents/x.md"),
            Some(&Resolution::KeepGlobal)
        );
        assert_eq!(result.direction, SyncDirection::Pull);
    }

    #[test]
    fn test_skill_directory_units() {
        let fx = Fixture::new();
        Fixture::write(&fx.roots.project, "skills/same/SKILL.md", "same");
        Fixture::write(&fx.roots.global, "skills/same/SKILL.md", "same");
        Fixture::write(&fx.roots.project, "skills/same/__pycache__/x.pyc", "bytecode");
        Fixture::write(&fx.roots.project, "skills/differs/SKILL.md", "v2");
        Fixture::write(&fx.roots.project, "skills/differs/helper.py", "print()");
        Fixture::write(&fx.roots.global, "skills/differs/SKILL.md", "v1");
        Fixture::write(&fx.roots.global, "skills/differs/stale.md", "stale");

        let mut manager = fx.manager(SyncOptions::default());
        let result = manager.sync(SyncDirection::Push, Some(&[Category::Skills])).unwrap();

        assert_eq!(result.files_skipped, strings(&["skills/differs", "skills/same"]));
        assert_eq!(result.conflicts, strings(&["skills/differs"]));

        let forced = fx
            .manager(SyncOptions { dry_run: false, force: true })
            .sync(SyncDirection::Push, Some(&[Category::Skills]))
            .unwrap();

        assert_eq!(forced.conflicts_resolved.len(), 1);
        assert_eq!(Fixture::read(&fx.roots.global, "skills/differs/SKILL.md"), "v2");
        assert!(fx.roots.global.join("skills/differs/helper.py").exists());
        assert!(!fx.roots.global.join("skills/differs/stale.md").exists());
        assert!(!fx.roots.global.join("skills/same/__pycache__").exists());
    }

    #[test]
    fn test_force_push_replaces_file_where_skill_expected() {
        let fx = Fixture::new();
        Fixture::write(&fx.roots.project, "skills/foo/SKILL.md", "skill");
        Fixture::write(&fx.roots.global, "skills/foo", "stray file");

        let result = fx
            .manager(SyncOptions { dry_run: false, force: true })
            .sync(SyncDirection::Push, Some(&[Category::Skills]))
            .unwrap();

        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert_eq!(
            result.conflicts_resolved.get("skills/foo"),
            Some(&Resolution::KeepProject)
        );
        assert_eq!(Fixture::read(&fx.roots.global, "skills/foo/SKILL.md"), "skill");
    }

    #[test]
    fn test_prompts_only_when_requested() {
        let fx = Fixture::new();
        Fixture::write(&fx.roots.project, "prompts/p.md", "prompt");

        let default = fx.manager(SyncOptions::default()).sync(SyncDirection::Push, None).unwrap();
        assert_eq!(default.summary().total, 0);
        assert!(!fx.roots.global.join("prompts/p.md").exists());

        let requested = fx
            .manager(SyncOptions::default())
            .sync(SyncDirection::Push, Some(&[Category::Prompts]))
            .unwrap();
        assert_eq!(requested.files_copied, strings(&["prompts/p.md"]));
    }

    #[test]
    fn test_missing_root() {
        let fx = Fixture::new();
        fs::remove_dir_all(&fx.roots.global).unwrap();

        let err = fx.manager(SyncOptions::default()).sync(SyncDirection::Push, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SyncError>(),
            Some(SyncError::MissingRoot { label: "global", .. })
        ));
    }

    #[test]
    fn test_resolve_conflicts_applies_decisions() {
        let fx = Fixture::new();
        Fixture::write(&fx.roots.project, "commands/a.md", "Pa");
        Fixture::write(&fx.roots.global, "commands/a.md", "Ga");
        Fixture::write(&fx.roots.project, "commands/b.md", "Pb");
        Fixture::write(&fx.roots.global, "commands/b.md", "Gb");
        Fixture::write(&fx.roots.project, "commands/c.md", "Pc");
        Fixture::write(&fx.roots.global, "commands/c.md", "Gc");

        let mut manager = fx.manager(SyncOptions::default());
        let mut result = manager.sync(SyncDirection::Push, None).unwrap();
        let before = result.summary().total;

        let prompter = ScriptedPrompter(VecDeque::from([
            ConflictAction::KeepProject,
            ConflictAction::KeepGlobal,
            ConflictAction::Skip,
        ]));
        let mut resolver = ConflictResolver::new(prompter, false);
        manager.resolve_conflicts(&mut resolver, &mut result).unwrap();

        assert_eq!(Fixture::read(&fx.roots.global, "commands/a.md"), "Pa");
        assert_eq!(Fixture::read(&fx.roots.project, "commands/b.md"), "Gb");
        assert_eq!(Fixture::read(&fx.roots.project, "commands/c.md"), "Pc");
        assert_eq!(Fixture::read(&fx.roots.global, "commands/c.md"), "Gc");

        assert!(result.conflicts.is_empty());
        assert!(result.files_skipped.is_empty());
        assert_eq!(result.conflicts_resolved.len(), 3);
        assert_eq!(result.conflicts_resolved["commands/c.md"], Resolution::Skip);
        assert_eq!(result.summary().total, before);
    }

    #[test]
    fn test_resolve_conflicts_cancellation() {
        let fx = Fixture::new();
        Fixture::write(&fx.roots.project, "commands/a.md", "Pa");
        Fixture::write(&fx.roots.global, "commands/a.md", "Ga");
        Fixture::write(&fx.roots.project, "commands/b.md", "Pb");
        Fixture::write(&fx.roots.global, "commands/b.md", "Gb");

        let mut manager = fx.manager(SyncOptions::default());
        let mut result = manager.sync(SyncDirection::Push, None).unwrap();

        let prompter = ScriptedPrompter(VecDeque::from([ConflictAction::KeepProject]));
        let mut resolver = ConflictResolver::new(prompter, false);
        let err = manager.resolve_conflicts(&mut resolver, &mut result).unwrap_err();

        assert!(SyncError::is_cancellation(&err));
        assert_eq!(Fixture::read(&fx.roots.global, "commands/a.md"), "Pa");
        assert_eq!(result.conflicts, strings(&["commands/b.md"]));
        assert_eq!(result.conflicts_resolved.len(), 1);
    }

    #[test]
    fn test_summary_arithmetic_and_merge() {
        let mut result = SyncResult::new(SyncDirection::Push, false);
        result.files_copied = strings(&["agents/a.md", "agents/b.md"]);
        result.files_skipped = strings(&["agents/c.md"]);
        result.conflicts_resolved.insert("agents/d.md".to_string(), Resolution::Skip);

        let summary = result.summary();
        assert_eq!(summary.total, 4);
        assert!(result.is_success());

        let mut other = SyncResult::new(SyncDirection::Push, false);
        other.errors.push("commands/x.md: boom".to_string());
        result.merge(other);

        assert!(!result.is_success());
        assert_eq!(result.summary().errors, 1);
    }
}
