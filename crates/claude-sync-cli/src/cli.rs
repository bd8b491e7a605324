use std::path::PathBuf;

use clap::Parser;
use claude_sync_core::{Category, SyncDirection};

/// Claude Configuration Audit & Sync Tool
///
/// Compare and sync agents, commands, skills, prompts and hooks between the
/// project (./.claude) and global (~/.claude) configuration directories
#[derive(Parser, Debug)]
#[command(name = "claude-sync")]
#[command(about, long_about = None, version)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Compare the two directories without changing anything (default)
    #[arg(long, conflicts_with_all = ["sync", "pull", "settings"])]
    pub audit: bool,

    /// Copy files from project to global (global to project with --pull)
    #[arg(long, conflicts_with = "settings")]
    pub sync: bool,

    /// Sync from global to project (implies --sync)
    #[arg(long, conflicts_with = "settings")]
    pub pull: bool,

    /// Compare the project and global settings.json
    #[arg(long)]
    pub settings: bool,

    /// Preview changes without executing (dry-run)
    #[arg(long)]
    pub dry_run: bool,

    /// Overwrite conflicts in the sync direction without asking
    #[arg(long)]
    pub force: bool,

    /// Only agents/
    #[arg(long)]
    pub agents_only: bool,

    /// Only commands/
    #[arg(long)]
    pub commands_only: bool,

    /// Only skills/
    #[arg(long)]
    pub skills_only: bool,

    /// Include prompts/ when syncing
    #[arg(long)]
    pub include_prompts: bool,

    /// Never prompt; leave conflicts unresolved
    #[arg(long)]
    pub non_interactive: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Override project path (default: ./.claude)
    #[arg(long, value_name = "PATH")]
    pub project_dir: Option<PathBuf>,

    /// Override global path (default: ~/.claude)
    #[arg(long, value_name = "PATH")]
    pub global_dir: Option<PathBuf>,

    /// Where backups are written (default: <global>/backups)
    #[arg(long, value_name = "PATH")]
    pub backup_dir: Option<PathBuf>,

    /// Overwrite without taking backups
    #[arg(long)]
    pub no_backup: bool,

    /// Use specific config file
    #[arg(long, value_name = "PATH", conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Ignore all config files
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,
}

/// What the invocation does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Audit,
    Sync(SyncDirection),
    Settings,
}

impl Cli {
    pub const fn mode(&self) -> Mode {
        if self.settings {
            Mode::Settings
        } else if self.pull {
            Mode::Sync(SyncDirection::Pull)
        } else if self.sync {
            Mode::Sync(SyncDirection::Push)
        } else {
            Mode::Audit
        }
    }

    /// Whether any `--*-only` flag was given
    pub const fn has_category_filter(&self) -> bool {
        self.agents_only || self.commands_only || self.skills_only
    }

    /// Categories selected by the `--*-only` flags, plus prompts when asked
    ///
    /// `None` means the default set.
    pub fn categories(&self, include_prompts: bool) -> Option<Vec<Category>> {
        if !self.has_category_filter() {
            return include_prompts.then(|| Category::ALL.to_vec());
        }

        let mut categories: Vec<Category> = [
            (self.agents_only, Category::Agents),
            (self.commands_only, Category::Commands),
            (self.skills_only, Category::Skills),
        ]
        .into_iter()
        .filter_map(|(selected, category)| selected.then_some(category))
        .collect();

        if include_prompts {
            categories.push(Category::Prompts);
        }
        Some(categories)
    }
}
