//! Sync command - push or pull between the two roots

use anyhow::Result;
use claude_sync_core::{ConflictResolver, Reporter, SyncDirection, SyncManager, SyncOptions};

use super::Workspace;
use super::common::is_interactive;
use crate::cli::Cli;
use crate::interactive::{DialoguerPrompter, confirm_include_prompts};

pub struct Sync;

impl Sync {
    /// Run a sync in `direction` and print the summary
    ///
    /// Returns whether the sync completed without errors. Conflicts are left
    /// unresolved unless the session is interactive or `--force` is given.
    ///
    /// # Errors
    ///
    /// Returns an error if a root is missing, the configuration is unusable,
    /// or the operator cancels a prompt.
    pub fn execute(
        cli: &Cli,
        workspace: &Workspace,
        direction: SyncDirection,
        reporter: Reporter,
    ) -> Result<bool> {
        workspace.roots.ensure_exist()?;

        let interactive = is_interactive(cli);
        let include_prompts = if cli.include_prompts || workspace.config.include_prompts == Some(true) {
            true
        } else if interactive && !cli.has_category_filter() {
            confirm_include_prompts()?
        } else {
            false
        };
        let categories = cli.categories(include_prompts);

        let options = SyncOptions {
            dry_run: cli.dry_run,
            force: cli.force,
        };
        let mut manager = SyncManager::new(
            workspace.roots.clone(),
            workspace.scanner()?,
            workspace.file_handler()?,
            options,
        )
        .with_strategy(workspace.config.comparison_strategy());

        let mut result = manager.sync(direction, categories.as_deref())?;

        if interactive && !result.conflicts.is_empty() {
            println!(
                "\n{} conflict(s) need a decision ({}).",
                result.conflicts.len(),
                direction.describe()
            );
            let mut resolver = ConflictResolver::new(DialoguerPrompter::new(), false)
                .with_excludes(manager.files().excludes().clone());

            if let Err(e) = manager.resolve_conflicts(&mut resolver, &mut result) {
                print!("{}", reporter.sync(&result));
                return Err(e);
            }
        }

        print!("{}", reporter.sync(&result));
        if cli.verbose {
            print!("{}", reporter.operations(manager.files().operations()));
        }

        Ok(result.is_success())
    }
}
