//! Audit command - read-only comparison of the two roots

use anyhow::Result;
use claude_sync_core::{AuditManager, Category, Reporter};

use super::Workspace;
use crate::cli::Cli;

pub struct Audit;

impl Audit {
    /// Compare the project and global roots and print the report
    ///
    /// Prompts are always audited unless a `--*-only` filter is given.
    pub fn execute(cli: &Cli, workspace: &Workspace, reporter: Reporter) -> Result<()> {
        let manager = AuditManager::new(
            workspace.roots.clone(),
            workspace.scanner()?,
            workspace.config.comparison_strategy(),
        );

        let categories = cli
            .categories(cli.include_prompts)
            .unwrap_or_else(|| Category::ALL.to_vec());
        let result = manager.audit_categories(&categories)?;

        print!("{}", reporter.audit(&result));

        if cli.verbose && !result.in_sync.is_empty() {
            println!("\nIn sync ({}):", result.in_sync.len());
            for path in &result.in_sync {
                println!("  = {path}");
            }
        }

        Ok(())
    }
}
