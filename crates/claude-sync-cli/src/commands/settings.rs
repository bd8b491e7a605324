//! Settings command - structural diff of the two settings.json documents

use anyhow::Result;
use claude_sync_core::{Reporter, SettingsAnalyzer};

use super::Workspace;

pub struct Settings;

impl Settings {
    /// Analyze both settings documents and print findings and recommendations
    pub fn execute(workspace: &Workspace, reporter: Reporter) -> Result<()> {
        workspace.roots.ensure_exist()?;

        let analysis = SettingsAnalyzer::new(&workspace.roots).analyze();
        tracing::debug!(differences = analysis.has_differences(), "settings analyzed");

        print!("{}", reporter.settings(&analysis));
        Ok(())
    }
}
