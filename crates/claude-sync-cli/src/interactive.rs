//! Interactive prompting for conflict resolution

use std::io;

use anyhow::Result;
use chrono::{DateTime, Local};
use claude_sync_core::SyncError;
use claude_sync_core::resolver::FileMeta;
use claude_sync_core::{ConflictAction, ConflictDetails, ConflictPrompter};
use dialoguer::console::Term;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Select};

/// Terminal prompter backed by dialoguer menus
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    /// Create a new interactive prompter
    #[must_use]
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConflictPrompter for DialoguerPrompter {
    fn present(&mut self, details: &ConflictDetails) {
        println!("\n{}", describe_conflict(details));
    }

    fn choose(&mut self, details: &ConflictDetails) -> Result<ConflictAction> {
        let labels: Vec<&str> = ConflictAction::ALL.iter().map(|action| action.label()).collect();

        let selection = Select::with_theme(&self.theme)
            .with_prompt(format!("Resolve {}", details.rel_path))
            .items(&labels)
            .default(0)
            .interact_on_opt(&Term::stderr())
            .map_err(cancellation)?;

        selection
            .and_then(|idx| ConflictAction::ALL.get(idx).copied())
            .ok_or_else(|| SyncError::Cancelled.into())
    }

    fn show_diff(&mut self, _details: &ConflictDetails, diff: &str) {
        println!("\n{diff}");
    }
}

/// Ask whether `prompts/` joins this sync
///
/// # Errors
///
/// Returns [`SyncError::Cancelled`] if the prompt is dismissed.
pub fn confirm_include_prompts() -> Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Include prompts/ in this sync?")
        .default(false)
        .interact_on_opt(&Term::stderr())
        .map_err(cancellation)?
        .ok_or_else(|| SyncError::Cancelled.into())
}

/// Map an interrupted prompt to [`SyncError::Cancelled`]
fn cancellation(err: dialoguer::Error) -> anyhow::Error {
    let dialoguer::Error::IO(io_err) = err;
    if io_err.kind() == io::ErrorKind::Interrupted {
        SyncError::Cancelled.into()
    } else {
        anyhow::Error::new(io_err).context("Failed to read user input")
    }
}

/// Both sides of a conflict, one line each
fn describe_conflict(details: &ConflictDetails) -> String {
    let kind = if details.is_directory() { "📁" } else { "📄" };
    let mut lines = vec![
        format!("{kind} Conflict: {}", details.rel_path),
        describe_side("Project", details.project.as_ref()),
        describe_side("Global ", details.global.as_ref()),
    ];
    lines.extend(details.metadata_errors.iter().map(|e| format!("  Warning: {e}")));
    lines.join("\n")
}

fn describe_side(label: &str, meta: Option<&FileMeta>) -> String {
    match meta {
        Some(meta) => {
            let modified: DateTime<Local> = meta.modified.into();
            format!(
                "  {label}: {} bytes, modified {}",
                meta.size,
                modified.format("%Y-%m-%d %H:%M:%S")
            )
        }
        None => format!("  {label}: metadata unavailable"),
    }
}
