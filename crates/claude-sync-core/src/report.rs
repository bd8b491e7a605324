//! Console report rendering
//!
//! Reports are returned as strings; styling is applied only when enabled.

use std::fmt::{Display, Write};

use console::Style;

use crate::audit::AuditResult;
use crate::category::Category;
use crate::files::OperationRecord;
use crate::settings::{HookFinding, PermissionFinding, SettingsAnalysis};
use crate::sync::SyncResult;

/// Renders audit, sync and settings reports
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    styled: bool,
}

impl Reporter {
    /// Create a reporter; `styled` enables ANSI colors
    #[must_use]
    pub const fn new(styled: bool) -> Self {
        Self { styled }
    }

    fn paint(&self, style: Style, text: impl Display) -> String {
        style.force_styling(self.styled).apply_to(text).to_string()
    }

    fn heading(&self, text: impl Display) -> String {
        self.paint(Style::new().bold(), text)
    }

    fn list(&self, output: &mut String, title: &str, marker: String, items: impl ExactSizeIterator<Item = impl Display>) {
        if items.len() == 0 {
            return;
        }
        writeln!(output, "\n{} ({}):", self.heading(title), items.len())
            .expect("Writing to String should never fail");
        for item in items {
            writeln!(output, "  {marker} {item}").expect("Writing to String should never fail");
        }
    }

    /// Audit report
    #[must_use]
    pub fn audit(&self, result: &AuditResult) -> String {
        let mut output = String::new();
        writeln!(output, "{}", self.heading("=== Audit: project vs global ==="))
            .expect("Writing to String should never fail");

        for category in Category::ALL {
            let (in_sync, project_only, global_only, conflicts) = result.category_counts(category);
            if in_sync + project_only + global_only + conflicts == 0 {
                continue;
            }
            writeln!(
                output,
                "{category:<9} {in_sync} in sync, {project_only} project only, {global_only} global only, {conflicts} conflicting"
            ).expect("Writing to String should never fail");
        }

        self.list(
            &mut output,
            "Project only",
            self.paint(Style::new().green(), "+"),
            result.project_only.iter(),
        );
        self.list(
            &mut output,
            "Global only",
            self.paint(Style::new().cyan(), "-"),
            result.global_only.iter(),
        );
        self.list(
            &mut output,
            "Conflicts",
            self.paint(Style::new().yellow(), "!"),
            result.conflicts.iter(),
        );
        self.list(
            &mut output,
            "Errors",
            self.paint(Style::new().red(), "✗"),
            result.errors.iter(),
        );

        writeln!(output, "\nTotal files: {}", result.total_files())
            .expect("Writing to String should never fail");
        if result.is_in_sync() {
            writeln!(output, "Status: {}", self.paint(Style::new().green(), "✓ In sync"))
                .expect("Writing to String should never fail");
        } else {
            let differences = result.project_only.len() + result.global_only.len() + result.conflicts.len();
            writeln!(
                output,
                "Status: {}",
                self.paint(Style::new().yellow(), format!("✗ {differences} difference(s)"))
            ).expect("Writing to String should never fail");
        }

        output
    }

    /// Sync summary
    #[must_use]
    pub fn sync(&self, result: &SyncResult) -> String {
        let mut output = String::new();
        let dry_run = if result.dry_run { " [dry run]" } else { "" };
        writeln!(
            output,
            "{}",
            self.heading(format!(
                "=== Sync Summary ({}: {}){dry_run} ===",
                result.direction,
                result.direction.describe()
            ))
        ).expect("Writing to String should never fail");

        let copied_title = if result.dry_run { "Would copy" } else { "Copied" };
        self.list(
            &mut output,
            copied_title,
            self.paint(Style::new().green(), "+"),
            result.files_copied.iter(),
        );
        self.list(
            &mut output,
            "Resolved",
            self.paint(Style::new().cyan(), "~"),
            result
                .conflicts_resolved
                .iter()
                .map(|(path, resolution)| format!("{path} ({resolution})")),
        );
        self.list(
            &mut output,
            "Unresolved conflicts",
            self.paint(Style::new().yellow(), "!"),
            result.conflicts.iter(),
        );
        self.list(
            &mut output,
            "Errors",
            self.paint(Style::new().red(), "✗"),
            result.errors.iter(),
        );

        let summary = result.summary();
        writeln!(output).expect("Writing to String should never fail");
        writeln!(output, "Copied:    {}", summary.copied)
            .expect("Writing to String should never fail");
        writeln!(output, "Skipped:   {}", summary.skipped)
            .expect("Writing to String should never fail");
        writeln!(output, "Resolved:  {}", summary.resolved)
            .expect("Writing to String should never fail");
        writeln!(output, "Conflicts: {}", summary.conflicts)
            .expect("Writing to String should never fail");
        writeln!(output, "Total:     {}", summary.total)
            .expect("Writing to String should never fail");

        if result.is_success() {
            writeln!(output, "Status: {}", self.paint(Style::new().green(), "✓ Success"))
                .expect("Writing to String should never fail");
        } else {
            writeln!(
                output,
                "Status: {}",
                self.paint(Style::new().red(), "✗ Completed with errors")
            ).expect("Writing to String should never fail");
        }

        output
    }

    /// Settings analysis report
    #[must_use]
    pub fn settings(&self, analysis: &SettingsAnalysis) -> String {
        let mut output = String::new();
        writeln!(output, "{}", self.heading("=== Settings: project vs global ==="))
            .expect("Writing to String should never fail");

        if !analysis.hooks.is_empty() {
            writeln!(output, "\n{}", self.heading("Hooks"))
                .expect("Writing to String should never fail");
            for finding in &analysis.hooks {
                let line = match finding {
                    HookFinding::CountMismatch {
                        trigger,
                        project,
                        global,
                    } => format!("{trigger}: {project} hook(s) in project, {global} globally"),
                    HookFinding::ProjectOnlyCommands { trigger, commands } => format!(
                        "{trigger}: project only: {}",
                        commands.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
                    ),
                    HookFinding::GlobalOnlyCommands { trigger, commands } => format!(
                        "{trigger}: global only: {}",
                        commands.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
                    ),
                };
                writeln!(output, "  {line}").expect("Writing to String should never fail");
            }
        }

        if !analysis.permissions.is_empty() {
            writeln!(output, "\n{}", self.heading("Permissions"))
                .expect("Writing to String should never fail");
            for finding in &analysis.permissions {
                match finding {
                    PermissionFinding::UniqueToProject(perms) => {
                        writeln!(output, "  Allowed only in project ({}):", perms.len())
                            .expect("Writing to String should never fail");
                        for perm in perms {
                            writeln!(output, "    {} {perm}", self.paint(Style::new().green(), "+"))
                                .expect("Writing to String should never fail");
                        }
                    }
                    PermissionFinding::UniqueToGlobal(perms) => {
                        writeln!(output, "  Allowed only globally ({}):", perms.len())
                            .expect("Writing to String should never fail");
                        for perm in perms {
                            writeln!(output, "    {} {perm}", self.paint(Style::new().cyan(), "-"))
                                .expect("Writing to String should never fail");
                        }
                    }
                    PermissionFinding::DenyListsDiffer => {
                        writeln!(output, "  Deny lists differ")
                            .expect("Writing to String should never fail");
                    }
                }
            }
        }

        if !analysis.plugins.is_empty() {
            writeln!(output, "\n{}", self.heading("Plugins"))
                .expect("Writing to String should never fail");
            for plugin in &analysis.plugins {
                writeln!(
                    output,
                    "  {}: project {}, global {}",
                    plugin.name,
                    on_off(plugin.project),
                    on_off(plugin.global)
                ).expect("Writing to String should never fail");
            }
        }

        if !analysis.recommendations.is_empty() {
            writeln!(output, "\n{}", self.heading("Recommendations"))
                .expect("Writing to String should never fail");
            for recommendation in &analysis.recommendations {
                writeln!(output, "  • {recommendation}")
                    .expect("Writing to String should never fail");
            }
        }

        output
    }

    /// Operations log, one line per record
    #[must_use]
    pub fn operations(&self, records: &[OperationRecord]) -> String {
        let mut output = String::new();
        if records.is_empty() {
            return output;
        }

        writeln!(output, "\n{} ({}):", self.heading("Operations"), records.len())
            .expect("Writing to String should never fail");
        for record in records {
            let marker = if record.status.is_success() {
                self.paint(Style::new().green(), "✓")
            } else {
                self.paint(Style::new().red(), "✗")
            };
            writeln!(output, "  {marker} {record}").expect("Writing to String should never fail");
        }
        output
    }
}

const fn on_off(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}
