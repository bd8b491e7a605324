//! Structural diff of the project and global `settings.json` documents
//!
//! Both documents must load for any comparison to happen; a missing or
//! malformed document yields empty findings and a recommendation saying
//! why.

mod types;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

pub use types::{
    HookCommand, HookFinding, HookMatcher, PermissionFinding, Permissions, PluginFinding, Settings,
    SettingsAnalysis,
};

use crate::Roots;
use crate::error::Result;

/// File name of the settings document inside a root
pub const SETTINGS_FILE: &str = "settings.json";

/// Unique-permission count above which promotion is suggested
pub const PROMOTION_THRESHOLD: usize = 5;

/// Compares two settings documents
#[derive(Debug, Clone)]
pub struct SettingsAnalyzer {
    project_path: PathBuf,
    global_path: PathBuf,
}

impl SettingsAnalyzer {
    /// Analyzer for `<root>/settings.json` of both roots
    #[must_use]
    pub fn new(roots: &Roots) -> Self {
        Self::from_paths(roots.project.join(SETTINGS_FILE), roots.global.join(SETTINGS_FILE))
    }

    /// Analyzer for explicit document paths
    #[must_use]
    pub fn from_paths(project_path: impl Into<PathBuf>, global_path: impl Into<PathBuf>) -> Self {
        Self {
            project_path: project_path.into(),
            global_path: global_path.into(),
        }
    }

    /// Compare the two documents
    #[must_use]
    pub fn analyze(&self) -> SettingsAnalysis {
        let project = Self::load("Project", &self.project_path);
        let global = Self::load("Global", &self.global_path);

        let (project, global) = match (project, global) {
            (Ok(project), Ok(global)) => (project, global),
            (project, global) => {
                let recommendations = [project.err(), global.err()].into_iter().flatten().collect();
                return SettingsAnalysis {
                    recommendations,
                    ..SettingsAnalysis::default()
                };
            }
        };

        Self::compare(&project, &global)
    }

    /// Compare two parsed documents
    #[must_use]
    pub fn compare(project: &Settings, global: &Settings) -> SettingsAnalysis {
        let mut analysis = SettingsAnalysis {
            hooks: Self::compare_hooks(project, global),
            permissions: Self::compare_permissions(project, global),
            plugins: Self::compare_plugins(project, global),
            recommendations: Vec::new(),
        };
        analysis.recommendations = recommendations(&analysis);

        tracing::debug!(
            hooks = analysis.hooks.len(),
            permissions = analysis.permissions.len(),
            plugins = analysis.plugins.len(),
            "settings compared"
        );
        analysis
    }

    /// Per trigger type: count mismatches and one-sided commands
    #[must_use]
    pub fn compare_hooks(project: &Settings, global: &Settings) -> Vec<HookFinding> {
        let triggers: BTreeSet<&String> = project.hooks.keys().chain(global.hooks.keys()).collect();
        let mut findings = Vec::new();

        for trigger in triggers {
            let project_count = project.hook_count(trigger);
            let global_count = global.hook_count(trigger);
            if project_count != global_count {
                findings.push(HookFinding::CountMismatch {
                    trigger: trigger.clone(),
                    project: project_count,
                    global: global_count,
                });
            }

            let project_commands = project.hook_commands(trigger);
            let global_commands = global.hook_commands(trigger);

            let project_only: BTreeSet<String> =
                project_commands.difference(&global_commands).cloned().collect();
            if !project_only.is_empty() {
                findings.push(HookFinding::ProjectOnlyCommands {
                    trigger: trigger.clone(),
                    commands: project_only,
                });
            }

            let global_only: BTreeSet<String> =
                global_commands.difference(&project_commands).cloned().collect();
            if !global_only.is_empty() {
                findings.push(HookFinding::GlobalOnlyCommands {
                    trigger: trigger.clone(),
                    commands: global_only,
                });
            }
        }

        findings
    }

    /// Allow-list differences in both directions, plus a deny-list flag
    ///
    /// Lists are compared as sets; order and duplicates do not matter.
    #[must_use]
    pub fn compare_permissions(project: &Settings, global: &Settings) -> Vec<PermissionFinding> {
        let project_allow: BTreeSet<&String> = project.permissions.allow.iter().collect();
        let global_allow: BTreeSet<&String> = global.permissions.allow.iter().collect();
        let mut findings = Vec::new();

        let unique_to_project: BTreeSet<String> = project_allow
            .difference(&global_allow)
            .map(|p| (*p).clone())
            .collect();
        if !unique_to_project.is_empty() {
            findings.push(PermissionFinding::UniqueToProject(unique_to_project));
        }

        let unique_to_global: BTreeSet<String> = global_allow
            .difference(&project_allow)
            .map(|p| (*p).clone())
            .collect();
        if !unique_to_global.is_empty() {
            findings.push(PermissionFinding::UniqueToGlobal(unique_to_global));
        }

        let project_deny: BTreeSet<&String> = project.permissions.deny.iter().collect();
        let global_deny: BTreeSet<&String> = global.permissions.deny.iter().collect();
        if project_deny != global_deny {
            findings.push(PermissionFinding::DenyListsDiffer);
        }

        findings
    }

    /// Plugins whose enabled state disagrees; a missing key counts as disabled
    #[must_use]
    pub fn compare_plugins(project: &Settings, global: &Settings) -> Vec<PluginFinding> {
        let names: BTreeSet<&String> = project
            .enabled_plugins
            .keys()
            .chain(global.enabled_plugins.keys())
            .collect();

        names
            .into_iter()
            .filter_map(|name| {
                let project_enabled = project.enabled_plugins.get(name).copied().unwrap_or(false);
                let global_enabled = global.enabled_plugins.get(name).copied().unwrap_or(false);
                (project_enabled != global_enabled).then(|| PluginFinding {
                    name: name.clone(),
                    project: project_enabled,
                    global: global_enabled,
                })
            })
            .collect()
    }

    /// Load a document, or explain why it cannot be compared
    fn load(label: &str, path: &Path) -> std::result::Result<Settings, String> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "settings file not found");
            return Err(format!(
                "{label} settings not found at {}; create it to compare settings",
                path.display()
            ));
        }

        read_settings(path).map_err(|e| {
            tracing::warn!(path = %path.display(), "unreadable settings: {e:#}");
            format!(
                "{label} settings at {} could not be parsed ({e:#}); fix the JSON to compare settings",
                path.display()
            )
        })
    }
}

fn read_settings(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings file: {}", path.display()))
}

fn recommendations(analysis: &SettingsAnalysis) -> Vec<String> {
    let mut out = Vec::new();

    let triggers: BTreeSet<&str> = analysis.hooks.iter().map(HookFinding::trigger).collect();
    if !triggers.is_empty() {
        out.push(format!(
            "Hooks differ for {} trigger type(s) ({}); move hooks every project needs into global settings",
            triggers.len(),
            triggers.into_iter().collect::<Vec<_>>().join(", ")
        ));
    }

    for finding in &analysis.permissions {
        match finding {
            PermissionFinding::UniqueToProject(perms) if perms.len() > PROMOTION_THRESHOLD => {
                out.push(format!(
                    "{} permissions are allowed only in the project; consider promoting them to global settings",
                    perms.len()
                ));
            }
            PermissionFinding::UniqueToProject(perms) => out.push(format!(
                "Project-only permissions: {}",
                join(perms)
            )),
            PermissionFinding::UniqueToGlobal(perms) if perms.len() > PROMOTION_THRESHOLD => {
                out.push(format!(
                    "{} permissions are allowed only globally; consider scoping them to project settings",
                    perms.len()
                ));
            }
            PermissionFinding::UniqueToGlobal(perms) => out.push(format!(
                "Global-only permissions: {}",
                join(perms)
            )),
            PermissionFinding::DenyListsDiffer => out.push(
                "Deny lists differ; check that every restriction is intended on both sides".to_string(),
            ),
        }
    }

    if !analysis.plugins.is_empty() {
        let names: Vec<&str> = analysis.plugins.iter().map(|p| p.name.as_str()).collect();
        out.push(format!(
            "{} plugin(s) enabled on one side only: {}",
            names.len(),
            names.join(", ")
        ));
    }

    if out.is_empty() {
        out.push("Project and global settings are consistent".to_string());
    }

    out
}

fn join(items: &BTreeSet<String>) -> String {
    items.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
