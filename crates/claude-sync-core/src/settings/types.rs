//! Settings document and analysis types

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

/// The parts of a `settings.json` document that are compared
///
/// Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Settings {
    /// Trigger type → matcher groups
    #[serde(default)]
    pub hooks: BTreeMap<String, Vec<HookMatcher>>,

    /// Allow and deny lists
    #[serde(default)]
    pub permissions: Permissions,

    /// Plugin name → enabled
    #[serde(default, rename = "enabledPlugins")]
    pub enabled_plugins: BTreeMap<String, bool>,
}

/// A group of hook commands sharing a matcher
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HookMatcher {
    /// Tool name pattern the hooks apply to
    #[serde(default)]
    pub matcher: Option<String>,

    /// Commands run by this group
    #[serde(default)]
    pub hooks: Vec<HookCommand>,
}

/// A single hook command
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HookCommand {
    /// Hook type (usually `command`)
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// Shell command or script path
    #[serde(default)]
    pub command: Option<String>,

    /// Timeout in seconds
    #[serde(default)]
    pub timeout: Option<f64>,
}

/// Permission lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Permissions {
    /// Allowed tool patterns
    #[serde(default)]
    pub allow: Vec<String>,

    /// Denied tool patterns
    #[serde(default)]
    pub deny: Vec<String>,
}

impl Settings {
    /// Number of hook commands registered for a trigger type
    #[must_use]
    pub fn hook_count(&self, trigger: &str) -> usize {
        self.hooks
            .get(trigger)
            .map_or(0, |groups| groups.iter().map(|g| g.hooks.len()).sum())
    }

    /// Distinct commands registered for a trigger type
    #[must_use]
    pub fn hook_commands(&self, trigger: &str) -> BTreeSet<String> {
        self.hooks
            .get(trigger)
            .into_iter()
            .flatten()
            .flat_map(|group| &group.hooks)
            .filter_map(|hook| hook.command.clone())
            .collect()
    }
}

/// A difference in hook configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookFinding {
    /// Different number of commands for a trigger type
    CountMismatch {
        /// Trigger type (`PreToolUse`, ...)
        trigger: String,
        /// Commands in the project document
        project: usize,
        /// Commands in the global document
        global: usize,
    },
    /// Commands only the project registers
    ProjectOnlyCommands {
        /// Trigger type
        trigger: String,
        /// The commands
        commands: BTreeSet<String>,
    },
    /// Commands only the global document registers
    GlobalOnlyCommands {
        /// Trigger type
        trigger: String,
        /// The commands
        commands: BTreeSet<String>,
    },
}

impl HookFinding {
    /// Trigger type the finding is about
    #[must_use]
    pub fn trigger(&self) -> &str {
        match self {
            Self::CountMismatch { trigger, .. }
            | Self::ProjectOnlyCommands { trigger, .. }
            | Self::GlobalOnlyCommands { trigger, .. } => trigger,
        }
    }
}

/// A difference in permissions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionFinding {
    /// Allowed only by the project
    UniqueToProject(BTreeSet<String>),
    /// Allowed only globally
    UniqueToGlobal(BTreeSet<String>),
    /// The deny lists are not the same
    DenyListsDiffer,
}

/// A plugin whose enabled state disagrees
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginFinding {
    /// Plugin name
    pub name: String,
    /// Enabled in the project document
    pub project: bool,
    /// Enabled in the global document
    pub global: bool,
}

/// Result of comparing the two settings documents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsAnalysis {
    /// Hook differences
    pub hooks: Vec<HookFinding>,
    /// Permission differences
    pub permissions: Vec<PermissionFinding>,
    /// Plugin differences
    pub plugins: Vec<PluginFinding>,
    /// Suggested follow-ups
    pub recommendations: Vec<String>,
}

impl SettingsAnalysis {
    /// Whether any structural difference was found
    #[must_use]
    pub fn has_differences(&self) -> bool {
        !(self.hooks.is_empty() && self.permissions.is_empty() && self.plugins.is_empty())
    }
}
