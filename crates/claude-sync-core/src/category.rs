//! Configuration categories
//!
//! Each root holds up to five category subdirectories. `skills/` members are
//! whole directories (each marked by a `SKILL.md`) that are copied as a unit;
//! every other category is a flat set of files.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Marker file identifying a skill directory
pub const SKILL_MARKER: &str = "SKILL.md";

/// How the members of a category are laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    /// Individual files directly under the category directory
    FlatFiles,
    /// Subdirectories synced atomically
    WholeDirectory,
}

/// One of the five configuration groupings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Agent definitions (`agents/*.md`)
    Agents,
    /// Slash commands (`commands/*.md`)
    Commands,
    /// Skill directories (`skills/*/SKILL.md`)
    Skills,
    /// Prompt files (`prompts/*.md`), project-private by default
    Prompts,
    /// Hook definitions (`hooks/*`)
    Hooks,
}

impl Category {
    /// Every category, in scan order
    pub const ALL: [Self; 5] = [
        Self::Agents,
        Self::Commands,
        Self::Skills,
        Self::Prompts,
        Self::Hooks,
    ];

    /// Categories synced when none are requested explicitly
    pub const SYNC_DEFAULT: [Self; 4] = [Self::Agents, Self::Commands, Self::Skills, Self::Hooks];

    /// Directory name of this category inside a root
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Agents => "agents",
            Self::Commands => "commands",
            Self::Skills => "skills",
            Self::Prompts => "prompts",
            Self::Hooks => "hooks",
        }
    }

    /// Layout of this category's members
    #[must_use]
    pub const fn kind(self) -> CategoryKind {
        match self {
            Self::Skills => CategoryKind::WholeDirectory,
            Self::Agents | Self::Commands | Self::Prompts | Self::Hooks => CategoryKind::FlatFiles,
        }
    }

    /// Category directory inside the given root
    #[must_use]
    pub fn path_in(self, root: &Path) -> PathBuf {
        root.join(self.dir_name())
    }

    /// Relative path of a member (`commands/a.md`, `skills/foo`)
    #[must_use]
    pub fn relative(self, member: &str) -> String {
        format!("{}/{member}", self.dir_name())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.dir_name())
    }
}
