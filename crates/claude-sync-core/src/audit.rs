//! Read-only comparison of the project and global roots
//!
//! Every scanned relative path lands in exactly one of the four sets of an
//! [`AuditResult`], or in `errors` when it could not be compared.

use std::collections::BTreeSet;

use crate::Roots;
use crate::category::Category;
use crate::comparison::{ComparisonStrategy, ContentComparator};
use crate::error::Result;
use crate::scanner::Scanner;

/// Classification of both roots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditResult {
    /// Present in both with identical content
    pub in_sync: BTreeSet<String>,
    /// Present only in the project root
    pub project_only: BTreeSet<String>,
    /// Present only in the global root
    pub global_only: BTreeSet<String>,
    /// Present in both with different content
    pub conflicts: BTreeSet<String>,
    /// Scan and comparison failures
    pub errors: Vec<String>,
}

impl AuditResult {
    /// Number of classified paths
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.in_sync.len() + self.project_only.len() + self.global_only.len() + self.conflicts.len()
    }

    /// Whether nothing differs between the roots
    #[must_use]
    pub fn is_in_sync(&self) -> bool {
        self.project_only.is_empty() && self.global_only.is_empty() && self.conflicts.is_empty()
    }

    /// Classified paths belonging to `category`, as (in sync, project only,
    /// global only, conflicts) counts
    #[must_use]
    pub fn category_counts(&self, category: Category) -> (usize, usize, usize, usize) {
        let prefix = format!("{}/", category.dir_name());
        let count = |set: &BTreeSet<String>| set.iter().filter(|p| p.starts_with(&prefix)).count();

        (
            count(&self.in_sync),
            count(&self.project_only),
            count(&self.global_only),
            count(&self.conflicts),
        )
    }
}

/// Compares the two roots without touching them
pub struct AuditManager {
    roots: Roots,
    scanner: Scanner,
    comparator: ContentComparator,
}

impl AuditManager {
    /// Create an audit manager
    #[must_use]
    pub const fn new(roots: Roots, scanner: Scanner, strategy: ComparisonStrategy) -> Self {
        Self {
            roots,
            scanner,
            comparator: ContentComparator::new(strategy),
        }
    }

    /// Audit every category
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingRoot`](crate::SyncError::MissingRoot) if
    /// either root does not exist. Other failures are recorded in the result.
    pub fn audit(&self) -> Result<AuditResult> {
        self.audit_categories(&Category::ALL)
    }

    /// Audit the given categories
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MissingRoot`](crate::SyncError::MissingRoot) if
    /// either root does not exist. Other failures are recorded in the result.
    pub fn audit_categories(&self, categories: &[Category]) -> Result<AuditResult> {
        self.roots.ensure_exist()?;

        let mut result = AuditResult::default();
        for &category in categories {
            self.audit_category(category, &mut result);
        }

        tracing::debug!(
            in_sync = result.in_sync.len(),
            project_only = result.project_only.len(),
            global_only = result.global_only.len(),
            conflicts = result.conflicts.len(),
            errors = result.errors.len(),
            "audit complete"
        );
        Ok(result)
    }

    fn audit_category(&self, category: Category, result: &mut AuditResult) {
        let project = match self.scanner.scan_entries(&self.roots.project, category) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(%category, "project scan failed: {e:#}");
                result.errors.push(format!("{category} (project): {e:#}"));
                return;
            }
        };
        let global = match self.scanner.scan_entries(&self.roots.global, category) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(%category, "global scan failed: {e:#}");
                result.errors.push(format!("{category} (global): {e:#}"));
                return;
            }
        };

        for (rel_path, project_path) in &project {
            let Some(global_path) = global.get(rel_path) else {
                result.project_only.insert(rel_path.clone());
                continue;
            };

            match self.comparator.files_are_identical(project_path, global_path) {
                Ok(true) => {
                    result.in_sync.insert(rel_path.clone());
                }
                Ok(false) => {
                    result.conflicts.insert(rel_path.clone());
                }
                Err(e) => {
                    tracing::warn!(path = %rel_path, "comparison failed: {e:#}");
                    result.errors.push(format!("{rel_path}: {e:#}"));
                }
            }
        }

        result.global_only.extend(
            global
                .keys()
                .filter(|rel_path| !project.contains_key(*rel_path))
                .cloned(),
        );
    }
}
