//! Unified line diffs with color-coded output

use std::fmt::Write;
use std::fs;
use std::path::Path;

use anyhow::Context;
use console::Style;
use similar::{ChangeTag, TextDiff};

use super::directory::DirectoryComparison;
use crate::error::Result;

/// Lines of unchanged context around each hunk
const DIFF_CONTEXT_LINES: usize = 3;

/// Diff generator for creating visual diffs
///
/// Diffs read from `destination` to `source`: lines only in the source are
/// insertions, lines only in the destination are deletions.
pub struct DiffGenerator;

impl DiffGenerator {
    /// Generate a color-coded unified diff between two files
    ///
    /// # Errors
    ///
    /// Returns an error if files cannot be read.
    pub fn generate(source: &Path, destination: &Path) -> Result<String> {
        let (source_content, dest_content) = Self::read_pair(source, destination)?;
        Ok(Self::generate_from_content(
            &source_content,
            &dest_content,
            source,
            destination,
            true,
        ))
    }

    /// Generate a unified diff from string contents
    #[must_use]
    pub fn generate_from_content(
        source_content: &str,
        dest_content: &str,
        source_path: &Path,
        dest_path: &Path,
        styled: bool,
    ) -> String {
        let header = Style::new().bold().force_styling(styled);
        let deleted = Style::new().red().force_styling(styled);
        let inserted = Style::new().green().force_styling(styled);

        let diff = TextDiff::from_lines(dest_content, source_content);
        let mut output = String::new();

        writeln!(output, "{}", header.apply_to(format!("--- {}", dest_path.display())))
            .expect("Writing to String should never fail");
        writeln!(output, "{}", header.apply_to(format!("+++ {}", source_path.display())))
            .expect("Writing to String should never fail");

        for (idx, group) in diff.grouped_ops(DIFF_CONTEXT_LINES).iter().enumerate() {
            if idx > 0 {
                output.push_str("...\n");
            }

            for op in group {
                for change in diff.iter_changes(op) {
                    let line = change.value().trim_end_matches('\n');
                    match change.tag() {
                        ChangeTag::Delete => writeln!(output, "{}", deleted.apply_to(format!("-{line}"))),
                        ChangeTag::Insert => writeln!(output, "{}", inserted.apply_to(format!("+{line}"))),
                        ChangeTag::Equal => writeln!(output, " {line}"),
                    }
                    .expect("Writing to String should never fail");
                }
            }
        }

        output
    }

    /// Generate a summary diff for a skill directory
    ///
    /// Lists files only in the source, modified files with line counts, and
    /// files only in the destination.
    #[must_use]
    pub fn generate_directory_summary(
        comparison: &DirectoryComparison,
        source_dir: &Path,
        dest_dir: &Path,
        name: &str,
    ) -> String {
        let bold = Style::new().bold();
        let green = Style::new().green();
        let yellow = Style::new().yellow();
        let red = Style::new().red();

        let mut output = String::new();
        writeln!(output, "{}\n", bold.apply_to(format!("Directory diff: {name}")))
            .expect("Writing to String should never fail");

        if !comparison.added.is_empty() {
            writeln!(output, "{}", green.apply_to("Only in source:"))
                .expect("Writing to String should never fail");
            for file in &comparison.added {
                writeln!(output, "  {} {}", green.apply_to("+"), file.display())
                    .expect("Writing to String should never fail");
            }
            output.push('\n');
        }

        if !comparison.modified.is_empty() {
            writeln!(output, "{}", yellow.apply_to("Modified:"))
                .expect("Writing to String should never fail");
            for file in &comparison.modified {
                let lines_info = Self::count_changes(&source_dir.join(file), &dest_dir.join(file))
                    .map(|(added, removed)| format!(" (+{added} -{removed} lines)"))
                    .unwrap_or_default();
                writeln!(output, "  {} {}{lines_info}", yellow.apply_to("~"), file.display())
                    .expect("Writing to String should never fail");
            }
            output.push('\n');
        }

        if !comparison.removed.is_empty() {
            writeln!(output, "{}", red.apply_to("Only in destination:"))
                .expect("Writing to String should never fail");
            for file in &comparison.removed {
                writeln!(output, "  {} {}", red.apply_to("-"), file.display())
                    .expect("Writing to String should never fail");
            }
            output.push('\n');
        }

        if comparison.is_identical() {
            writeln!(output, "{}", green.apply_to("Directories are identical"))
                .expect("Writing to String should never fail");
        }

        output
    }

    /// Count added and removed lines in a file diff
    fn count_changes(source: &Path, destination: &Path) -> Result<(usize, usize)> {
        let (source_content, dest_content) = Self::read_pair(source, destination)?;
        let diff = TextDiff::from_lines(&dest_content, &source_content);

        Ok(diff
            .iter_all_changes()
            .fold((0, 0), |(added, removed), change| match change.tag() {
                ChangeTag::Insert => (added + 1, removed),
                ChangeTag::Delete => (added, removed + 1),
                ChangeTag::Equal => (added, removed),
            }))
    }

    fn read_pair(source: &Path, destination: &Path) -> Result<(String, String)> {
        let source_content = fs::read_to_string(source)
            .with_context(|| format!("Failed to read source file: {}", source.display()))?;
        let dest_content = fs::read_to_string(destination).with_context(|| {
            format!("Failed to read destination file: {}", destination.display())
        })?;
        Ok((source_content, dest_content))
    }
}
