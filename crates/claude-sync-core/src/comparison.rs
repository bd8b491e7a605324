//! File comparison, diff generation, and timestamp checks
//!
//! This module provides read-only analysis of files to determine:
//! - Content identity via SHA-256 hashing or byte comparison
//! - Which file is newer via timestamp comparison
//! - Visual diffs for conflicting files and skill directories

mod diff;
mod directory;
mod hash;
mod timestamp;

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub use diff::DiffGenerator;
pub use directory::{DirectoryComparator, DirectoryComparison};
pub use hash::{FileHash, FileHasher};
pub use timestamp::TimestampComparator;

use crate::error::Result;

/// How file contents are compared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonStrategy {
    /// Compare SHA-256 digests
    #[default]
    Hash,
    /// Compare sizes, then raw bytes
    Bytes,
}

/// Result of comparing a source path with its destination counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonResult {
    /// Both exist with identical content
    Identical,
    /// Only the source exists
    SourceOnly,
    /// Only the destination exists
    DestinationOnly,
    /// Both exist with different content
    Different,
}

/// Content comparator configured with a single strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentComparator {
    strategy: ComparisonStrategy,
}

impl ContentComparator {
    /// Create a comparator using the given strategy
    #[must_use]
    pub const fn new(strategy: ComparisonStrategy) -> Self {
        Self { strategy }
    }

    /// Strategy in use
    #[must_use]
    pub const fn strategy(&self) -> ComparisonStrategy {
        self.strategy
    }

    /// Whether two files have byte-identical content
    ///
    /// Modification times are never consulted.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read.
    pub fn files_are_identical(&self, a: &Path, b: &Path) -> Result<bool> {
        match self.strategy {
            ComparisonStrategy::Hash => Ok(FileHasher::hash(a)? == FileHasher::hash(b)?),
            ComparisonStrategy::Bytes => Self::bytes_equal(a, b),
        }
    }

    /// Classify a source/destination pair
    ///
    /// # Errors
    ///
    /// Returns an error if neither path exists or file I/O fails.
    pub fn compare(&self, source: &Path, destination: &Path) -> Result<ComparisonResult> {
        match (source.exists(), destination.exists()) {
            (false, false) => anyhow::bail!(
                "Neither source nor destination file exists: source={}, dest={}",
                source.display(),
                destination.display()
            ),
            (true, false) => Ok(ComparisonResult::SourceOnly),
            (false, true) => Ok(ComparisonResult::DestinationOnly),
            (true, true) => {
                if self.files_are_identical(source, destination)? {
                    Ok(ComparisonResult::Identical)
                } else {
                    Ok(ComparisonResult::Different)
                }
            }
        }
    }

    fn bytes_equal(a: &Path, b: &Path) -> Result<bool> {
        let len_a = fs::metadata(a)
            .with_context(|| format!("Failed to read metadata for: {}", a.display()))?
            .len();
        let len_b = fs::metadata(b)
            .with_context(|| format!("Failed to read metadata for: {}", b.display()))?
            .len();
        if len_a != len_b {
            return Ok(false);
        }

        let mut reader_a = BufReader::new(
            File::open(a).with_context(|| format!("Failed to open file: {}", a.display()))?,
        );
        let mut reader_b = BufReader::new(
            File::open(b).with_context(|| format!("Failed to open file: {}", b.display()))?,
        );
        let mut buf_a = [0u8; 8192];
        let mut buf_b = [0u8; 8192];

        loop {
            let read_a = Self::fill(&mut reader_a, &mut buf_a)
                .with_context(|| format!("Failed to read file: {}", a.display()))?;
            let read_b = Self::fill(&mut reader_b, &mut buf_b)
                .with_context(|| format!("Failed to read file: {}", b.display()))?;

            if read_a != read_b || buf_a[..read_a] != buf_b[..read_b] {
                return Ok(false);
            }
            if read_a == 0 {
                return Ok(true);
            }
        }
    }

    /// Read until the buffer is full or EOF, so both sides advance in lockstep
    fn fill(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match reader.read(&mut buf[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        Ok(filled)
    }
}
