//! SHA-256 digests of file contents

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use anyhow::Context;
use sha2::{Digest, Sha256};

use crate::error::Result;

/// Raw SHA-256 digest
pub type FileHash = [u8; 32];

/// Read buffer size; files are hashed in chunks of this size
const CHUNK_SIZE: usize = 8 * 1024;

/// Streaming file hasher
pub struct FileHasher;

impl FileHasher {
    /// Digest a file without loading it into memory
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn hash(path: &Path) -> Result<FileHash> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open file for hashing: {}", path.display()))?;

        let mut reader = BufReader::with_capacity(CHUNK_SIZE, file);
        let mut hasher = Sha256::new();
        io::copy(&mut reader, &mut hasher)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(hasher.finalize().into())
    }

    /// Lowercase hex form, as printed by `sha256sum`
    #[must_use]
    pub fn to_hex(hash: &FileHash) -> String {
        let mut hex = String::with_capacity(hash.len() * 2);
        for byte in hash {
            write!(hex, "{byte:02x}").expect("Writing to String should never fail");
        }
        hex
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_digest_depends_only_on_content() {
        let tmp = TempDir::new().unwrap();
        let agent = tmp.path().join("reviewer.md");
        let copy = tmp.path().join("reviewer-copy.md");
        let edited = tmp.path().join("reviewer-edited.md");

        fs::write(&agent, "# Reviewer\n").unwrap();
        fs::write(&copy, "# Reviewer\n").unwrap();
        fs::write(&edited, "# Reviewer\n\nBe strict.\n").unwrap();

        let digest = FileHasher::hash(&agent).unwrap();
        assert_eq!(digest, FileHasher::hash(&copy).unwrap());
        assert_ne!(digest, FileHasher::hash(&edited).unwrap());
    }

    #[test]
    fn test_known_digests() {
        let tmp = TempDir::new().unwrap();
        let empty = tmp.path().join("empty");
        let abc = tmp.path().join("abc");
        fs::write(&empty, "").unwrap();
        fs::write(&abc, "abc").unwrap();

        assert_eq!(
            FileHasher::to_hex(&FileHasher::hash(&empty).unwrap()),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            FileHasher::to_hex(&FileHasher::hash(&abc).unwrap()),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_multi_chunk_file_differs_in_last_byte() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.bin");
        let b = tmp.path().join("b.bin");

        let mut content = vec![7u8; CHUNK_SIZE * 3 + 1];
        fs::write(&a, &content).unwrap();
        if let Some(last) = content.last_mut() {
            *last = 8;
        }
        fs::write(&b, &content).unwrap();

        assert_ne!(FileHasher::hash(&a).unwrap(), FileHasher::hash(&b).unwrap());
    }

    #[test]
    fn test_missing_file_has_context() {
        let tmp = TempDir::new().unwrap();
        let err = FileHasher::hash(&tmp.path().join("gone.md")).unwrap_err();

        assert!(err.to_string().contains("Failed to open file for hashing"));
    }
}
