//! Content digests
//!
//! Digests are bare lowercase hex strings so they can be compared textually
//! with the digests published in a manifest.

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::str::FromStr;

/// Hash function used to fingerprint file contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// MD5, the format written by the manifest publisher (32 hex chars)
    #[default]
    Md5,
    /// SHA-256 (64 hex chars)
    Sha256,
}

impl DigestAlgorithm {
    /// Length of the hex digest this algorithm produces.
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha256 => 64,
        }
    }

    /// Compute the digest of an in-memory buffer.
    pub fn compute_bytes(&self, data: &[u8]) -> String {
        match self {
            Self::Md5 => format!("{:x}", Md5::digest(data)),
            Self::Sha256 => format!("{:x}", Sha256::digest(data)),
        }
    }

    /// Compute the digest of a file's contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn compute_file(&self, path: &Path) -> std::io::Result<String> {
        let content = std::fs::read(path)?;
        Ok(self.compute_bytes(&content))
    }
}

impl FromStr for DigestAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha256" => Ok(Self::Sha256),
            other => Err(format!("unknown digest algorithm: {}", other)),
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Md5 => write!(f, "md5"),
            Self::Sha256 => write!(f, "sha256"),
        }
    }
}

/// Check that `s` looks like a digest: non-empty lowercase hex.
pub fn is_hex_digest(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
