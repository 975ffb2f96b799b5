//! Manifest parsing and serialization
//!
//! The wire form is UTF-8 text:
//!
//! ```text
//! <revision>
//! <path> <digest>
//! <path> <digest>
//! ```
//!
//! Blank lines and lines starting with `#` are tolerated and dropped. Paths
//! cannot contain spaces.

use std::collections::HashSet;
use std::str::FromStr;

use modsync_fs::checksum::is_hex_digest;
use modsync_fs::{DigestAlgorithm, NormalizedPath};

use crate::{Error, Result};

/// One `(path, digest)` pair of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Path relative to the sync root, as published
    pub path: String,
    /// Expected lowercase hex digest of the file contents
    pub digest: String,
}

impl ManifestEntry {
    pub fn new(path: impl Into<String>, digest: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            digest: digest.into(),
        }
    }

    /// The entry path with separators normalized.
    pub fn normalized_path(&self) -> NormalizedPath {
        NormalizedPath::new(&self.path)
    }
}

/// A revision number plus the ordered entries published for it.
///
/// Entry order is the processing order used by the sync engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Manifest {
    pub revision: u64,
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new(revision: u64, entries: Vec<ManifestEntry>) -> Self {
        Self { revision, entries }
    }

    /// Revision 0 with no entries, the state before anything was applied.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse manifest text with MD5 digests.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with(text, DigestAlgorithm::default())
    }

    /// Parse manifest text whose digests were produced by `algorithm`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Format`] with the 1-based line number when the first
    /// line is not a plain decimal number, when an entry line does not split
    /// into exactly two tokens, when a digest is not lowercase hex of the
    /// algorithm's length, or when a path appears twice.
    pub fn parse_with(text: &str, algorithm: DigestAlgorithm) -> Result<Self> {
        let mut lines = text.split('\n').map(|l| l.trim_end_matches('\r'));

        let first = lines.next().unwrap_or_default();
        if text.trim().is_empty() {
            return Err(Error::format(1, "empty manifest, expected a revision number"));
        }
        let digits = first.trim();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::format(1, format!("invalid revision {:?}", first)));
        }
        let revision = digits
            .parse::<u64>()
            .map_err(|_| Error::format(1, format!("revision out of range {:?}", first)))?;

        let mut entries = Vec::new();
        let mut seen = HashSet::new();

        for (idx, line) in lines.enumerate() {
            let line_no = idx + 2;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            let [path, digest] = tokens.as_slice() else {
                return Err(Error::format(
                    line_no,
                    format!("expected \"<path> <digest>\", found {:?}", line),
                ));
            };

            if !is_hex_digest(digest) {
                return Err(Error::format(
                    line_no,
                    format!("digest {:?} is not lowercase hex", digest),
                ));
            }
            if digest.len() != algorithm.hex_len() {
                return Err(Error::format(
                    line_no,
                    format!(
                        "digest {:?} has {} characters, {} needs {}",
                        digest,
                        digest.len(),
                        algorithm,
                        algorithm.hex_len()
                    ),
                ));
            }

            let key = NormalizedPath::new(path);
            if key.as_str().is_empty() {
                return Err(Error::format(line_no, format!("empty path {:?}", path)));
            }
            if !seen.insert(key) {
                return Err(Error::format(line_no, format!("duplicate path {:?}", path)));
            }

            entries.push(ManifestEntry::new(*path, *digest));
        }

        Ok(Self { revision, entries })
    }

    /// Serialize to the canonical wire form: revision, then one line per entry.
    pub fn serialize(&self) -> String {
        let mut out = format!("{}\n", self.revision);
        for entry in &self.entries {
            out.push_str(&entry.path);
            out.push(' ');
            out.push_str(&entry.digest);
            out.push('\n');
        }
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromStr for Manifest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Manifest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.serialize())
    }
}
