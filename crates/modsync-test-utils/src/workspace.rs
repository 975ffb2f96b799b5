//! [`TestWorkspace`]: a temporary sync root.

use std::fs;
use std::path::{Path, PathBuf};

use modsync_core::{Manifest, ManifestEntry};
use modsync_fs::{DigestAlgorithm, NormalizedPath};
use tempfile::TempDir;

/// MD5 hex digest of `content`, the default manifest digest.
pub fn md5_hex(content: impl AsRef<[u8]>) -> String {
    DigestAlgorithm::Md5.compute_bytes(content.as_ref())
}

/// A temporary directory standing in for an install root.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn normalized_root(&self) -> NormalizedPath {
        NormalizedPath::new(self.root())
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, rel: &str, content: impl AsRef<[u8]>) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    pub fn read(&self, rel: &str) -> Vec<u8> {
        fs::read(self.path(rel)).unwrap_or_else(|e| panic!("reading {}: {}", rel, e))
    }

    pub fn read_string(&self, rel: &str) -> String {
        String::from_utf8(self.read(rel)).unwrap()
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }

    pub fn assert_file_content(&self, rel: &str, expected: impl AsRef<[u8]>) {
        assert_eq!(
            self.read(rel),
            expected.as_ref(),
            "unexpected content in {}",
            rel
        );
    }

    pub fn assert_missing(&self, rel: &str) {
        assert!(!self.exists(rel), "{} should not exist", rel);
    }
}

/// Build a manifest whose digests are the MD5 of the given contents.
pub fn manifest_of(revision: u64, files: &[(&str, &str)]) -> Manifest {
    Manifest::new(
        revision,
        files
            .iter()
            .map(|(path, content)| ManifestEntry::new(*path, md5_hex(content)))
            .collect(),
    )
}
