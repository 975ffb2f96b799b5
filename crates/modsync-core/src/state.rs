//! Local State Store: the manifest currently applied to the sync root.

use std::fs;

use modsync_fs::{DigestAlgorithm, NormalizedPath, io};

use crate::{Manifest, Result};

/// Reads and writes the applied manifest file.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: NormalizedPath,
    digest: DigestAlgorithm,
}

impl StateStore {
    /// Create a store for `manifest_name` inside `root`.
    pub fn new(root: &NormalizedPath, manifest_name: &str) -> Self {
        Self {
            path: root.join(manifest_name),
            digest: DigestAlgorithm::default(),
        }
    }

    /// Expect digests produced by `digest` when loading.
    pub fn with_digest(mut self, digest: DigestAlgorithm) -> Self {
        self.digest = digest;
        self
    }

    /// Location of the applied manifest file.
    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Load the applied manifest.
    ///
    /// A missing file is the normal first-run state and yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<Manifest>> {
        let native = self.path.to_native();
        match fs::read_to_string(&native) {
            Ok(text) => Manifest::parse_with(&text, self.digest).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(modsync_fs::Error::io(native, e).into()),
        }
    }

    /// Revision of the applied manifest, 0 when none has been applied.
    pub fn applied_revision(&self) -> Result<u64> {
        Ok(self.load()?.map(|m| m.revision).unwrap_or(0))
    }

    /// Replace the applied manifest with `manifest`.
    pub fn save(&self, manifest: &Manifest) -> Result<()> {
        io::write_text(&self.path, &manifest.serialize())?;
        tracing::debug!(path = %self.path, revision = manifest.revision, "Saved applied manifest");
        Ok(())
    }
}
