//! Updater settings
//!
//! Settings come from an optional `modsync.toml` in the sync root (or an
//! explicit TOML/JSON file). Every field has a default, so an absent file is
//! equivalent to an empty one. The CLI overrides individual fields.

use std::time::Duration;

use modsync_fs::{ConfigStore, DigestAlgorithm, NormalizedPath, SyncPath};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Where to fetch from and how the sync root is laid out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL (`http(s)://...`) or mirror directory of the published tree
    pub source: Option<String>,
    /// Name of the manifest, both remotely and as the applied-state file
    pub manifest_name: String,
    /// Backup root, relative to the sync root
    pub backup_dir: String,
    /// Top-level directory the updater distributes itself
    pub self_managed_dir: String,
    /// Per-request network timeout in seconds
    pub timeout_secs: u64,
    /// Digest used in the manifest
    pub digest: DigestAlgorithm,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: None,
            manifest_name: SyncPath::ManifestFile.to_string(),
            backup_dir: SyncPath::BackupDir.to_string(),
            self_managed_dir: SyncPath::SelfManagedDir.to_string(),
            timeout_secs: 30,
            digest: DigestAlgorithm::default(),
        }
    }
}

impl Settings {
    /// Load `modsync.toml` from `root`, falling back to defaults.
    pub fn load(root: &NormalizedPath) -> Result<Self> {
        let path = root.join(SyncPath::ConfigFile.as_str());
        let settings = ConfigStore::new()
            .load_optional::<Self>(&path)?
            .unwrap_or_default();
        if path.is_file() {
            tracing::debug!(path = %path, "Loaded settings");
        }
        Ok(settings)
    }

    /// Load settings from an explicit file (format by extension).
    pub fn load_from(path: &NormalizedPath) -> Result<Self> {
        Ok(ConfigStore::new().load(path)?)
    }

    /// Network timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject settings that would make the engine write outside the root.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("manifest_name", &self.manifest_name),
            ("backup_dir", &self.backup_dir),
            ("self_managed_dir", &self.self_managed_dir),
        ] {
            if !NormalizedPath::new(value).is_safe_relative() {
                return Err(Error::Config {
                    message: format!("{} must be a relative path inside the root, got {:?}", field, value),
                });
            }
        }
        if NormalizedPath::new(&self.self_managed_dir).components().count() != 1 {
            return Err(Error::Config {
                message: format!(
                    "self_managed_dir must be a single directory name, got {:?}",
                    self.self_managed_dir
                ),
            });
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config {
                message: "timeout_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
