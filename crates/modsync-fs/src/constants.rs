//! Well-known names inside a sync root.

use std::path::Path;

/// Default on-disk locations used by the updater.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPath {
    /// The applied manifest (`modfilelist.txt`), also the remote manifest name
    ManifestFile,
    /// Root of the pristine-copy tree (`bak`)
    BackupDir,
    /// Subtree distributed by the updater itself (`mod`)
    SelfManagedDir,
    /// Optional settings file (`modsync.toml`)
    ConfigFile,
}

impl SyncPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManifestFile => "modfilelist.txt",
            Self::BackupDir => "bak",
            Self::SelfManagedDir => "mod",
            Self::ConfigFile => "modsync.toml",
        }
    }
}

impl AsRef<Path> for SyncPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for SyncPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for SyncPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
