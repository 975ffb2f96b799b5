//! Per-file backup decisions and copies

use modsync_fs::{NormalizedPath, io};

use crate::Result;

/// What the backup policy says about one manifest path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupDecision {
    /// The path lies inside the backup tree
    InBackupTree,
    /// The path lies inside the self-managed subtree
    SelfManaged,
    /// A pristine copy already exists under the backup root
    AlreadyBackedUp,
    /// Nothing is on disk yet, so there is no original to preserve
    NoOriginal,
    /// The file must be copied to the backup root before it may be touched
    Required,
}

impl BackupDecision {
    /// Whether the file has to go through a backup-only pass.
    pub fn is_required(&self) -> bool {
        matches!(self, Self::Required)
    }
}

/// Decides and performs one-time backups of files under a sync root.
#[derive(Debug, Clone)]
pub struct BackupManager {
    /// Root of the synchronized tree
    root: NormalizedPath,
    /// Backup root, relative to `root`
    backup_dir: NormalizedPath,
    /// Name of the top-level directory the updater owns
    self_managed_dir: String,
}

impl BackupManager {
    /// Create a manager for `root`.
    ///
    /// `backup_dir` is relative to `root`; `self_managed_dir` is matched
    /// against the first component of each manifest path.
    pub fn new(
        root: NormalizedPath,
        backup_dir: impl Into<NormalizedPath>,
        self_managed_dir: impl Into<String>,
    ) -> Self {
        Self {
            root,
            backup_dir: backup_dir.into(),
            self_managed_dir: self_managed_dir.into(),
        }
    }

    /// Relative backup root, e.g. `bak`.
    pub fn backup_dir(&self) -> &NormalizedPath {
        &self.backup_dir
    }

    /// Absolute location of the pristine copy for `rel`.
    pub fn backup_path(&self, rel: &NormalizedPath) -> NormalizedPath {
        self.root.join(self.backup_dir.as_str()).join(rel.as_str())
    }

    /// Whether `rel` is inside the backup tree.
    pub fn is_in_backup_tree(&self, rel: &NormalizedPath) -> bool {
        rel.is_descendant_of(&self.backup_dir)
    }

    /// Whether `rel` belongs to the subtree the updater distributes itself.
    ///
    /// Only the first path component is compared: `mod/a.txt` is
    /// self-managed, `modules/a.txt` and `data/mod/a.txt` are not.
    pub fn is_self_managed(&self, rel: &NormalizedPath) -> bool {
        rel.first_component() == Some(self.self_managed_dir.as_str())
    }

    /// Check if a pristine copy of `rel` exists.
    pub fn has_backup(&self, rel: &NormalizedPath) -> bool {
        self.backup_path(rel).is_file()
    }

    /// Apply the backup policy to `rel`.
    pub fn decide(&self, rel: &NormalizedPath) -> BackupDecision {
        if self.is_in_backup_tree(rel) {
            BackupDecision::InBackupTree
        } else if self.is_self_managed(rel) {
            BackupDecision::SelfManaged
        } else if self.has_backup(rel) {
            BackupDecision::AlreadyBackedUp
        } else if !self.root.join(rel.as_str()).is_file() {
            BackupDecision::NoOriginal
        } else {
            BackupDecision::Required
        }
    }

    /// Copy the current on-disk `rel` to the backup root.
    ///
    /// # Returns
    /// The absolute path of the copy.
    ///
    /// # Errors
    /// Returns an error if the source is unreadable or the copy cannot be
    /// created.
    pub fn create_backup(&self, rel: &NormalizedPath) -> Result<NormalizedPath> {
        let source = self.root.join(rel.as_str());
        let dest = self.backup_path(rel);
        io::copy_file(&source, &dest)?;
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, BackupManager) {
        let temp = TempDir::new().unwrap();
        let manager = BackupManager::new(NormalizedPath::new(temp.path()), "bak", "mod");
        (temp, manager)
    }

    #[test]
    fn test_original_file_requires_backup() {
        let (temp, manager) = setup();
        fs::write(temp.path().join("a.txt"), "original").unwrap();

        assert_eq!(
            manager.decide(&NormalizedPath::new("a.txt")),
            BackupDecision::Required
        );
    }

    #[test]
    fn test_missing_file_has_no_original() {
        let (_temp, manager) = setup();
        assert_eq!(
            manager.decide(&NormalizedPath::new("new.txt")),
            BackupDecision::NoOriginal
        );
    }

    #[test]
    fn test_self_managed_is_exempt_by_first_component() {
        let (temp, manager) = setup();
        fs::create_dir_all(temp.path().join("mod")).unwrap();
        fs::create_dir_all(temp.path().join("modules")).unwrap();
        fs::create_dir_all(temp.path().join("data/mod")).unwrap();
        fs::write(temp.path().join("mod/a.txt"), "x").unwrap();
        fs::write(temp.path().join("modules/a.txt"), "x").unwrap();
        fs::write(temp.path().join("data/mod/a.txt"), "x").unwrap();

        assert_eq!(
            manager.decide(&NormalizedPath::new("mod/a.txt")),
            BackupDecision::SelfManaged
        );
        assert_eq!(
            manager.decide(&NormalizedPath::new("mod\\a.txt")),
            BackupDecision::SelfManaged
        );
        assert_eq!(
            manager.decide(&NormalizedPath::new("modules/a.txt")),
            BackupDecision::Required
        );
        assert_eq!(
            manager.decide(&NormalizedPath::new("data/mod/a.txt")),
            BackupDecision::Required
        );
    }

    #[test]
    fn test_backup_tree_is_exempt() {
        let (temp, manager) = setup();
        fs::create_dir_all(temp.path().join("bak")).unwrap();
        fs::write(temp.path().join("bak/a.txt"), "x").unwrap();

        assert_eq!(
            manager.decide(&NormalizedPath::new("bak/a.txt")),
            BackupDecision::InBackupTree
        );
    }

    #[test]
    fn test_create_backup_copies_verbatim_with_parents() {
        let (temp, manager) = setup();
        fs::create_dir_all(temp.path().join("res/ui")).unwrap();
        fs::write(temp.path().join("res/ui/menu.xml"), b"\x00pristine\xff").unwrap();
        let rel = NormalizedPath::new("res/ui/menu.xml");

        let dest = manager.create_backup(&rel).unwrap();

        assert_eq!(dest, manager.backup_path(&rel));
        assert_eq!(fs::read(dest.to_native()).unwrap(), b"\x00pristine\xff");
        assert!(manager.has_backup(&rel));
        assert_eq!(manager.decide(&rel), BackupDecision::AlreadyBackedUp);
    }

    #[test]
    fn test_create_backup_missing_source_errors() {
        let (_temp, manager) = setup();
        assert!(manager.create_backup(&NormalizedPath::new("missing.txt")).is_err());
    }
}
