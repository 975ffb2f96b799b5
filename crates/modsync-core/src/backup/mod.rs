//! Backup-on-first-touch
//!
//! Before the updater overwrites a file for the first time, the original is
//! copied to the same relative path under the backup root (`bak/` by
//! default). The presence of that copy is the only record that the file has
//! been touched, so nothing else is persisted.
//!
//! Paths inside the backup tree itself and paths inside the self-managed
//! subtree (`mod/` by default, content the updater distributes) are exempt.

mod file_backup;

pub use file_backup::{BackupDecision, BackupManager};
