//! SyncEngine implementation
//!
//! One run goes through four stages:
//!
//! 1. **load**: read the applied manifest and fetch the remote one
//! 2. **gate**: stop unless the remote revision is newer (or the gate is bypassed)
//! 3. **commit**: persist the remote manifest before any file is touched
//! 4. **reconcile**: walk entries in manifest order, backing up, skipping or
//!    fetching each one
//!
//! A crash during stage 4 leaves the new revision recorded with some files
//! still stale. Running with `skip_revision` repairs that state.

use modsync_fs::{DigestAlgorithm, NormalizedPath, io};

use crate::backup::{BackupDecision, BackupManager};
use crate::fetch::Fetcher;
use crate::state::StateStore;
use crate::{Error, Manifest, ManifestEntry, Result, Settings};

use super::report::{ReconcileOutcome, SyncReport};

/// Fetch attempts per file before it is marked `failed-verification`.
pub const MAX_FETCH_ATTEMPTS: u32 = 4;

/// Options for a sync run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Decide and log everything, write nothing
    pub dry_run: bool,
    /// Reconcile even when the remote revision is not newer
    pub skip_revision: bool,
    /// Re-fetch every file even when its digest already matches.
    /// Implies `skip_revision`.
    pub force: bool,
}

impl SyncOptions {
    /// Whether the revision gate is bypassed.
    pub fn bypasses_revision_gate(&self) -> bool {
        self.skip_revision || self.force
    }
}

/// Engine for converging a sync root to the published manifest
pub struct SyncEngine {
    /// Root of the synchronized tree
    root: NormalizedPath,
    /// Digest used by the manifest
    digest: DigestAlgorithm,
    /// Remote name of the manifest
    manifest_name: String,
    state: StateStore,
    backups: BackupManager,
    fetcher: Box<dyn Fetcher>,
}

impl SyncEngine {
    /// Create a new SyncEngine
    ///
    /// # Errors
    ///
    /// Returns an error if the settings fail validation.
    pub fn new(root: NormalizedPath, settings: &Settings, fetcher: Box<dyn Fetcher>) -> Result<Self> {
        settings.validate()?;

        let state = StateStore::new(&root, &settings.manifest_name).with_digest(settings.digest);
        let backups = BackupManager::new(
            root.clone(),
            settings.backup_dir.as_str(),
            settings.self_managed_dir.as_str(),
        );

        Ok(Self {
            root,
            digest: settings.digest,
            manifest_name: settings.manifest_name.clone(),
            state,
            backups,
            fetcher,
        })
    }

    /// Get the sync root path
    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn state(&self) -> &StateStore {
        &self.state
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Fetch and parse the remote manifest.
    ///
    /// # Errors
    ///
    /// [`Error::Network`] if the fetch fails, [`Error::Format`] if the text
    /// is malformed or a digest does not fit the configured algorithm.
    pub fn fetch_remote_manifest(&self) -> Result<Manifest> {
        let bytes = self.fetcher.fetch(&self.manifest_name)?;
        let text = String::from_utf8(bytes).map_err(|e| Error::Format {
            line: 1,
            message: format!("manifest is not valid UTF-8: {}", e),
        })?;
        Manifest::parse_with(&text, self.digest)
    }

    /// Run one synchronization pass.
    ///
    /// Manifest-level failures are returned as `Err` before anything on disk
    /// changes. File-level failures are recorded in the report and the batch
    /// continues.
    pub fn run(&self, options: &SyncOptions) -> Result<SyncReport> {
        let local_revision = match self.state.load()? {
            Some(local) => local.revision,
            None => {
                tracing::debug!("No local manifest, treating revision as 0");
                0
            }
        };
        let remote = self.fetch_remote_manifest()?;

        if remote.revision <= local_revision && !options.bypasses_revision_gate() {
            tracing::info!("Up to date (revision {})", local_revision);
            return Ok(SyncReport::up_to_date(
                local_revision,
                remote.revision,
                options.dry_run,
            ));
        }

        tracing::info!(
            "Found update (revision {} -> {})",
            local_revision,
            remote.revision
        );

        if options.dry_run {
            tracing::info!("Dry run: revision {} will not be saved", remote.revision);
        } else {
            self.state.save(&remote)?;
        }

        let mut report = SyncReport::applied(local_revision, remote.revision, options.dry_run);
        for entry in &remote.entries {
            let outcome = self.reconcile_entry(entry, options);
            report.record(entry.path.clone(), outcome);
        }

        if report.changed_count() == 0 {
            tracing::warn!(
                "No files were changed by this update. Either the manifest was rebuilt without content changes, or something has gone wrong."
            );
        }
        if report.has_failures() {
            tracing::warn!("{} file(s) failed to update", report.failed_count());
        }

        Ok(report)
    }

    /// Reconcile a single entry. Never fails the run.
    fn reconcile_entry(&self, entry: &ManifestEntry, options: &SyncOptions) -> ReconcileOutcome {
        let rel = entry.normalized_path();
        if !rel.is_safe_relative() {
            tracing::error!("Refusing '{}': path leaves the sync root", entry.path);
            return ReconcileOutcome::Failed {
                reason: modsync_fs::Error::PathEscape {
                    path: entry.path.clone(),
                }
                .to_string(),
            };
        }
        let target = self.root.join(rel.as_str());

        if self.backups.decide(&rel) == BackupDecision::Required {
            return self.backup_only(&rel, options);
        }

        let local_digest = if target.is_file() {
            match self.digest.compute_file(target.as_ref()) {
                Ok(d) => Some(d),
                Err(e) => {
                    tracing::error!("Could not read '{}': {}", rel, e);
                    return ReconcileOutcome::Failed {
                        reason: format!("reading local file: {}", e),
                    };
                }
            }
        } else {
            None
        };

        tracing::debug!(
            "Digest check for '{}': local '{}' vs manifest '{}'",
            rel,
            local_digest.as_deref().unwrap_or("<missing>"),
            entry.digest
        );

        let forced = if local_digest.as_deref() == Some(entry.digest.as_str()) {
            if !options.force {
                tracing::info!("'{}' skipped, unchanged from current", rel);
                return ReconcileOutcome::SkippedUnchanged;
            }
            tracing::info!("Forcing redownload of '{}'", rel);
            true
        } else {
            false
        };

        let Some(bytes) = self.fetch_verified(&rel, &entry.digest) else {
            tracing::warn!(
                "Validity check failed for '{}' after {} attempts",
                rel,
                MAX_FETCH_ATTEMPTS
            );
            return ReconcileOutcome::FailedVerification {
                attempts: MAX_FETCH_ATTEMPTS,
            };
        };

        if options.dry_run {
            tracing::info!("Dry run: '{}' would have been updated", rel);
        } else if let Err(e) = self.write_target(&target, &bytes) {
            tracing::error!("Could not write '{}': {}", rel, e);
            return ReconcileOutcome::Failed {
                reason: e.to_string(),
            };
        } else {
            tracing::info!("'{}' updated", rel);
        }

        if forced {
            ReconcileOutcome::ForcedRedownload
        } else {
            ReconcileOutcome::Updated
        }
    }

    /// First encounter with an original file: preserve it and stop there.
    fn backup_only(&self, rel: &NormalizedPath, options: &SyncOptions) -> ReconcileOutcome {
        if options.dry_run {
            tracing::info!("Dry run: would make a backup of '{}'", rel);
            return ReconcileOutcome::BackedUpOnly;
        }
        match self.backups.create_backup(rel) {
            Ok(dest) => {
                tracing::info!("Made a backup of '{}'", rel);
                tracing::debug!(backup = %dest, "Backup written");
                ReconcileOutcome::BackedUpOnly
            }
            Err(e) => {
                tracing::error!("Could not back up '{}': {}", rel, e);
                ReconcileOutcome::Failed {
                    reason: format!("backup failed: {}", e),
                }
            }
        }
    }

    /// Fetch `rel` until its digest matches, at most [`MAX_FETCH_ATTEMPTS`] times.
    ///
    /// Fetch errors, timeouts included, use up an attempt exactly like a
    /// digest mismatch.
    fn fetch_verified(&self, rel: &NormalizedPath, expected: &str) -> Option<Vec<u8>> {
        for attempt in 1..=MAX_FETCH_ATTEMPTS {
            match self.fetcher.fetch(rel.as_str()) {
                Ok(bytes) => {
                    let got = self.digest.compute_bytes(&bytes);
                    tracing::debug!(
                        "Verify '{}': downloaded '{}' vs manifest '{}'",
                        rel,
                        got,
                        expected
                    );
                    if got == expected {
                        return Some(bytes);
                    }
                    tracing::debug!(
                        "Validity check failed (file: '{}', attempt: {})",
                        rel,
                        attempt
                    );
                }
                Err(e) => {
                    tracing::debug!("Fetch failed (file: '{}', attempt: {}): {}", rel, attempt, e);
                }
            }
        }
        None
    }

    fn write_target(&self, target: &NormalizedPath, bytes: &[u8]) -> Result<()> {
        io::clear_readonly(target)?;
        io::write_atomic(target, bytes)?;
        Ok(())
    }
}
