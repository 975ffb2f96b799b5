//! Reconcile outcomes and run reports

use serde::{Deserialize, Serialize};

/// What happened to one manifest entry during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum ReconcileOutcome {
    /// The original was copied to the backup root; content untouched this run
    BackedUpOnly,
    /// The on-disk digest already matched
    SkippedUnchanged,
    /// New content was fetched, verified and written
    Updated,
    /// Content already matched but was fetched again because of `force`
    ForcedRedownload,
    /// Every fetch attempt failed or produced the wrong digest
    FailedVerification { attempts: u32 },
    /// A local filesystem problem prevented handling this entry
    Failed { reason: String },
}

impl ReconcileOutcome {
    /// Whether the entry changed (or, in a dry run, would have changed) disk state.
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            Self::BackedUpOnly | Self::Updated | Self::ForcedRedownload
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FailedVerification { .. } | Self::Failed { .. })
    }

    /// Short label used in summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BackedUpOnly => "backed-up-only",
            Self::SkippedUnchanged => "skipped-unchanged",
            Self::Updated => "updated",
            Self::ForcedRedownload => "forced-redownload",
            Self::FailedVerification { .. } => "failed-verification",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Outcome for a single path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,
    #[serde(flatten)]
    pub outcome: ReconcileOutcome,
}

/// Whether the run got past the revision gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    /// Remote revision was not newer; nothing was touched
    UpToDate,
    /// The remote manifest was committed and reconciled
    Applied,
}

/// Report from a sync run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Revision applied before the run (0 when none)
    pub local_revision: u64,
    /// Revision of the fetched manifest
    pub remote_revision: u64,
    pub status: RunStatus,
    /// Whether writes were suppressed
    pub dry_run: bool,
    /// Per-entry outcomes in manifest order
    pub files: Vec<FileReport>,
}

impl SyncReport {
    /// Report for a run stopped at the revision gate.
    pub fn up_to_date(local_revision: u64, remote_revision: u64, dry_run: bool) -> Self {
        Self {
            local_revision,
            remote_revision,
            status: RunStatus::UpToDate,
            dry_run,
            files: Vec::new(),
        }
    }

    /// Empty report for a run that passed the gate.
    pub fn applied(local_revision: u64, remote_revision: u64, dry_run: bool) -> Self {
        Self {
            local_revision,
            remote_revision,
            status: RunStatus::Applied,
            dry_run,
            files: Vec::new(),
        }
    }

    /// Record the outcome for a path.
    pub fn record(&mut self, path: impl Into<String>, outcome: ReconcileOutcome) {
        self.files.push(FileReport {
            path: path.into(),
            outcome,
        });
    }

    /// Outcome recorded for `path`, if any.
    pub fn outcome_of(&self, path: &str) -> Option<&ReconcileOutcome> {
        self.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| &f.outcome)
    }

    pub fn has_failures(&self) -> bool {
        self.files.iter().any(|f| f.outcome.is_failure())
    }

    pub fn changed_count(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_change()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_failure()).count()
    }

    /// Number of entries whose outcome has the given label.
    pub fn count(&self, label: &str) -> usize {
        self.files
            .iter()
            .filter(|f| f.outcome.label() == label)
            .count()
    }

    /// Process exit status: 1 when any file failed, 0 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.has_failures() { 1 } else { 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_up_to_date_report_is_clean() {
        let report = SyncReport::up_to_date(3, 3, false);
        assert_eq!(report.status, RunStatus::UpToDate);
        assert!(!report.has_failures());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_failures_set_exit_code() {
        let mut report = SyncReport::applied(0, 1, false);
        report.record("a.txt", ReconcileOutcome::Updated);
        report.record("b.txt", ReconcileOutcome::FailedVerification { attempts: 4 });

        assert!(report.has_failures());
        assert_eq!(report.changed_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_counts_by_label() {
        let mut report = SyncReport::applied(0, 1, false);
        report.record("a.txt", ReconcileOutcome::SkippedUnchanged);
        report.record("b.txt", ReconcileOutcome::SkippedUnchanged);
        report.record("c.txt", ReconcileOutcome::BackedUpOnly);

        assert_eq!(report.count("skipped-unchanged"), 2);
        assert_eq!(report.count("backed-up-only"), 1);
        assert_eq!(report.outcome_of("c.txt"), Some(&ReconcileOutcome::BackedUpOnly));
    }

    #[test]
    fn test_report_serializes_outcome_tag() {
        let mut report = SyncReport::applied(0, 2, true);
        report.record("a.txt", ReconcileOutcome::FailedVerification { attempts: 4 });

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "applied");
        assert_eq!(json["files"][0]["outcome"], "failed-verification");
        assert_eq!(json["files"][0]["attempts"], 4);
    }
}
