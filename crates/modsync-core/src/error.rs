//! Error types for modsync-core
//!
//! Only run-level failures are errors. Per-file failures during reconcile are
//! recorded as [`crate::ReconcileOutcome`] values and never abort the batch.

use crate::fetch::FetchError;

/// Result type for modsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a sync run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed manifest text
    #[error("Malformed manifest at line {line}: {message}")]
    Format { line: usize, message: String },

    /// The remote manifest could not be fetched
    #[error("Failed to fetch manifest: {0}")]
    Network(#[from] FetchError),

    /// Settings are unusable
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Filesystem error from modsync-fs
    #[error(transparent)]
    Fs(#[from] modsync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            line,
            message: message.into(),
        }
    }
}
