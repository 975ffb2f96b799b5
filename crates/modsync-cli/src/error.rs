//! Error types for modsync-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from modsync-core
    #[error(transparent)]
    Core(#[from] modsync_core::Error),

    /// Error from modsync-fs
    #[error(transparent)]
    Fs(#[from] modsync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Report could not be rendered as JSON
    #[error("Could not render report: {0}")]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}

impl From<modsync_core::FetchError> for CliError {
    fn from(err: modsync_core::FetchError) -> Self {
        Self::Core(err.into())
    }
}
