//! Transfer of the manifest and file contents from the publishing side.
//!
//! A [`Fetcher`] resolves paths relative to a fixed base location. The
//! manifest itself is fetched like any other resource, under its well-known
//! name.

mod dir;
mod http;

use std::time::Duration;

pub use dir::DirFetcher;
pub use http::HttpFetcher;

/// Errors returned by a [`Fetcher`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("{path} not found at source")]
    NotFound { path: String },

    #[error("Network error fetching {path}: {message}")]
    Network { path: String, message: String },

    #[error("Timed out fetching {path}")]
    Timeout { path: String },
}

/// Source of remote bytes, addressed by relative path.
pub trait Fetcher {
    /// Fetch the raw bytes stored at `path`.
    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError>;
}

impl<F: Fetcher + ?Sized> Fetcher for Box<F> {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(path)
    }
}

/// Pick a fetcher for `source`.
///
/// `http://` and `https://` sources use [`HttpFetcher`]; anything else is
/// treated as a local mirror directory, with an optional `file://` prefix.
pub fn fetcher_for(source: &str, timeout: Duration) -> Result<Box<dyn Fetcher>, FetchError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        return Ok(Box::new(HttpFetcher::new(source, timeout)?));
    }
    let dir = source.strip_prefix("file://").unwrap_or(source);
    Ok(Box::new(DirFetcher::new(dir)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_for_directory_source() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("x.txt"), "x").unwrap();
        let source = format!("file://{}", temp.path().display());

        let fetcher = fetcher_for(&source, Duration::from_secs(1)).unwrap();
        assert_eq!(fetcher.fetch("x.txt").unwrap(), b"x");
    }

    #[test]
    fn test_fetcher_for_http_source_builds() {
        assert!(fetcher_for("https://example.invalid/mod/", Duration::from_secs(1)).is_ok());
    }
}
