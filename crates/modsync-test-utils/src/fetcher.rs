//! [`MemoryFetcher`]: an in-memory remote whose failures can be scripted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use modsync_core::{FetchError, Fetcher, Manifest};
use modsync_fs::SyncPath;

#[derive(Debug, Default)]
struct Remote {
    files: HashMap<String, Vec<u8>>,
    /// Paths that always come back with the wrong bytes
    corrupt: Vec<String>,
    /// Remaining scripted network failures per path
    failures: HashMap<String, u32>,
    /// Remaining scripted timeouts per path
    timeouts: HashMap<String, u32>,
    calls: HashMap<String, u32>,
}

/// A remote held in memory.
///
/// Clones share state, so a test can hand one clone to the engine and keep
/// another to inspect call counts.
///
/// # Example
///
/// ```rust,no_run
/// use modsync_test_utils::MemoryFetcher;
///
/// let remote = MemoryFetcher::new().with_file("a.txt", b"hello");
/// remote.fail_times("a.txt", 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    inner: Arc<Mutex<Remote>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn with_file(self, path: &str, content: impl AsRef<[u8]>) -> Self {
        self.put(path, content);
        self
    }

    /// Publish `manifest` under the default manifest name.
    pub fn with_manifest(self, manifest: &Manifest) -> Self {
        self.put(SyncPath::ManifestFile.as_str(), manifest.serialize());
        self
    }

    pub fn put(&self, path: &str, content: impl AsRef<[u8]>) {
        self.lock()
            .files
            .insert(path.to_string(), content.as_ref().to_vec());
    }

    /// Serve bytes that never match the published digest for `path`.
    pub fn corrupt(&self, path: &str) {
        self.lock().corrupt.push(path.to_string());
    }

    /// Fail the next `times` fetches of `path` with a network error.
    pub fn fail_times(&self, path: &str, times: u32) {
        self.lock().failures.insert(path.to_string(), times);
    }

    /// Time out the next `times` fetches of `path`.
    pub fn timeout_times(&self, path: &str, times: u32) {
        self.lock().timeouts.insert(path.to_string(), times);
    }

    /// Number of fetches of `path` so far.
    pub fn calls(&self, path: &str) -> u32 {
        self.lock().calls.get(path).copied().unwrap_or(0)
    }

    /// Number of fetches of anything other than the manifest.
    pub fn file_calls(&self) -> u32 {
        self.lock()
            .calls
            .iter()
            .filter(|(path, _)| path.as_str() != SyncPath::ManifestFile.as_str())
            .map(|(_, n)| *n)
            .sum()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Remote> {
        self.inner.lock().expect("MemoryFetcher mutex poisoned")
    }
}

impl Fetcher for MemoryFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let mut remote = self.lock();
        *remote.calls.entry(path.to_string()).or_default() += 1;

        if let Some(left) = remote.timeouts.get_mut(path)
            && *left > 0
        {
            *left -= 1;
            return Err(FetchError::Timeout {
                path: path.to_string(),
            });
        }
        if let Some(left) = remote.failures.get_mut(path)
            && *left > 0
        {
            *left -= 1;
            return Err(FetchError::Network {
                path: path.to_string(),
                message: "scripted failure".to_string(),
            });
        }

        let mut bytes = remote
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                path: path.to_string(),
            })?;
        if remote.corrupt.iter().any(|p| p == path) {
            bytes.extend_from_slice(b"#corrupted");
        }
        Ok(bytes)
    }
}
