//! HTTP(S) transfer

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;

use super::{FetchError, Fetcher};

/// Fetches resources below a base URL with a blocking client.
///
/// Every request carries the client timeout, so a stalled transfer surfaces
/// as [`FetchError::Timeout`] instead of hanging the run.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base_url: String,
    client: Client,
}

impl HttpFetcher {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network {
                path: base_url.clone(),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of `path` below the base URL.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.replace('\\', "/").trim_start_matches('/')
        )
    }

    fn classify(path: &str, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                path: path.to_string(),
            }
        } else {
            FetchError::Network {
                path: path.to_string(),
                message: err.to_string(),
            }
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.url_for(path);
        tracing::debug!(%url, "GET");

        let res = self
            .client
            .get(&url)
            .send()
            .map_err(|e| Self::classify(path, e))?;

        if res.status() == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                path: path.to_string(),
            });
        }
        if !res.status().is_success() {
            return Err(FetchError::Network {
                path: path.to_string(),
                message: format!("HTTP status {}", res.status()),
            });
        }

        let body = res.bytes().map_err(|e| Self::classify(path, e))?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_joins_with_single_slash() {
        let fetcher = HttpFetcher::new("https://host/~/mod/", HttpFetcher::DEFAULT_TIMEOUT).unwrap();
        assert_eq!(fetcher.url_for("modfilelist.txt"), "https://host/~/mod/modfilelist.txt");
        assert_eq!(fetcher.url_for("/res/a.txt"), "https://host/~/mod/res/a.txt");
        assert_eq!(fetcher.url_for("res\\a.txt"), "https://host/~/mod/res/a.txt");
    }

    #[test]
    fn test_url_for_base_without_trailing_slash() {
        let fetcher = HttpFetcher::new("http://host/mod", HttpFetcher::DEFAULT_TIMEOUT).unwrap();
        assert_eq!(fetcher.url_for("a.txt"), "http://host/mod/a.txt");
    }

    #[test]
    fn test_unreachable_host_is_network_error() {
        // Port 9 on loopback is the discard port and normally closed.
        let fetcher = HttpFetcher::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = fetcher.fetch("a.txt").unwrap_err();
        assert!(matches!(
            err,
            FetchError::Network { .. } | FetchError::Timeout { .. }
        ));
    }
}
