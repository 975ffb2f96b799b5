//! Local directory mirror

use std::path::PathBuf;

use modsync_fs::NormalizedPath;

use super::{FetchError, Fetcher};

/// Serves files from a directory laid out like the published tree.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    base: PathBuf,
}

impl DirFetcher {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &PathBuf {
        &self.base
    }
}

impl Fetcher for DirFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let rel = NormalizedPath::new(path);
        if !rel.is_safe_relative() {
            return Err(FetchError::Network {
                path: path.to_string(),
                message: "path escapes the mirror directory".to_string(),
            });
        }

        let full = self.base.join(rel.to_native());
        std::fs::read(&full).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FetchError::NotFound {
                path: path.to_string(),
            },
            _ => FetchError::Network {
                path: path.to_string(),
                message: e.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_nested_file() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join("mod/res")).unwrap();
        std::fs::write(temp.path().join("mod/res/a.bin"), [1u8, 2, 3]).unwrap();

        let fetcher = DirFetcher::new(temp.path());
        assert_eq!(fetcher.fetch("mod/res/a.bin").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let temp = tempfile::tempdir().unwrap();
        let fetcher = DirFetcher::new(temp.path());
        assert_eq!(
            fetcher.fetch("absent.txt").unwrap_err(),
            FetchError::NotFound {
                path: "absent.txt".to_string()
            }
        );
    }

    #[test]
    fn test_parent_traversal_is_refused() {
        let temp = tempfile::tempdir().unwrap();
        let fetcher = DirFetcher::new(temp.path().join("mirror"));
        assert!(matches!(
            fetcher.fetch("../secret.txt"),
            Err(FetchError::Network { .. })
        ));
    }
}
