//! Filesystem layer for modsync
//!
//! Provides normalized relative paths, content hashing, atomic writes and
//! format-detected configuration files for the sync engine.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use checksum::DigestAlgorithm;
pub use config::ConfigStore;
pub use constants::SyncPath;
pub use error::{Error, Result};
pub use path::NormalizedPath;
