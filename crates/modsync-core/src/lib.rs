//! Revision-gated file synchronization engine
//!
//! Fetches a remote manifest of `(path, digest)` pairs, compares its revision
//! with the locally applied one, and converges local files to the published
//! digests:
//!
//! - **Manifest**: line-oriented revision + entry list, parser and serializer
//! - **StateStore**: the locally applied manifest on disk
//! - **BackupManager**: one-time pristine copy before the first overwrite
//! - **Fetcher**: transfer of the manifest and file bytes (HTTP or mirror dir)
//! - **SyncEngine**: gate, commit point, per-file reconcile with bounded retry
//!
//! # Architecture
//!
//! ```text
//!                  modsync-cli
//!                       |
//!                 modsync-core
//!                       |
//!                  modsync-fs
//! ```

pub mod backup;
pub mod config;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod state;
pub mod sync;

pub use backup::{BackupDecision, BackupManager};
pub use config::Settings;
pub use error::{Error, Result};
pub use fetch::{DirFetcher, FetchError, Fetcher, HttpFetcher, fetcher_for};
pub use manifest::{Manifest, ManifestEntry};
pub use state::StateStore;
pub use sync::{
    FileReport, MAX_FETCH_ATTEMPTS, ReconcileOutcome, RunStatus, SyncEngine, SyncOptions,
    SyncReport,
};
