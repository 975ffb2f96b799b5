//! Shared test utilities for the modsync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fetcher`]: [`MemoryFetcher`], a scripted in-memory remote
//! - [`workspace`]: [`TestWorkspace`], a temporary sync root with helpers

pub mod fetcher;
pub mod workspace;

pub use fetcher::MemoryFetcher;
pub use workspace::{TestWorkspace, manifest_of, md5_hex};
