//! SyncEngine for converging a sync root to a published manifest
//!
//! This module provides:
//! - **engine**: revision gate, commit point and the per-file reconcile loop
//! - **report**: per-file outcomes and the run summary

mod engine;
mod report;

pub use engine::{MAX_FETCH_ATTEMPTS, SyncEngine, SyncOptions};
pub use report::{FileReport, ReconcileOutcome, RunStatus, SyncReport};
