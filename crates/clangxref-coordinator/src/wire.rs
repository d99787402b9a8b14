//! The newline-delimited JSON protocol spoken between a coordinator pool
//! slot and its long-lived `--index-worker` child process.
//!
//! One [`WorkerTask`] line in, one [`clangxref_worker::WorkerOutcome`]
//! line out, for as many tasks as the slot has left to dispatch; the
//! child exits when its stdin reaches EOF.

use serde::{Deserialize, Serialize};

use clangxref_worker::ManifestEntry;

/// One unit of work sent to an `--index-worker` child process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerTask {
    /// Path to the AST library the child should load.
    pub lib_path: String,
    /// The manifest entry to index.
    pub entry: ManifestEntry,
}
