//! The on-save reindex dispatch.
//!
//! `textDocument/didSave` must not block the LSP event loop (spec.md
//! §4.5, §5): this spawns a background thread that runs the worker
//! pipeline inline and applies its result to the store under the same
//! retry/backoff contract the bulk coordinator uses. Fire-and-forget: the
//! caller gets a `JoinHandle` back only so tests can wait on it, not as
//! part of the LSP contract.

use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use clangxref_store::{FileIndexStatus, Store};
use clangxref_worker::{index_one, ManifestEntry, WorkerOutcome};

/// Spawns a background thread that reindexes `entry` and applies the
/// result to the store at `store_path`. Logs, rather than propagates,
/// any failure — a failed on-save reindex leaves the previous index
/// state in place and is reported via `tracing::warn!` only.
pub fn reindex_on_save(entry: ManifestEntry, lib_path: PathBuf, store_path: PathBuf) -> JoinHandle<()> {
    thread::spawn(move || {
        let outcome = index_one(&entry, &lib_path);
        if let Err(e) = apply_outcome(&store_path, outcome) {
            tracing::warn!(file = %entry.file, error = %e, "on-save reindex failed to apply");
        }
    })
}

fn apply_outcome(store_path: &Path, outcome: WorkerOutcome) -> Result<(), clangxref_store::StoreError> {
    let mut store = Store::open(store_path, false)?;
    match outcome {
        WorkerOutcome::Success { file, mtime, symbols, refs } => {
            store.save_index_result(&file, mtime, &symbols, &refs, true)
        }
        WorkerOutcome::Failed { file, mtime } => {
            store.update_file_status(&file, mtime.unwrap_or(0.0), FileIndexStatus::Failed)
        }
        WorkerOutcome::Skip { .. } => Ok(()),
    }
}
