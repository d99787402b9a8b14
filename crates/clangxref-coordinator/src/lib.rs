//! The incremental, resumable indexing driver.
//!
//! `run_index` is the only entry point a caller needs: given a workspace
//! directory and a path to the AST library, it loads
//! `compile_commands.json`, diffs it against what the store already has
//! recorded as `completed`, and dispatches the remainder across a
//! process pool of workers — see [`pool`] for the child-process protocol
//! and [`worklist`] for the incremental diff. Only this crate (and the
//! on-save path in `clangxref-query`) ever opens a write-capable
//! [`clangxref_store::Store`]; workers never touch the database file.

mod error;
mod pool;
mod worklist;
mod wire;

use std::collections::HashMap;
use std::path::Path;

use clangxref_store::{FileIndexStatus, Store};
use clangxref_worker::{ManifestEntry, WorkerOutcome};

pub use error::CoordinatorError;
pub use wire::WorkerTask;

/// How many files were saved, skipped, failed, or left untouched by a
/// [`run_index`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexRunSummary {
    /// Files successfully parsed and saved to the store.
    pub indexed: usize,
    /// Files intentionally skipped (assembly sources).
    pub skipped: usize,
    /// Files that failed to parse or whose arguments couldn't be
    /// resolved.
    pub failed: usize,
    /// Files already up to date and left untouched.
    pub up_to_date: usize,
}

const COMMIT_BATCH_SIZE: usize = 50;
const PROGRESS_LOG_INTERVAL: usize = 20;

fn store_path(workspace_dir: &Path) -> std::path::PathBuf {
    workspace_dir.join("clangxref_index.db")
}

fn read_manifest(workspace_dir: &Path) -> Result<Vec<ManifestEntry>, CoordinatorError> {
    let manifest_path = workspace_dir.join("compile_commands.json");
    let text = std::fs::read_to_string(manifest_path)?;
    let entries = serde_json::from_str(&text)?;
    Ok(entries)
}

/// Runs one incremental indexing pass over `workspace_dir`.
///
/// Opens (or creates) `clangxref_index.db` inside `workspace_dir`,
/// switches it into bulk-indexing speed mode, computes the set of
/// manifest entries whose source is new or newer than what's recorded,
/// and dispatches them to `jobs.max(1)` worker-process slots. Results
/// are applied to the store as they arrive, batching commits every 50
/// successes; a final commit flushes whatever remains.
pub fn run_index(
    workspace_dir: &Path,
    lib_path: &Path,
    jobs: usize,
) -> Result<IndexRunSummary, CoordinatorError> {
    let mut store = Store::open(&store_path(workspace_dir), true)?;
    store.enable_speed_mode()?;

    let entries = read_manifest(workspace_dir)?;
    let total_entries = entries.len();

    let completed: HashMap<String, f64> = store.completed_file_mtimes()?.into_iter().collect();
    let worklist = worklist::build_worklist(entries, &completed);
    let up_to_date = total_entries - worklist.len();

    let tasks = worklist
        .into_iter()
        .map(|entry| WorkerTask { lib_path: lib_path.display().to_string(), entry })
        .collect::<Vec<_>>();
    let total_tasks = tasks.len();

    let results = pool::dispatch(tasks, jobs);

    let mut summary = IndexRunSummary { up_to_date, ..Default::default() };
    let mut processed = 0usize;
    let mut pending_commit = 0usize;

    for outcome in results {
        processed += 1;
        match outcome {
            WorkerOutcome::Success { file, mtime, symbols, refs } => {
                store.save_index_result(&file, mtime, &symbols, &refs, false)?;
                pending_commit += 1;
                summary.indexed += 1;
            }
            WorkerOutcome::Failed { file, mtime } => {
                store.update_file_status(&file, mtime.unwrap_or(0.0), FileIndexStatus::Failed)?;
                summary.failed += 1;
            }
            WorkerOutcome::Skip { .. } => {
                summary.skipped += 1;
            }
        }

        if pending_commit >= COMMIT_BATCH_SIZE {
            store.commit_pending()?;
            pending_commit = 0;
        }
        if processed % PROGRESS_LOG_INTERVAL == 0 {
            tracing::info!(processed, total_tasks, "indexing progress");
        }
    }

    store.commit_pending()?;
    tracing::info!(?summary, "indexing run complete");
    Ok(summary)
}
