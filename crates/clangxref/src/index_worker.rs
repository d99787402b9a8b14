//! The `--index-worker` child-process entry point.
//!
//! One process per [`pool`](clangxref_coordinator)-managed slot, reused
//! across many tasks: reads one newline-delimited JSON [`WorkerTask`] per
//! line from stdin, runs it through [`clangxref_worker::index_one`], and
//! writes one newline-delimited JSON `WorkerOutcome` back to stdout. Exits
//! cleanly when stdin reaches EOF (the parent closed the pipe because the
//! shared task queue is empty).

use std::io::{self, BufRead, Write};

use clangxref_coordinator::WorkerTask;

/// Runs the worker-process main loop against `stdin`/`stdout`.
///
/// Malformed input lines are logged and skipped rather than killing the
/// process — the parent pool already treats a dead/unresponsive child as
/// a single failed task and respawns, so surviving a bad line costs
/// nothing and avoids an unnecessary respawn.
pub fn run() -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let task: WorkerTask = match serde_json::from_str(&line) {
            Ok(task) => task,
            Err(e) => {
                tracing::warn!(error = %e, "index-worker: malformed task line, skipping");
                continue;
            }
        };

        let outcome = clangxref_worker::index_one(&task.entry, task.lib_path.as_ref());
        let encoded = serde_json::to_string(&outcome).map_err(io::Error::other)?;
        writeln!(stdout, "{encoded}")?;
        stdout.flush()?;
    }

    Ok(())
}
