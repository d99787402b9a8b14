//! The OS-process worker pool.
//!
//! Each slot owns one long-lived `<current executable> --index-worker`
//! child process and feeds it tasks one at a time over newline-delimited
//! JSON on its stdin/stdout, reusing the process across many files
//! instead of paying spawn overhead per file. A slot whose child dies
//! unexpectedly reports that one task as [`WorkerOutcome::Failed`] and
//! respawns a fresh child for whatever tasks remain in the shared queue.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use clangxref_worker::WorkerOutcome;

use crate::wire::WorkerTask;

fn spawn_child() -> std::io::Result<Child> {
    let exe = std::env::current_exe()?;
    Command::new(exe)
        .arg("--index-worker")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
}

fn run_task(child: &mut Child, reader: &mut BufReader<std::process::ChildStdout>, task: &WorkerTask) -> Option<WorkerOutcome> {
    let line = serde_json::to_string(task).ok()?;
    let stdin = child.stdin.as_mut()?;
    writeln!(stdin, "{line}").ok()?;
    stdin.flush().ok()?;

    let mut response = String::new();
    let bytes_read = reader.read_line(&mut response).ok()?;
    if bytes_read == 0 {
        return None;
    }
    serde_json::from_str(response.trim_end()).ok()
}

fn run_slot(queue: Arc<Mutex<VecDeque<WorkerTask>>>, results: Sender<WorkerOutcome>) {
    loop {
        let task = {
            let mut q = queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            q.pop_front()
        };
        let Some(task) = task else {
            return;
        };

        let mut child = match spawn_child() {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(error = %e, "failed to spawn index-worker child");
                let _ = results.send(WorkerOutcome::Failed { file: task.entry.file.clone(), mtime: None });
                continue;
            }
        };
        let Some(stdout) = child.stdout.take() else {
            let _ = results.send(WorkerOutcome::Failed { file: task.entry.file.clone(), mtime: None });
            continue;
        };
        let mut reader = BufReader::new(stdout);

        match run_task(&mut child, &mut reader, &task) {
            Some(outcome) => {
                let _ = results.send(outcome);
                // Keep using this child for subsequent tasks drawn from
                // the queue, draining tasks until it dies or the queue
                // empties.
                loop {
                    let next = {
                        let mut q = queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                        q.pop_front()
                    };
                    let Some(next) = next else {
                        let _ = child.kill();
                        return;
                    };
                    match run_task(&mut child, &mut reader, &next) {
                        Some(outcome) => {
                            let _ = results.send(outcome);
                        }
                        None => {
                            tracing::warn!(file = %next.entry.file, "index-worker child died mid-task, respawning");
                            let _ = results.send(WorkerOutcome::Failed { file: next.entry.file.clone(), mtime: None });
                            break;
                        }
                    }
                }
            }
            None => {
                tracing::warn!(file = %task.entry.file, "index-worker child died on first task, respawning");
                let _ = results.send(WorkerOutcome::Failed { file: task.entry.file.clone(), mtime: None });
            }
        }
    }
}

/// Dispatches `tasks` across `jobs.max(1)` reusable worker-process slots,
/// returning a channel that yields one [`WorkerOutcome`] per task, in
/// arrival order (not task order).
pub fn dispatch(tasks: Vec<WorkerTask>, jobs: usize) -> Receiver<WorkerOutcome> {
    let (tx, rx) = mpsc::channel();
    let queue = Arc::new(Mutex::new(VecDeque::from(tasks)));

    for _ in 0..jobs.max(1) {
        let queue = Arc::clone(&queue);
        let tx = tx.clone();
        thread::spawn(move || run_slot(queue, tx));
    }
    drop(tx);
    rx
}
