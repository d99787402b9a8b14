//! Incremental worklist computation.

use std::collections::HashMap;
use std::path::Path;
use std::time::UNIX_EPOCH;

use clangxref_worker::ManifestEntry;

/// Returns the current mtime of `entry`'s source file, in seconds since
/// the Unix epoch, canonicalizing `directory`/`file` first. `None` if the
/// file cannot be stat'd (left for the worker itself to report as
/// `Failed`, rather than silently dropping it from the worklist).
fn current_mtime(entry: &ManifestEntry) -> Option<(String, f64)> {
    let joined = Path::new(&entry.directory).join(&entry.file);
    let canonical = std::fs::canonicalize(&joined).ok()?;
    let modified = std::fs::metadata(&canonical).ok()?.modified().ok()?;
    let secs = modified.duration_since(UNIX_EPOCH).ok()?.as_secs_f64();
    Some((canonical.display().to_string(), secs))
}

/// Filters `entries` down to the ones that need (re)indexing: files with
/// no `completed` row, files whose current on-disk mtime differs at all
/// from the recorded one (not just newer — a checkout of an older
/// commit or a restored backup can move an mtime backward, and that
/// still means the content needs reindexing), and files that couldn't be
/// stat'd at all (so the worker can observe and report the failure
/// itself).
pub fn build_worklist(
    entries: Vec<ManifestEntry>,
    completed: &HashMap<String, f64>,
) -> Vec<ManifestEntry> {
    entries
        .into_iter()
        .filter(|entry| match current_mtime(entry) {
            None => true,
            Some((path, mtime)) => match completed.get(&path) {
                None => true,
                Some(&recorded) => mtime != recorded,
            },
        })
        .collect()
}
