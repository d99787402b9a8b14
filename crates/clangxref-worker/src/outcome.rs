//! The worker's output tuple.

use serde::{Deserialize, Serialize};

use clangxref_symbol_types::{RefRow, SymbolRow};

/// The result of running one manifest entry through the worker pipeline.
///
/// Mirrors the original `(status, file, mtime, symbols[], refs[])` tuple
/// as a Rust enum so `Failed`/`Skip` can't accidentally carry stale
/// `symbols`/`refs` data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WorkerOutcome {
    /// Parse and traversal completed; `symbols`/`refs` are ready to apply
    /// to the store.
    Success {
        /// Canonical (symlink-resolved) absolute source path.
        file: String,
        /// Modification time observed at the start of indexing, seconds
        /// since the Unix epoch.
        mtime: f64,
        /// Emitted symbol dictionary rows.
        symbols: Vec<SymbolRow>,
        /// Emitted reference rows.
        refs: Vec<RefRow>,
    },
    /// The file's argument resolution, parse, or traversal raised an
    /// error; the coordinator should mark the file `failed` and continue.
    Failed {
        /// The manifest entry's file, as given (not canonicalized — the
        /// canonicalization itself may be what failed).
        file: String,
        /// Modification time observed before the failure, if the pipeline
        /// got far enough to read one. `None` when the failure happened
        /// during path canonicalization or the mtime read itself, the two
        /// points where no mtime is obtainable at all.
        mtime: Option<f64>,
    },
    /// The file was intentionally not indexed (an assembly source).
    Skip {
        /// The manifest entry's file, as given.
        file: String,
    },
}
