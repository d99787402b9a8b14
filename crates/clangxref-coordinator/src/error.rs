//! The coordinator's error type.

use thiserror::Error;

/// Errors raised while running a bulk indexing pass.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// `compile_commands.json` could not be read.
    #[error("failed to read manifest: {0}")]
    Manifest(#[from] std::io::Error),
    /// `compile_commands.json` did not parse as the expected shape.
    #[error("failed to parse manifest: {0}")]
    ManifestJson(#[from] serde_json::Error),
    /// The store could not be opened or written to.
    #[error("store error: {0}")]
    Store(#[from] clangxref_store::StoreError),
}
