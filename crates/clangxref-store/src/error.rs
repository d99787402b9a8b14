//! Store error taxonomy.

/// Errors surfaced by the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The retry budget (10 attempts, base 50ms exponential backoff with
    /// jitter) was exhausted while the database stayed `busy`/`locked`.
    #[error("store busy: retry budget exhausted after {attempts} attempts")]
    Busy {
        /// Number of attempts made before giving up.
        attempts: u32,
    },

    /// The schema could not be created or is incompatible.
    #[error("store schema error: {0}")]
    Schema(String),

    /// A disk-level or otherwise unrecoverable SQLite failure.
    #[error("store disk error: {0}")]
    Disk(#[from] rusqlite::Error),
}
