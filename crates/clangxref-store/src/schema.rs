//! Schema DDL and pragma configuration.
//!
//! Table and column names/order follow `database.py`'s original schema
//! exactly (`files(file_path, mtime, status)`, not `file_status`), so
//! anything that inspects `clangxref_index.db` directly with `sqlite3`
//! sees the same shape.

pub(crate) const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS symbols (
    usr  TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    kind TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS refs (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    usr        TEXT NOT NULL,
    caller_usr TEXT,
    file_path  TEXT NOT NULL,
    s_line     INTEGER NOT NULL,
    s_col      INTEGER NOT NULL,
    e_line     INTEGER NOT NULL,
    e_col      INTEGER NOT NULL,
    role       TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS files (
    file_path TEXT PRIMARY KEY,
    mtime     REAL NOT NULL,
    status    TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_symbols_name ON symbols(name);
CREATE INDEX IF NOT EXISTS idx_refs_usr ON refs(usr);
CREATE INDEX IF NOT EXISTS idx_refs_caller_usr ON refs(caller_usr);
CREATE INDEX IF NOT EXISTS idx_refs_file_path_role ON refs(file_path, role);
";

/// Pragmas applied to every connection, primary or not: WAL journaling,
/// relaxed-durability synchronous flushing, and a long busy timeout so
/// writers serialize instead of failing under normal contention.
pub(crate) const BASE_PRAGMAS: &[(&str, &str)] = &[
    ("journal_mode", "WAL"),
    ("synchronous", "NORMAL"),
    ("busy_timeout", "60000"),
];

/// Pragmas applied by [`crate::Store::enable_speed_mode`] for bulk initial
/// indexing: no fsync on commit, in-memory journal, large page cache.
/// Crash-safe only up to the last committed transaction while active.
pub(crate) const SPEED_MODE_PRAGMAS: &[(&str, &str)] = &[
    ("synchronous", "OFF"),
    ("journal_mode", "MEMORY"),
    ("cache_size", "-100000"),
];
