//! Read-side row types returned by the query methods, plus the file
//! lifecycle status enum.
//!
//! The write-side row types (`SymbolRow`, `RefRow`) the worker emits and
//! `Store::save_index_result` consumes live in `clangxref-symbol-types`
//! so `clangxref-ast` can produce them without depending on the store.

use clangxref_symbol_types::SymbolKind;

pub use clangxref_symbol_types::{RefRow, SymbolRow};

/// A symbol paired with one of its source locations, as returned by the
/// document-symbol, workspace-symbol, and definition query methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolLocation {
    /// Spelling of the symbol.
    pub name: String,
    /// Categorical AST node kind.
    pub kind: SymbolKind,
    /// Canonical absolute path of this occurrence.
    pub file_path: String,
    /// 1-indexed start line.
    pub s_line: i64,
    /// 1-indexed start column.
    pub s_col: i64,
    /// 1-indexed end line.
    pub e_line: i64,
    /// 1-indexed end column.
    pub e_col: i64,
}

/// A reference occurrence as returned by the find-references query
/// methods, without the joined symbol metadata `SymbolLocation` carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefLocation {
    /// Canonical absolute path of this occurrence.
    pub file_path: String,
    /// 1-indexed start line.
    pub s_line: i64,
    /// 1-indexed start column.
    pub s_col: i64,
    /// 1-indexed end line.
    pub e_line: i64,
    /// 1-indexed end column.
    pub e_col: i64,
    /// Defining, calling, or merely referencing occurrence.
    pub role: clangxref_symbol_types::RefRole,
}

/// Lifecycle status of one source file's indexing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileIndexStatus {
    /// Currently being indexed (write in flight).
    Indexing,
    /// Indexed successfully; `refs`/`symbols` reflect the last `SUCCESS`.
    Completed,
    /// Last indexing attempt failed; rows may be stale or absent.
    Failed,
}

impl FileIndexStatus {
    /// The string form persisted in the `files.status` column.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            FileIndexStatus::Indexing => "indexing",
            FileIndexStatus::Completed => "completed",
            FileIndexStatus::Failed => "failed",
        }
    }

    /// Parses the stored string form back, defaulting unrecognized values
    /// to `Failed` so a corrupted or hand-edited row never gets treated
    /// as silently `Completed`.
    pub fn from_str(s: &str) -> Self {
        match s {
            "indexing" => FileIndexStatus::Indexing,
            "completed" => FileIndexStatus::Completed,
            _ => FileIndexStatus::Failed,
        }
    }
}
