//! Symbol and reference-role taxonomy shared across the indexing pipeline.
//!
//! This crate is the single place that names what an AST node *is*: the
//! [`SymbolKind`] a definition belongs to, and the [`RefRole`] an occurrence
//! plays. Both are closed-ish enums — `SymbolKind` carries an `Other`
//! catch-all so a future libclang cursor kind degrades to a stored string
//! instead of a panic; `RefRole` is a strict three-variant set because the
//! on-disk schema hard-codes `'def' | 'call' | 'ref'`.

use serde::{Deserialize, Serialize};

/// Categorical tag for a [`Symbol`](https://docs.rs/clangxref-store)'s AST
/// node kind.
///
/// Maps one-to-one onto the node kinds named in the indexing
/// specification: function, method, struct/class, variable, field,
/// typedef, enum, enum-constant, macro. `Other` absorbs anything a newer
/// AST library version reports that this enum doesn't yet know about, so
/// that an upstream upgrade degrades gracefully rather than panicking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Function,
    Method,
    Struct,
    Class,
    Variable,
    Field,
    Typedef,
    Enum,
    EnumConstant,
    Macro,
    /// Any AST node kind not covered above, carrying the library's own
    /// name for it.
    Other(String),
}

impl SymbolKind {
    /// The string form persisted in the `symbols.kind` column.
    ///
    /// Stable across releases: anything that reads `clangxref_index.db`
    /// directly with `sqlite3` sees these exact strings.
    pub fn as_str(&self) -> &str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
            SymbolKind::Struct => "struct",
            SymbolKind::Class => "class",
            SymbolKind::Variable => "variable",
            SymbolKind::Field => "field",
            SymbolKind::Typedef => "typedef",
            SymbolKind::Enum => "enum",
            SymbolKind::EnumConstant => "enum-constant",
            SymbolKind::Macro => "macro",
            SymbolKind::Other(s) => s.as_str(),
        }
    }

    /// Parses the stored string form back into a `SymbolKind`.
    ///
    /// Unrecognized strings round-trip through `Other` rather than
    /// failing; the store never rejects a row it previously wrote.
    pub fn from_str(s: &str) -> Self {
        match s {
            "function" => SymbolKind::Function,
            "method" => SymbolKind::Method,
            "struct" => SymbolKind::Struct,
            "class" => SymbolKind::Class,
            "variable" => SymbolKind::Variable,
            "field" => SymbolKind::Field,
            "typedef" => SymbolKind::Typedef,
            "enum" => SymbolKind::Enum,
            "enum-constant" => SymbolKind::EnumConstant,
            "macro" => SymbolKind::Macro,
            other => SymbolKind::Other(other.to_string()),
        }
    }

    /// Whether this kind is eligible for definition emission per the
    /// worker's traversal rules (the `is_definition()`-gated set, plus
    /// macro which has no such gate).
    #[inline]
    pub fn is_definition_eligible(&self) -> bool {
        matches!(
            self,
            SymbolKind::Function
                | SymbolKind::Method
                | SymbolKind::Struct
                | SymbolKind::Class
                | SymbolKind::Variable
                | SymbolKind::Field
                | SymbolKind::Typedef
                | SymbolKind::Enum
                | SymbolKind::EnumConstant
                | SymbolKind::Macro
        )
    }

    /// The LSP `SymbolKind` numeric code for document/workspace symbol
    /// responses.
    #[inline]
    pub const fn to_lsp_kind(&self) -> u32 {
        match self {
            SymbolKind::Function => 12,
            SymbolKind::Method => 6,
            SymbolKind::Struct => 23,
            SymbolKind::Class => 5,
            SymbolKind::Variable => 13,
            SymbolKind::Field => 8,
            SymbolKind::Typedef => 5,
            SymbolKind::Enum => 10,
            SymbolKind::EnumConstant => 22,
            SymbolKind::Macro => 14,
            SymbolKind::Other(_) => 1, // File, as a harmless default
        }
    }
}

/// The semantic role an occurrence of a symbol plays at one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefRole {
    /// The defining declaration.
    Def,
    /// A call-expression occurrence.
    Call,
    /// Any other reference (declaration-reference, member-reference,
    /// type-reference, overloaded-declaration-reference).
    Ref,
}

impl RefRole {
    /// The string form persisted in the `refs.role` column.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            RefRole::Def => "def",
            RefRole::Call => "call",
            RefRole::Ref => "ref",
        }
    }

    /// Parses the stored string form. Unknown strings fall back to
    /// `Ref` rather than failing the row read — a role column is never
    /// written with anything but these three values, but treating an
    /// unexpected value as the least-specific role keeps query code
    /// infallible.
    pub fn from_str(s: &str) -> Self {
        match s {
            "def" => RefRole::Def,
            "call" => RefRole::Call,
            _ => RefRole::Ref,
        }
    }
}

/// One row destined for the `symbols` dictionary: the worker's emitted
/// identity for a program entity, before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRow {
    /// Unique Stable identifier, the dictionary's primary key.
    pub usr: String,
    /// Spelling of the symbol.
    pub name: String,
    /// Categorical AST node kind.
    pub kind: SymbolKind,
}

/// One row destined for the `refs` table: an occurrence of a symbol at a
/// source location, as emitted by the worker.
///
/// Positions are 1-indexed `(line, col)` pairs, matching the store's
/// at-rest representation; LSP's 0-indexed wire positions are converted
/// only at the query boundary, never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefRow {
    /// Foreign key into `symbols.usr`.
    pub usr: String,
    /// The enclosing declaration's USR, when the occurrence is a call or
    /// reference inside a declaration body.
    pub caller_usr: Option<String>,
    /// Canonical absolute path (symlinks resolved) of the occurrence.
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
    pub role: RefRole,
}
