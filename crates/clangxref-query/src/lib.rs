//! The read-only LSP query surface over the clangxref store.
//!
//! Every public function here does exactly one short store read (or, for
//! [`reindex_on_save`], spawns a background thread) — no AST parsing
//! happens on the request path. Position conversion between LSP's
//! 0-indexed wire coordinates and the store's 1-indexed physical
//! coordinates happens at the very top/bottom of each function, never
//! inside SQL.

mod identifier;
mod navigation;
mod position;
mod reindex;
mod symbols;

pub use navigation::{find_references, goto_definition};
pub use position::{Location, Position, Range};
pub use reindex::reindex_on_save;
pub use symbols::{document_symbols, workspace_symbols, SymbolInfo};
