//! Document- and workspace-symbol query types and methods.

use clangxref_store::{SymbolLocation, StoreError, Store};
use clangxref_symbol_types::SymbolKind;

use crate::position::{to_range, Range};

/// One entry of a document- or workspace-symbol response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolInfo {
    /// Spelling of the symbol.
    pub name: String,
    /// Categorical AST node kind.
    pub kind: SymbolKind,
    /// Canonical absolute path this occurrence was defined in.
    pub file_path: String,
    /// 0-indexed range of the definition.
    pub range: Range,
}

fn to_symbol_info(loc: SymbolLocation) -> SymbolInfo {
    SymbolInfo {
        name: loc.name,
        kind: loc.kind,
        file_path: loc.file_path.clone(),
        range: to_range(loc.s_line, loc.s_col, loc.e_line, loc.e_col),
    }
}

/// `textDocument/documentSymbol`: every definition in `file`, in
/// ascending source order.
pub fn document_symbols(store: &Store, file: &str) -> Result<Vec<SymbolInfo>, StoreError> {
    Ok(store.symbols_by_file(file)?.into_iter().map(to_symbol_info).collect())
}

/// `workspace/symbol`: a fuzzy `%query%` match over definition names,
/// capped at 100 rows by the store.
pub fn workspace_symbols(store: &Store, query: &str) -> Result<Vec<SymbolInfo>, StoreError> {
    Ok(store.search_symbols(query)?.into_iter().map(to_symbol_info).collect())
}
