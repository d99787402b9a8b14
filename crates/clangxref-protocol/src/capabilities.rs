//! LSP server capability negotiation for clangxref.
//!
//! Centralizes what the server advertises in its `initialize` response,
//! matching the fixed query surface the engine serves: go-to-definition,
//! find-references, document symbols, and workspace symbol search, plus
//! `textDocument/didSave` for incremental reindexing.

use serde_json::{json, Value};

/// LSP features advertised to clients during `initialize`.
///
/// clangxref's query surface is fixed (it is not a general IDE backend),
/// so unlike a full-featured LSP server this struct has no build-time
/// feature gating: every field here is always `true` in the shipped
/// binary. It stays a struct rather than a constant JSON blob because
/// tests construct partial capability sets to exercise the dispatcher's
/// method-filtering behavior.
#[derive(Debug, Clone, Copy)]
pub struct AdvertisedFeatures {
    /// Go-to-definition navigation.
    pub definition: bool,
    /// Find-all-references.
    pub references: bool,
    /// Document symbol outline.
    pub document_symbol: bool,
    /// Workspace-wide fuzzy symbol search.
    pub workspace_symbol: bool,
    /// Save notifications (drives incremental reindex, not itself an LSP
    /// "provider" capability).
    pub did_save: bool,
}

impl Default for AdvertisedFeatures {
    fn default() -> Self {
        Self {
            definition: true,
            references: true,
            document_symbol: true,
            workspace_symbol: true,
            did_save: true,
        }
    }
}

impl AdvertisedFeatures {
    /// Renders the advertised features as an LSP `ServerCapabilities` JSON
    /// object suitable for embedding in the `initialize` response's
    /// `result.capabilities`.
    pub fn to_server_capabilities(self) -> Value {
        let mut caps = serde_json::Map::new();
        if self.definition {
            caps.insert("definitionProvider".to_string(), json!(true));
        }
        if self.references {
            caps.insert("referencesProvider".to_string(), json!(true));
        }
        if self.document_symbol {
            caps.insert("documentSymbolProvider".to_string(), json!(true));
        }
        if self.workspace_symbol {
            caps.insert("workspaceSymbolProvider".to_string(), json!(true));
        }
        if self.did_save {
            caps.insert(
                "textDocumentSync".to_string(),
                json!({ "openClose": false, "change": 0, "save": { "includeText": false } }),
            );
        }
        Value::Object(caps)
    }
}
