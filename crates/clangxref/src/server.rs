//! The LSP stdio event loop.
//!
//! A single cooperative loop reads one framed [`JsonRpcRequest`] at a
//! time from stdin, dispatches it to the read-only
//! [`clangxref_query`] surface (every query is one short `Store` read;
//! nothing here ever parses an AST on the request path), and writes one
//! framed response back to stdout. `textDocument/didSave` is the one
//! notification that does real work: it looks the saved file up in the
//! manifest map built at startup and fires [`reindex_on_save`], which
//! runs on a detached background thread so the event loop is never
//! blocked waiting on a reparse.

use std::collections::HashMap;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use clangxref_protocol::capabilities::AdvertisedFeatures;
use clangxref_protocol::{methods, JsonRpcError, JsonRpcResponse, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND};
use clangxref_query::{document_symbols, find_references, goto_definition, reindex_on_save, workspace_symbols};
use clangxref_store::Store;
use clangxref_worker::ManifestEntry;

fn store_path(workspace_dir: &Path) -> PathBuf {
    workspace_dir.join("clangxref_index.db")
}

/// Builds `{canonical file path -> manifest entry}` from
/// `compile_commands.json`, used to resolve the entry a `didSave`
/// notification should reindex. Files that can't be canonicalized (not
/// yet created, deleted since the manifest was written) are simply
/// absent from the map; a save notification for them is a no-op, same as
/// the LSP client never having opened them.
fn build_manifest_map(workspace_dir: &Path) -> HashMap<String, ManifestEntry> {
    let manifest_path = workspace_dir.join("compile_commands.json");
    let Ok(text) = std::fs::read_to_string(&manifest_path) else {
        tracing::warn!(path = %manifest_path.display(), "no manifest found; on-save reindex disabled");
        return HashMap::new();
    };
    let entries: Vec<ManifestEntry> = match serde_json::from_str(&text) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "manifest did not parse; on-save reindex disabled");
            return HashMap::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| {
            let joined = Path::new(&entry.directory).join(&entry.file);
            let canonical = std::fs::canonicalize(&joined).ok()?;
            Some((canonical.display().to_string(), entry))
        })
        .collect()
}

/// Reads `path` from disk, returning an empty string on any I/O failure.
///
/// Used for the name-fallback identifier extraction in
/// [`goto_definition`]/[`find_references`]: the live buffer, not
/// anything cached, per spec.md §4.5. An unreadable file degrades to an
/// empty-string scan (which finds no identifier and the fallback
/// yields an empty result), never an error response to the editor.
fn read_file_text(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

struct TextDocumentPosition {
    file_path: String,
    line_0: u32,
    character_0: u32,
}

fn parse_text_document_position(params: &Value) -> Option<TextDocumentPosition> {
    let uri = params.get("textDocument")?.get("uri")?.as_str()?;
    let file_path = clangxref_uri::uri_to_fs_path(uri)?.display().to_string();
    let position = params.get("position")?;
    let line_0 = position.get("line")?.as_u64()? as u32;
    let character_0 = position.get("character")?.as_u64()? as u32;
    Some(TextDocumentPosition { file_path, line_0, character_0 })
}

fn location_to_json(loc: &clangxref_query::Location) -> Value {
    let uri = clangxref_uri::fs_path_to_uri(&loc.file_path).unwrap_or_else(|_| loc.file_path.clone());
    json!({
        "uri": uri,
        "range": {
            "start": { "line": loc.range.start.line, "character": loc.range.start.character },
            "end": { "line": loc.range.end.line, "character": loc.range.end.character },
        }
    })
}

fn symbol_info_to_document_symbol(info: &clangxref_query::SymbolInfo) -> Value {
    let kind = info.kind.to_lsp_kind();
    let range = json!({
        "start": { "line": info.range.start.line, "character": info.range.start.character },
        "end": { "line": info.range.end.line, "character": info.range.end.character },
    });
    json!({
        "name": info.name,
        "kind": kind,
        "range": range,
        "selectionRange": range,
    })
}

fn symbol_info_to_symbol_information(info: &clangxref_query::SymbolInfo) -> Value {
    let uri = clangxref_uri::fs_path_to_uri(&info.file_path).unwrap_or_else(|_| info.file_path.clone());
    json!({
        "name": info.name,
        "kind": info.kind.to_lsp_kind(),
        "location": {
            "uri": uri,
            "range": {
                "start": { "line": info.range.start.line, "character": info.range.start.character },
                "end": { "line": info.range.end.line, "character": info.range.end.character },
            }
        }
    })
}

/// Owns everything the event loop needs for the lifetime of the
/// connection: the read-only store handle, the manifest map for on-save
/// dispatch, and where to find the AST library for a reindex.
struct Server {
    store: Store,
    manifest: HashMap<String, ManifestEntry>,
    lib_path: PathBuf,
    store_path: PathBuf,
    shutting_down: bool,
}

impl Server {
    fn handle_request(&mut self, method: &str, params: Option<Value>) -> Result<Value, JsonRpcError> {
        if self.shutting_down && method != methods::SHUTDOWN {
            return Err(JsonRpcError::new(INVALID_REQUEST, "server is shutting down"));
        }
        match method {
            methods::INITIALIZE => Ok(json!({
                "capabilities": AdvertisedFeatures::default().to_server_capabilities(),
            })),
            methods::SHUTDOWN => {
                self.shutting_down = true;
                Ok(Value::Null)
            }
            methods::TEXT_DOCUMENT_DEFINITION => {
                let params = params.unwrap_or(Value::Null);
                let Some(pos) = parse_text_document_position(&params) else {
                    return Err(JsonRpcError::new(INVALID_PARAMS, "invalid textDocument/definition params"));
                };
                let text = read_file_text(&pos.file_path);
                match goto_definition(&self.store, &pos.file_path, pos.line_0, pos.character_0, &text) {
                    Ok(locations) => Ok(Value::Array(locations.iter().map(location_to_json).collect())),
                    Err(e) => {
                        tracing::warn!(error = %e, "goto_definition query failed");
                        Ok(Value::Array(Vec::new()))
                    }
                }
            }
            methods::TEXT_DOCUMENT_REFERENCES => {
                let params = params.unwrap_or(Value::Null);
                let Some(pos) = parse_text_document_position(&params) else {
                    return Err(JsonRpcError::new(INVALID_PARAMS, "invalid textDocument/references params"));
                };
                let text = read_file_text(&pos.file_path);
                match find_references(&self.store, &pos.file_path, pos.line_0, pos.character_0, &text) {
                    Ok(locations) => Ok(Value::Array(locations.iter().map(location_to_json).collect())),
                    Err(e) => {
                        tracing::warn!(error = %e, "find_references query failed");
                        Ok(Value::Array(Vec::new()))
                    }
                }
            }
            methods::TEXT_DOCUMENT_DOCUMENT_SYMBOL => {
                let params = params.unwrap_or(Value::Null);
                let Some(uri) = params.get("textDocument").and_then(|td| td.get("uri")).and_then(|u| u.as_str()) else {
                    return Err(JsonRpcError::new(INVALID_PARAMS, "invalid textDocument/documentSymbol params"));
                };
                let Some(file_path) = clangxref_uri::uri_to_fs_path(uri).map(|p| p.display().to_string()) else {
                    return Ok(Value::Array(Vec::new()));
                };
                match document_symbols(&self.store, &file_path) {
                    Ok(symbols) => Ok(Value::Array(symbols.iter().map(symbol_info_to_document_symbol).collect())),
                    Err(e) => {
                        tracing::warn!(error = %e, "document_symbols query failed");
                        Ok(Value::Array(Vec::new()))
                    }
                }
            }
            methods::WORKSPACE_SYMBOL => {
                let query = params
                    .as_ref()
                    .and_then(|p| p.get("query"))
                    .and_then(|q| q.as_str())
                    .unwrap_or("");
                match workspace_symbols(&self.store, query) {
                    Ok(symbols) => Ok(Value::Array(symbols.iter().map(symbol_info_to_symbol_information).collect())),
                    Err(e) => {
                        tracing::warn!(error = %e, "workspace_symbols query failed");
                        Ok(Value::Array(Vec::new()))
                    }
                }
            }
            _ => Err(JsonRpcError::new(METHOD_NOT_FOUND, format!("method not found: {method}"))),
        }
    }

    /// `textDocument/didSave`: fire-and-forget incremental reindex. Per
    /// spec.md §4.5/§7, this must not block the event loop and must not
    /// propagate errors back to the editor — failures are logged inside
    /// [`reindex_on_save`] itself.
    fn handle_did_save(&self, params: Option<Value>) {
        let Some(uri) = params.as_ref().and_then(|p| p.get("textDocument")).and_then(|td| td.get("uri")).and_then(|u| u.as_str()) else {
            return;
        };
        let Some(file_path) = clangxref_uri::uri_to_fs_path(uri) else {
            return;
        };
        let file_path = file_path.display().to_string();
        let Some(entry) = self.manifest.get(&file_path).cloned() else {
            tracing::debug!(file = %file_path, "saved file not in manifest; skipping reindex");
            return;
        };
        tracing::info!(file = %file_path, "dispatching on-save reindex");
        reindex_on_save(entry, self.lib_path.clone(), self.store_path.clone());
    }
}

/// Runs the LSP server over stdio until the client sends `exit` or
/// stdin closes, whichever comes first.
pub fn run(workspace_dir: &Path, lib_path: &Path) -> anyhow::Result<()> {
    let store = Store::open(&store_path(workspace_dir), false)?;
    let manifest = build_manifest_map(workspace_dir);

    let mut server = Server {
        store,
        manifest,
        lib_path: lib_path.to_path_buf(),
        store_path: store_path(workspace_dir),
        shutting_down: false,
    };

    let mut reader = BufReader::new(std::io::stdin());
    let mut stdout = std::io::stdout();

    loop {
        let request = match clangxref_transport::read_message(&mut reader) {
            Ok(Some(request)) => request,
            Ok(None) => {
                tracing::info!("client closed stdin; exiting");
                break;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read LSP frame; exiting");
                break;
            }
        };

        if request.method == methods::EXIT {
            tracing::info!("received exit notification");
            break;
        }

        if request.method == methods::TEXT_DOCUMENT_DID_SAVE {
            server.handle_did_save(request.params);
            continue;
        }
        if request.method == methods::INITIALIZED {
            continue;
        }

        let Some(id) = request.id.clone() else {
            // An unhandled notification: LSP says these get no response.
            continue;
        };

        let response = match server.handle_request(&request.method, request.params) {
            Ok(result) => JsonRpcResponse::success(Some(id), result),
            Err(error) => JsonRpcResponse::error(Some(id), error),
        };
        clangxref_transport::log_response(&response);
        if let Err(e) = clangxref_transport::write_message(&mut stdout, &response) {
            tracing::warn!(error = %e, "failed to write LSP frame; exiting");
            break;
        }
        let _ = stdout.flush();
    }

    Ok(())
}
