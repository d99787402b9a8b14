//! LSP method name constants for standardized request/notification routing.
//!
//! This module centralizes the identifiers for every LSP method the server
//! actually dispatches. Keeping them as constants (rather than inline string
//! literals scattered through the dispatch match) avoids typo-class bugs and
//! gives the dispatcher a single place to update if a method name ever
//! changes across LSP revisions.
//!
//! # Usage
//!
//! ```rust
//! use clangxref_protocol::methods;
//!
//! fn handle_request(method: &str) {
//!     match method {
//!         methods::INITIALIZE => handle_initialize(),
//!         methods::TEXT_DOCUMENT_DEFINITION => handle_definition(),
//!         methods::WORKSPACE_SYMBOL => handle_workspace_symbol(),
//!         methods::SHUTDOWN => handle_shutdown(),
//!         _ => handle_unknown_method(),
//!     }
//! }
//! # fn handle_initialize() {}
//! # fn handle_definition() {}
//! # fn handle_workspace_symbol() {}
//! # fn handle_shutdown() {}
//! # fn handle_unknown_method() {}
//! ```

// ============================================================================
// Lifecycle
// ============================================================================

/// Initialize request - first request from client to server.
pub const INITIALIZE: &str = "initialize";

/// Initialized notification - sent after the initialize response.
pub const INITIALIZED: &str = "initialized";

/// Shutdown request - graceful server shutdown.
pub const SHUTDOWN: &str = "shutdown";

/// Exit notification - terminate server process.
pub const EXIT: &str = "exit";

// ============================================================================
// Text document synchronization
// ============================================================================

/// Document saved notification; triggers incremental reindex.
pub const TEXT_DOCUMENT_DID_SAVE: &str = "textDocument/didSave";

// ============================================================================
// Navigation and symbols (the query surface)
// ============================================================================

/// Go-to-definition request.
pub const TEXT_DOCUMENT_DEFINITION: &str = "textDocument/definition";

/// Find-references request.
pub const TEXT_DOCUMENT_REFERENCES: &str = "textDocument/references";

/// Document symbol / outline request.
pub const TEXT_DOCUMENT_DOCUMENT_SYMBOL: &str = "textDocument/documentSymbol";

/// Workspace-wide fuzzy symbol search request.
pub const WORKSPACE_SYMBOL: &str = "workspace/symbol";
