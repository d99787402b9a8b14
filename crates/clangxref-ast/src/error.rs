//! AST binding error taxonomy.

/// Errors surfaced by the libclang binding.
#[derive(Debug, thiserror::Error)]
pub enum AstError {
    /// libclang could not be loaded from the configured library path.
    #[error("failed to load libclang: {0}")]
    LibraryLoad(String),

    /// Parsing a translation unit failed outright (distinct from
    /// diagnostics, which are logged but don't fail the parse).
    #[error("parse failed: {0}")]
    Parse(String),
}
