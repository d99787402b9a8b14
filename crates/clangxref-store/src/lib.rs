//! The embedded relational store for clangxref's symbol/reference graph.
//!
//! Wraps `rusqlite` (bundled SQLite) behind the three-table schema the
//! indexing and query engine shares: `symbols` (the USR-keyed dictionary),
//! `refs` (occurrences), and `files` (per-file indexing lifecycle). A
//! single-writer discipline is enforced by convention, not by locking in
//! this crate: only the coordinator process and the on-save background
//! thread ever open a write-capable `Store`.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod retry;
mod rows;
mod schema;
mod store;

pub use error::StoreError;
pub use retry::with_retry;
pub use rows::{FileIndexStatus, RefLocation, RefRow, SymbolLocation, SymbolRow};
pub use store::Store;
