//! JSON-RPC protocol types, method name constants, and capability
//! negotiation for the clangxref LSP server.
//!
//! This crate isolates wire-protocol types from the server runtime so they
//! can be shared between the binary's event loop and anything that wants to
//! construct or inspect LSP frames without pulling in the indexing engine.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod capabilities;
mod errors;
mod jsonrpc;
pub mod methods;

pub use errors::*;
pub use jsonrpc::*;
