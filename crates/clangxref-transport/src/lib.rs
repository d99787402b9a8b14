//! LSP transport layer for clangxref.
//!
//! Implements the LSP Base Protocol's Content-Length message framing over
//! stdio, independent of what methods are actually served above it.
//!
//! # Overview
//!
//! The LSP Base Protocol frames every message with a `Content-Length`
//! header followed by a blank line and a UTF-8 JSON body. This crate
//! provides:
//!
//! - [`read_message`] - Read and parse one framed request/notification.
//! - [`write_message`] - Write a framed response.
//! - [`write_notification`] - Write a framed notification.
//! - [`log_response`] - Debug-log an outgoing response via `tracing`.
//!
//! # Example
//!
//! ```no_run
//! use std::io::{BufReader, stdin, stdout};
//! use clangxref_transport::{read_message, write_message};
//! use clangxref_protocol::JsonRpcResponse;
//!
//! let mut reader = BufReader::new(stdin());
//! let mut writer = stdout();
//!
//! if let Ok(Some(request)) = read_message(&mut reader) {
//!     let response = JsonRpcResponse::null(request.id);
//!     write_message(&mut writer, &response).unwrap();
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod framing;

pub use framing::{log_response, read_message, write_message, write_notification};
