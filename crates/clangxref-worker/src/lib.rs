//! The stateless, per-file indexing worker.
//!
//! A worker resolves one `compile_commands.json` entry into a translation
//! unit, sanitizes its compile arguments, parses it, and walks the
//! resulting AST into symbol and reference rows. It never opens the
//! [`clangxref_store::Store`](../clangxref_store/struct.Store.html)
//! directly — the coordinator applies its [`WorkerOutcome`] to the store
//! on the worker's behalf, so the worker stays testable without a
//! database and safe to run out-of-process.

mod manifest;
mod outcome;
mod pipeline;

pub use manifest::ManifestEntry;
pub use outcome::WorkerOutcome;
pub use pipeline::index_one;
