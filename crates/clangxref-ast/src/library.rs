//! The process-wide libclang singleton.
//!
//! libclang's own initialization (`clang_sys::load` under the hood) can
//! only run once per process; a second attempt errors rather than
//! returning the existing handle. This wraps that in a `OnceCell` so a
//! worker process that calls [`AstLibrary::load`] more than once (e.g.
//! once at startup and again defensively before a parse) gets the same
//! handle back instead of a spurious error. In the bulk-index process
//! pool each child process has its own address space and thus its own
//! independent singleton, satisfying the "each process re-initializes
//! independently" contract.

use std::path::Path;

use once_cell::sync::OnceCell;

use crate::error::AstError;

static CLANG: OnceCell<clang::Clang> = OnceCell::new();

/// A handle to the loaded libclang library.
///
/// Cheap to hold: it borrows the process-wide singleton rather than
/// owning a second initialization.
pub struct AstLibrary {
    clang: &'static clang::Clang,
}

impl AstLibrary {
    /// Loads libclang from `lib_path`, or returns a handle to the
    /// already-loaded instance if this process has already called
    /// `load` once.
    ///
    /// `lib_path` is applied via `LIBCLANG_PATH` before the first
    /// initialization only; later calls ignore their `lib_path` argument
    /// since the library is already resident.
    pub fn load(lib_path: &Path) -> Result<Self, AstError> {
        if CLANG.get().is_none() {
            // Safety: performed once, before any other thread in this
            // process has a reason to read LIBCLANG_PATH (the worker
            // pool's child processes each call this exactly once at
            // startup, before spawning any other thread).
            unsafe {
                std::env::set_var("LIBCLANG_PATH", lib_path);
            }
        }
        let clang = CLANG.get_or_try_init(|| clang::Clang::new().map_err(AstError::LibraryLoad))?;
        Ok(Self { clang })
    }

    /// Opens a new parsing index against this library instance.
    ///
    /// `exclude_declarations_from_pch` and `display_diagnostics` are both
    /// left off: diagnostics are pulled explicitly per translation unit
    /// and logged via `tracing` rather than printed by libclang itself.
    pub fn new_index(&self) -> clang::Index<'static> {
        clang::Index::new(self.clang, false, false)
    }
}
