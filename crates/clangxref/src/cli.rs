//! Command-line surface.

use std::path::PathBuf;

use clap::Parser;

/// Incremental C/C++ code-intelligence backend.
///
/// Without `--server`, indexes `compile_commands.json` under
/// `--directory` and exits. With `--server`, serves the LSP query
/// surface on stdio instead.
#[derive(Debug, Parser)]
#[command(name = "clangxref", version, about)]
pub struct Cli {
    /// Workspace directory containing `compile_commands.json`.
    #[arg(short, long)]
    pub directory: PathBuf,

    /// Directory the AST library (libclang) can be loaded from. Falls
    /// back to `CLANGXREF_LIB_PATH` if not given.
    #[arg(short, long)]
    pub libpath: Option<PathBuf>,

    /// Run as an LSP server on stdio instead of a one-shot bulk index.
    #[arg(short, long)]
    pub server: bool,

    /// Parallel worker process count. Values `<= 0` are treated as 1.
    #[arg(short, long, default_value_t = 1)]
    pub jobs: i64,

    /// Internal: run as a coordinator worker-pool child process,
    /// reading tasks from stdin and writing outcomes to stdout.
    #[arg(long, hide = true)]
    pub index_worker: bool,
}

impl Cli {
    /// Resolves the effective worker-process count, per spec.md §6:
    /// non-positive values collapse to 1.
    pub fn job_count(&self) -> usize {
        if self.jobs <= 0 {
            1
        } else {
            self.jobs as usize
        }
    }
}
