//! `clangxref` — a C/C++ code-intelligence backend: parses a
//! `compile_commands.json`-described project via libclang, persists the
//! resulting symbol/reference graph to an embedded SQLite store, and
//! serves LSP queries from it.
//!
//! Without `--server`, runs one incremental bulk-index pass over
//! `--directory` and exits. With `--server`, serves the LSP query
//! surface on stdio instead. The hidden `--index-worker` flag is the
//! coordinator's own child-process entry point and is not meant to be
//! invoked directly.

mod cli;
mod index_worker;
mod server;

use std::path::PathBuf;

use clap::Parser;

use cli::Cli;

const LIB_PATH_ENV_VAR: &str = "CLANGXREF_LIB_PATH";

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn resolve_lib_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    let path = match &cli.libpath {
        Some(path) => path.clone(),
        None => std::env::var_os(LIB_PATH_ENV_VAR)
            .map(PathBuf::from)
            .ok_or_else(|| anyhow::anyhow!("no AST library path given (-l/--libpath or {LIB_PATH_ENV_VAR})"))?,
    };

    // A cheap fail-fast check: an obviously wrong `-l` (typo'd or never
    // created) is the ASTLibraryError of spec.md §7 and should abort
    // before dispatching any work, rather than silently failing every
    // file one at a time. Whether `path` actually contains a loadable
    // libclang is left to the worker processes that load it lazily —
    // the coordinator process itself never touches the AST library.
    if !path.is_dir() {
        anyhow::bail!("AST library path does not exist or is not a directory: {}", path.display());
    }
    Ok(path)
}

fn main() {
    let cli = Cli::parse();

    if cli.index_worker {
        // The index-worker child writes WorkerOutcome frames to stdout;
        // logging must stay on stderr so it never corrupts that stream.
        init_logging();
        if let Err(e) = index_worker::run() {
            tracing::error!(error = %e, "index-worker loop exited with an error");
            std::process::exit(1);
        }
        return;
    }

    init_logging();

    let lib_path = match resolve_lib_path(&cli) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("clangxref: {e}");
            std::process::exit(1);
        }
    };

    if cli.server {
        if let Err(e) = server::run(&cli.directory, &lib_path) {
            eprintln!("clangxref: {e}");
            std::process::exit(1);
        }
        return;
    }

    match clangxref_coordinator::run_index(&cli.directory, &lib_path, cli.job_count()) {
        Ok(summary) => {
            tracing::info!(?summary, "bulk index complete");
        }
        Err(e) => {
            eprintln!("clangxref: {e}");
            std::process::exit(1);
        }
    }
}
