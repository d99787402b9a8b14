//! The stateless per-file indexing pipeline.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use clangxref_ast::{parse_translation_unit, walk, AstLibrary};

use crate::manifest::ManifestEntry;
use crate::outcome::WorkerOutcome;

fn has_assembly_extension(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("S") | Some("s"))
}

fn mtime_seconds(path: &Path) -> Option<f64> {
    let metadata = std::fs::metadata(path).ok()?;
    let modified = metadata.modified().ok()?;
    modified.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs_f64())
}

/// libclang's own builtin headers directory, conventionally alongside
/// the loaded library (`<lib_path>/include`). Indexing still succeeds if
/// this directory doesn't exist — it is passed as a plain `-isystem`
/// argument, and libclang tolerates a missing search path — but standard
/// headers like `<stddef.h>` may then fail to resolve.
fn builtin_includes_dir(lib_path: &Path) -> PathBuf {
    lib_path.join("include")
}

/// Runs the full pipeline for one manifest entry: canonicalize, sanitize
/// arguments, parse, traverse. Pure and side-effect-free beyond the
/// `chdir` to `entry.directory` step 2 requires to anchor header
/// resolution — callers must not run two `index_one` calls concurrently
/// on the same thread/process (the process-pool worker model in
/// `clangxref-coordinator` satisfies this by construction).
pub fn index_one(entry: &ManifestEntry, lib_path: &Path) -> WorkerOutcome {
    let joined = Path::new(&entry.directory).join(&entry.file);

    if has_assembly_extension(&joined) {
        tracing::debug!(file = %entry.file, "skipping assembly source");
        return WorkerOutcome::Skip { file: entry.file.clone() };
    }

    let canonical = match std::fs::canonicalize(&joined) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(file = %entry.file, error = %e, "source file not found");
            return WorkerOutcome::Failed { file: entry.file.clone(), mtime: None };
        }
    };

    let Some(mtime) = mtime_seconds(&canonical) else {
        tracing::warn!(file = %entry.file, "could not read mtime");
        return WorkerOutcome::Failed { file: entry.file.clone(), mtime: None };
    };

    if std::env::set_current_dir(&entry.directory).is_err() {
        tracing::warn!(file = %entry.file, directory = %entry.directory, "chdir failed");
        return WorkerOutcome::Failed { file: entry.file.clone(), mtime: Some(mtime) };
    }

    let Some(raw_args) = entry.raw_args() else {
        tracing::warn!(file = %entry.file, "no arguments or command in manifest entry");
        return WorkerOutcome::Failed { file: entry.file.clone(), mtime: Some(mtime) };
    };
    if raw_args.is_empty() {
        tracing::warn!(file = %entry.file, "empty argument vector");
        return WorkerOutcome::Failed { file: entry.file.clone(), mtime: Some(mtime) };
    }
    let compiler_path = &raw_args[0];

    let builtin_includes = builtin_includes_dir(lib_path);
    let args = clangxref_argsan::sanitize(
        compiler_path,
        &raw_args,
        &canonical.display().to_string(),
        &entry.directory,
        &builtin_includes.display().to_string(),
    );

    let library = match AstLibrary::load(lib_path) {
        Ok(lib) => lib,
        Err(e) => {
            tracing::warn!(file = %entry.file, error = %e, "failed to load AST library");
            return WorkerOutcome::Failed { file: entry.file.clone(), mtime: Some(mtime) };
        }
    };
    let index = library.new_index();

    let unit = match parse_translation_unit(&index, &canonical, &args) {
        Ok(unit) => unit,
        Err(e) => {
            tracing::warn!(file = %entry.file, error = %e, "parse failed");
            return WorkerOutcome::Failed { file: entry.file.clone(), mtime: Some(mtime) };
        }
    };

    let (symbols, refs) = walk(&unit);
    tracing::debug!(file = %entry.file, symbols = symbols.len(), refs = refs.len(), "indexed file");

    WorkerOutcome::Success {
        file: canonical.display().to_string(),
        mtime,
        symbols,
        refs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembly_extensions_are_skipped() {
        assert!(has_assembly_extension(Path::new("foo.S")));
        assert!(has_assembly_extension(Path::new("foo.s")));
        assert!(!has_assembly_extension(Path::new("foo.c")));
    }

    #[test]
    fn missing_source_file_is_a_failure() {
        let entry = ManifestEntry {
            directory: "/tmp".to_string(),
            file: "does-not-exist-clangxref-test.c".to_string(),
            arguments: Some(vec!["cc".to_string()]),
            command: None,
        };
        let outcome = index_one(&entry, Path::new("/nonexistent/libclang"));
        assert!(matches!(outcome, WorkerOutcome::Failed { mtime: None, .. }));
    }

    #[test]
    fn builtin_includes_dir_is_the_lib_path_include_subdirectory() {
        assert_eq!(
            builtin_includes_dir(Path::new("/opt/llvm/lib")),
            PathBuf::from("/opt/llvm/lib/include")
        );
    }
}
