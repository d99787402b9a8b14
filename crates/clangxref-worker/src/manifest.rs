//! The compile-command manifest entry shape.

use serde::{Deserialize, Serialize};

/// One entry of a `compile_commands.json`-style manifest.
///
/// `arguments` (a token vector) is preferred; `command` (a shell-quoted
/// string) is accepted as a fallback and shell-split before sanitization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// The directory the compile command should be interpreted relative
    /// to; also used to anchor header resolution via `chdir`.
    pub directory: String,
    /// The source file path, relative to `directory` unless absolute.
    pub file: String,
    /// Token-vector compile arguments, including the compiler itself at
    /// index 0.
    #[serde(default)]
    pub arguments: Option<Vec<String>>,
    /// A shell-quoted compile command string, used when `arguments` is
    /// absent.
    #[serde(default)]
    pub command: Option<String>,
}

impl ManifestEntry {
    /// Resolves this entry's raw argv, preferring `arguments` and
    /// shell-splitting `command` otherwise.
    ///
    /// Returns `None` if neither field is present, or if `command` fails
    /// to shell-split (unbalanced quoting).
    pub fn raw_args(&self) -> Option<Vec<String>> {
        if let Some(args) = &self.arguments {
            return Some(args.clone());
        }
        self.command.as_deref().and_then(shlex::split)
    }
}
