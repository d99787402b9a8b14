//! Name-fallback identifier extraction.
//!
//! Carried over from `pyclangd_server.py`'s `lsp_definition`/
//! `lsp_references` name-fallback path: when the precise USR lookup
//! misses, the identifier under the cursor is re-extracted from the
//! live file text (not anything cached, since the store may be stale
//! relative to unsaved edits) by a plain `[A-Za-z_][A-Za-z0-9_]*` regex
//! match containing the requested column.

use regex::Regex;
use std::sync::OnceLock;

fn identifier_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").ok()).as_ref()
}

/// Extracts the identifier on `line_0` (0-indexed) of `file_text` that
/// contains `character_0` (0-indexed). The match is inclusive at both
/// ends (`start <= character_0 <= end`), so a cursor positioned one
/// column past the last character of an identifier — a common resting
/// place for an editor's cursor right after `foo` in `foo()` — still
/// resolves. Returns `None` if `line_0` is out of range or no identifier
/// covers that column.
pub fn identifier_at(file_text: &str, line_0: u32, character_0: u32) -> Option<String> {
    let line = file_text.lines().nth(line_0 as usize)?;
    identifier_pattern()?
        .find_iter(line)
        .find(|m| (m.start() as u32) <= character_0 && character_0 <= (m.end() as u32))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_identifier_containing_the_column() {
        let text = "void bar(void) {\n    foo();\n}\n";
        assert_eq!(identifier_at(text, 1, 5), Some("foo".to_string()));
    }

    #[test]
    fn column_outside_any_identifier_yields_none() {
        let text = "void bar(void) {\n    foo();\n}\n";
        assert_eq!(identifier_at(text, 1, 8), None);
    }

    #[test]
    fn column_one_past_the_identifiers_last_character_still_resolves() {
        let text = "void bar(void) {\n    foo();\n}\n";
        // "foo" spans columns 4..7; column 7 is one past the last `o`,
        // a common place for a cursor to land right after the call.
        assert_eq!(identifier_at(text, 1, 7), Some("foo".to_string()));
    }

    #[test]
    fn out_of_range_line_yields_none() {
        let text = "void bar(void) {}\n";
        assert_eq!(identifier_at(text, 50, 0), None);
    }
}
