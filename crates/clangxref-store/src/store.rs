//! The embedded relational store.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::StoreError;
use crate::retry::with_retry;
use crate::rows::{FileIndexStatus, RefLocation, RefRow, SymbolLocation, SymbolRow};
use crate::schema::{BASE_PRAGMAS, CREATE_TABLES, SPEED_MODE_PRAGMAS};
use clangxref_symbol_types::{RefRole, SymbolKind};

/// An open connection to `clangxref_index.db`.
///
/// Wraps a single `rusqlite::Connection`. The coordinator owns one
/// `Store` opened with `is_primary = true` during bulk indexing; the LSP
/// runtime owns a second, non-primary `Store` for reads, plus a
/// background-thread-owned one for on-save reindexing. No handle is ever
/// shared across threads — each owner opens its own connection against
/// the same file, relying on WAL to let reads proceed concurrently with
/// the one active writer.
pub struct Store {
    conn: Connection,
    in_txn: bool,
}

fn apply_pragmas(conn: &Connection, pragmas: &[(&str, &str)]) -> Result<(), StoreError> {
    for (name, value) in pragmas {
        conn.pragma_update(None, *name, *value)
            .map_err(StoreError::Disk)?;
    }
    Ok(())
}

fn map_symbol_location(row: &Row<'_>) -> rusqlite::Result<SymbolLocation> {
    Ok(SymbolLocation {
        name: row.get(0)?,
        kind: SymbolKind::from_str(&row.get::<_, String>(1)?),
        file_path: row.get(2)?,
        s_line: row.get(3)?,
        s_col: row.get(4)?,
        e_line: row.get(5)?,
        e_col: row.get(6)?,
    })
}

fn map_ref_location(row: &Row<'_>) -> rusqlite::Result<RefLocation> {
    Ok(RefLocation {
        file_path: row.get(0)?,
        s_line: row.get(1)?,
        s_col: row.get(2)?,
        e_line: row.get(3)?,
        e_col: row.get(4)?,
        role: RefRole::from_str(&row.get::<_, String>(5)?),
    })
}

impl Store {
    /// Opens (or creates) the store at `path`.
    ///
    /// `is_primary` additionally runs the `CREATE TABLE IF NOT EXISTS`/
    /// `CREATE INDEX IF NOT EXISTS` statements; non-primary openers attach
    /// in the same pragma modes but skip DDL, since the primary opener is
    /// expected to have already run it (or will, before the non-primary
    /// opener's first query).
    pub fn open(path: &Path, is_primary: bool) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(StoreError::Disk)?;
        apply_pragmas(&conn, BASE_PRAGMAS)?;
        if is_primary {
            conn.execute_batch(CREATE_TABLES)
                .map_err(|e| StoreError::Schema(e.to_string()))?;
        }
        Ok(Self { conn, in_txn: false })
    }

    /// Opens an in-memory store with schema created, for tests.
    #[doc(hidden)]
    pub fn open_in_memory_for_tests() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::Disk)?;
        conn.execute_batch(CREATE_TABLES)
            .map_err(|e| StoreError::Schema(e.to_string()))?;
        Ok(Self { conn, in_txn: false })
    }

    /// Switches the connection into bulk-indexing speed mode: no commit
    /// fsync, in-memory journal, large page cache. Only safe to use while
    /// this process is the sole writer (the coordinator's bulk-index run).
    pub fn enable_speed_mode(&self) -> Result<(), StoreError> {
        apply_pragmas(&self.conn, SPEED_MODE_PRAGMAS)
    }

    /// Atomically applies one file's worker output: upserts `files` to
    /// `completed`, replaces that file's `refs` rows, and upserts the
    /// symbol dictionary.
    ///
    /// When `commit` is `false` the write is left inside an open
    /// transaction spanning this and any previous un-committed calls,
    /// letting the coordinator batch many files per fsync; call
    /// [`Store::commit_pending`] (or pass `commit = true` on a later call)
    /// to flush. The transaction is driven with explicit `BEGIN
    /// IMMEDIATE`/`COMMIT` statements rather than `rusqlite::Transaction`
    /// so the connection can be reused across calls without the guard
    /// type's lifetime pinning it to one call.
    pub fn save_index_result(
        &mut self,
        file: &str,
        mtime: f64,
        symbols: &[SymbolRow],
        refs: &[RefRow],
        commit: bool,
    ) -> Result<(), StoreError> {
        if !self.in_txn {
            with_retry(|| self.conn.execute_batch("BEGIN IMMEDIATE"))?;
            self.in_txn = true;
        }

        self.conn.execute(
            "INSERT INTO files (file_path, mtime, status) VALUES (?1, ?2, 'completed')
             ON CONFLICT(file_path) DO UPDATE SET mtime = excluded.mtime, status = excluded.status",
            params![file, mtime],
        )?;
        self.conn
            .execute("DELETE FROM refs WHERE file_path = ?1", params![file])?;
        for s in symbols {
            self.conn.execute(
                "INSERT OR IGNORE INTO symbols (usr, name, kind) VALUES (?1, ?2, ?3)",
                params![s.usr, s.name, s.kind.as_str()],
            )?;
        }
        for r in refs {
            self.conn.execute(
                "INSERT INTO refs (usr, caller_usr, file_path, s_line, s_col, e_line, e_col, role)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    r.usr,
                    r.caller_usr,
                    r.file_path,
                    r.s_line,
                    r.s_col,
                    r.e_line,
                    r.e_col,
                    r.role.as_str()
                ],
            )?;
        }

        if commit {
            self.commit_pending()?;
        }
        Ok(())
    }

    /// Commits a transaction left open by [`Store::save_index_result`]
    /// with `commit = false`. A no-op if no transaction is open.
    pub fn commit_pending(&mut self) -> Result<(), StoreError> {
        if self.in_txn {
            self.conn.execute_batch("COMMIT")?;
            self.in_txn = false;
        }
        Ok(())
    }

    /// Records `file` as `indexing` or `failed`. Independent of the
    /// batched `save_index_result` transaction: always autocommits.
    pub fn update_file_status(
        &self,
        file: &str,
        mtime: f64,
        status: FileIndexStatus,
    ) -> Result<(), StoreError> {
        with_retry(|| {
            self.conn.execute(
                "INSERT INTO files (file_path, mtime, status) VALUES (?1, ?2, ?3)
                 ON CONFLICT(file_path) DO UPDATE SET mtime = excluded.mtime, status = excluded.status",
                params![file, mtime, status.as_str()],
            )
        })?;
        Ok(())
    }

    /// Returns `{(file_path, mtime)}` for every file whose status is
    /// `completed`, used by the coordinator to compute the incremental
    /// worklist.
    pub fn completed_file_mtimes(&self) -> Result<Vec<(String, f64)>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT file_path, mtime FROM files WHERE status = 'completed'")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Fuzzy workspace symbol search: `%query%` against symbol names,
    /// definitions only, capped at 100 rows.
    pub fn search_symbols(&self, query: &str) -> Result<Vec<SymbolLocation>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT s.name, s.kind, r.file_path, r.s_line, r.s_col, r.e_line, r.e_col
             FROM refs r JOIN symbols s ON r.usr = s.usr
             WHERE s.name LIKE '%' || ?1 || '%' AND r.role = 'def'
             LIMIT 100",
        )?;
        let rows = stmt
            .query_map(params![query], map_symbol_location)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Document symbol outline: every definition in `file`, ascending by
    /// start line.
    pub fn symbols_by_file(&self, file: &str) -> Result<Vec<SymbolLocation>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT s.name, s.kind, r.file_path, r.s_line, r.s_col, r.e_line, r.e_col
             FROM refs r JOIN symbols s ON r.usr = s.usr
             WHERE r.file_path = ?1 AND r.role = 'def'
             ORDER BY r.s_line ASC",
        )?;
        let rows = stmt
            .query_map(params![file], map_symbol_location)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Exact-name definition lookup (name-fallback strategy for
    /// go-to-definition), distinct on physical coordinates.
    pub fn definitions_by_name(&self, name: &str) -> Result<Vec<SymbolLocation>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT s.name, s.kind, r.file_path, r.s_line, r.s_col, r.e_line, r.e_col
             FROM refs r JOIN symbols s ON r.usr = s.usr
             WHERE s.name = ?1 AND r.role = 'def'",
        )?;
        let rows = stmt
            .query_map(params![name], map_symbol_location)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Resolves the USR under the cursor at `(file, line, col)` (1-indexed),
    /// preferring a non-`def` occurrence and then the narrowest extent on
    /// ties. Returns `None` if no recorded extent covers the position.
    pub fn usr_at_location(
        &self,
        file: &str,
        line: i64,
        col: i64,
    ) -> Result<Option<String>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT usr FROM refs
             WHERE file_path = ?1 AND s_line = ?2 AND s_col <= ?3 AND e_col >= ?3
             ORDER BY (role = 'def') ASC, (e_col - s_col) ASC
             LIMIT 1",
        )?;
        let usr = stmt
            .query_row(params![file, line, col], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(usr)
    }

    /// All definitions of `usr`, distinct on physical coordinates (the
    /// USR-precise strategy for go-to-definition).
    pub fn definitions_by_usr(&self, usr: &str) -> Result<Vec<SymbolLocation>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT s.name, s.kind, r.file_path, r.s_line, r.s_col, r.e_line, r.e_col
             FROM refs r JOIN symbols s ON r.usr = s.usr
             WHERE r.usr = ?1 AND r.role = 'def'",
        )?;
        let rows = stmt
            .query_map(params![usr], map_symbol_location)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// All occurrences of `usr` of any role (the USR-precise strategy for
    /// find-references; definitions are included per spec.md §4.5).
    pub fn references_by_usr(&self, usr: &str) -> Result<Vec<RefLocation>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT file_path, s_line, s_col, e_line, e_col, role
             FROM refs
             WHERE usr = ?1 AND role IN ('def', 'ref', 'call')",
        )?;
        let rows = stmt
            .query_map(params![usr], map_ref_location)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// All occurrences of any symbol named `name` (the name-fallback
    /// strategy for find-references), distinct on physical coordinates.
    pub fn references_by_name(&self, name: &str) -> Result<Vec<RefLocation>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT r.file_path, r.s_line, r.s_col, r.e_line, r.e_col, r.role
             FROM refs r JOIN symbols s ON r.usr = s.usr
             WHERE s.name = ?1 AND r.role IN ('def', 'ref', 'call')",
        )?;
        let rows = stmt
            .query_map(params![name], map_ref_location)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clangxref_symbol_types::{RefRole, SymbolKind};

    fn sample_store() -> Store {
        Store::open_in_memory_for_tests().unwrap()
    }

    fn foo_symbol() -> SymbolRow {
        SymbolRow { usr: "c:@F@foo".to_string(), name: "foo".to_string(), kind: SymbolKind::Function }
    }

    fn foo_def_ref() -> RefRow {
        RefRow {
            usr: "c:@F@foo".to_string(),
            caller_usr: None,
            file_path: "/tmp/a.c".to_string(),
            s_line: 1,
            s_col: 6,
            e_line: 1,
            e_col: 9,
            role: RefRole::Def,
        }
    }

    #[test]
    fn save_index_result_then_commit_makes_rows_visible() {
        let mut store = sample_store();
        store
            .save_index_result("/tmp/a.c", 100.0, &[foo_symbol()], &[foo_def_ref()], true)
            .unwrap();

        let defs = store.definitions_by_name("foo").unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].file_path, "/tmp/a.c");
    }

    #[test]
    fn deferred_commit_batches_across_calls() {
        let mut store = sample_store();
        store
            .save_index_result("/tmp/a.c", 100.0, &[foo_symbol()], &[foo_def_ref()], false)
            .unwrap();
        // Not yet committed: a second connection would not see it, but
        // same-connection reads inside an open transaction do.
        assert_eq!(store.definitions_by_name("foo").unwrap().len(), 1);
        store.commit_pending().unwrap();
        assert_eq!(store.definitions_by_name("foo").unwrap().len(), 1);
    }

    #[test]
    fn reindex_replaces_refs_for_the_file_atomically() {
        let mut store = sample_store();
        store
            .save_index_result("/tmp/a.c", 100.0, &[foo_symbol()], &[foo_def_ref()], true)
            .unwrap();

        let bar_symbol =
            SymbolRow { usr: "c:@F@bar".to_string(), name: "bar".to_string(), kind: SymbolKind::Function };
        let bar_def_ref = RefRow {
            usr: "c:@F@bar".to_string(),
            caller_usr: None,
            file_path: "/tmp/a.c".to_string(),
            s_line: 1,
            s_col: 6,
            e_line: 1,
            e_col: 9,
            role: RefRole::Def,
        };
        store
            .save_index_result("/tmp/a.c", 200.0, &[bar_symbol], &[bar_def_ref], true)
            .unwrap();

        assert_eq!(store.definitions_by_name("foo").unwrap().len(), 0);
        assert_eq!(store.definitions_by_name("bar").unwrap().len(), 1);
    }

    #[test]
    fn usr_at_location_prefers_non_def_then_narrowest_extent() {
        let mut store = sample_store();
        let call_ref = RefRow {
            usr: "c:@F@foo".to_string(),
            caller_usr: Some("c:@F@bar".to_string()),
            file_path: "/tmp/a.c".to_string(),
            s_line: 2,
            s_col: 14,
            e_line: 2,
            e_col: 17,
            role: RefRole::Call,
        };
        store
            .save_index_result("/tmp/a.c", 100.0, &[foo_symbol()], &[foo_def_ref(), call_ref], true)
            .unwrap();

        let usr = store.usr_at_location("/tmp/a.c", 2, 15).unwrap();
        assert_eq!(usr, Some("c:@F@foo".to_string()));
    }

    #[test]
    fn usr_at_location_returns_none_outside_any_extent() {
        let mut store = sample_store();
        store
            .save_index_result("/tmp/a.c", 100.0, &[foo_symbol()], &[foo_def_ref()], true)
            .unwrap();
        assert_eq!(store.usr_at_location("/tmp/a.c", 99, 1).unwrap(), None);
    }

    #[test]
    fn document_symbols_are_ordered_by_start_line() {
        let mut store = sample_store();
        let bar_symbol =
            SymbolRow { usr: "c:@F@bar".to_string(), name: "bar".to_string(), kind: SymbolKind::Function };
        let bar_ref = RefRow {
            usr: "c:@F@bar".to_string(),
            caller_usr: None,
            file_path: "/tmp/a.c".to_string(),
            s_line: 2,
            s_col: 6,
            e_line: 2,
            e_col: 9,
            role: RefRole::Def,
        };
        store
            .save_index_result(
                "/tmp/a.c",
                100.0,
                &[foo_symbol(), bar_symbol],
                &[foo_def_ref(), bar_ref],
                true,
            )
            .unwrap();

        let symbols = store.symbols_by_file("/tmp/a.c").unwrap();
        assert_eq!(symbols.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(), vec!["foo", "bar"]);
    }

    #[test]
    fn search_symbols_matches_substrings() {
        let mut store = sample_store();
        store
            .save_index_result("/tmp/a.c", 100.0, &[foo_symbol()], &[foo_def_ref()], true)
            .unwrap();
        let hits = store.search_symbols("oo").unwrap();
        assert!(hits.iter().any(|s| s.name == "foo"));
    }

    #[test]
    fn completed_file_mtimes_reflects_only_completed_status() {
        let mut store = sample_store();
        store
            .save_index_result("/tmp/a.c", 100.0, &[foo_symbol()], &[foo_def_ref()], true)
            .unwrap();
        store.update_file_status("/tmp/b.c", 50.0, FileIndexStatus::Failed).unwrap();

        let mtimes = store.completed_file_mtimes().unwrap();
        assert_eq!(mtimes, vec![("/tmp/a.c".to_string(), 100.0)]);
    }

    #[test]
    fn references_by_usr_includes_def_and_call_roles() {
        let mut store = sample_store();
        let call_ref = RefRow {
            usr: "c:@F@foo".to_string(),
            caller_usr: Some("c:@F@bar".to_string()),
            file_path: "/tmp/a.c".to_string(),
            s_line: 2,
            s_col: 14,
            e_line: 2,
            e_col: 17,
            role: RefRole::Call,
        };
        store
            .save_index_result("/tmp/a.c", 100.0, &[foo_symbol()], &[foo_def_ref(), call_ref], true)
            .unwrap();

        let refs = store.references_by_usr("c:@F@foo").unwrap();
        assert_eq!(refs.len(), 2);
        assert!(refs.iter().any(|r| r.role == RefRole::Def));
        assert!(refs.iter().any(|r| r.role == RefRole::Call));
    }
}
