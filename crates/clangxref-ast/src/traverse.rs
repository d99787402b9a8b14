//! Translation unit parsing and pre-order AST traversal.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clang::{Entity, EntityKind, EntityVisitResult, Index};
use clangxref_symbol_types::{RefRole, RefRow, SymbolKind, SymbolRow};

use crate::error::AstError;

/// A successfully parsed translation unit.
pub struct ParsedUnit<'i> {
    tu: clang::TranslationUnit<'i>,
}

/// Parses `source_file` with `args` (already run through
/// `clangxref-argsan`), enabling detailed preprocessing records so macro
/// definitions surface as first-class entities.
///
/// Diagnostics of severity `Error` or above are logged via
/// `tracing::warn!` and do not fail the parse — a partial AST still
/// yields useful symbol/reference data, per the worker's resilience
/// contract.
pub fn parse_translation_unit<'i>(
    index: &'i Index<'i>,
    source_file: &Path,
    args: &[String],
) -> Result<ParsedUnit<'i>, AstError> {
    let tu = index
        .parser(source_file)
        .arguments(args)
        .detailed_preprocessing_record(true)
        .parse()
        .map_err(|e| AstError::Parse(e.to_string()))?;

    for diagnostic in tu.get_diagnostics() {
        if diagnostic.get_severity() >= clang::diagnostic::Severity::Error {
            tracing::warn!(
                file = %source_file.display(),
                message = %diagnostic.get_text(),
                "clang diagnostic"
            );
        }
    }

    Ok(ParsedUnit { tu })
}

/// Node kinds eligible for definition emission (`is_definition()`-gated,
/// except macro which has no such gate).
fn definition_eligible(kind: EntityKind) -> bool {
    matches!(
        kind,
        EntityKind::FunctionDecl
            | EntityKind::Method
            | EntityKind::StructDecl
            | EntityKind::ClassDecl
            | EntityKind::VarDecl
            | EntityKind::FieldDecl
            | EntityKind::TypedefDecl
            | EntityKind::EnumDecl
            | EntityKind::EnumConstantDecl
            | EntityKind::MacroDefinition
    )
}

/// Node kinds eligible for reference/call emission.
fn reference_eligible(kind: EntityKind) -> bool {
    matches!(
        kind,
        EntityKind::CallExpr
            | EntityKind::MemberRefExpr
            | EntityKind::DeclRefExpr
            | EntityKind::TypeRef
            | EntityKind::OverloadedDeclRef
    )
}

fn map_symbol_kind(kind: EntityKind) -> SymbolKind {
    match kind {
        EntityKind::FunctionDecl => SymbolKind::Function,
        EntityKind::Method => SymbolKind::Method,
        EntityKind::StructDecl => SymbolKind::Struct,
        EntityKind::ClassDecl => SymbolKind::Class,
        EntityKind::VarDecl => SymbolKind::Variable,
        EntityKind::FieldDecl => SymbolKind::Field,
        EntityKind::TypedefDecl => SymbolKind::Typedef,
        EntityKind::EnumDecl => SymbolKind::Enum,
        EntityKind::EnumConstantDecl => SymbolKind::EnumConstant,
        EntityKind::MacroDefinition => SymbolKind::Macro,
        other => SymbolKind::Other(format!("{other:?}")),
    }
}

/// Resolves and memoizes the canonical (symlink-resolved) path for a
/// libclang `File` handle, keyed by the path libclang itself reports.
/// Hot-path optimization: without the cache, `realpath` dominates
/// traversal time on headers included from many translation units.
fn canonical_path(file: &clang::source::File, cache: &mut HashMap<PathBuf, PathBuf>) -> PathBuf {
    let raw = file.get_path();
    if let Some(hit) = cache.get(&raw) {
        return hit.clone();
    }
    let resolved = std::fs::canonicalize(&raw).unwrap_or_else(|_| raw.clone());
    cache.insert(raw, resolved.clone());
    resolved
}

/// Declaration-ish kinds eligible to serve as a call/reference's
/// `caller_usr` when found via `semantic_parent`.
///
/// The original's equivalent check is the broad `parent.kind.is_declaration()`
/// category test (`pyclangd_server.py:215`); the `clang` crate has no single
/// predicate mirroring libclang's `clang_isDeclaration` range check, so this
/// enumerates every C/C++ declaration `EntityKind` the crate exposes (see
/// DESIGN.md's Open Question resolutions for why Objective-C-only kinds are
/// left out — they're outside spec.md's C/C++ scope).
fn is_declaration_kind(kind: EntityKind) -> bool {
    matches!(
        kind,
        EntityKind::FunctionDecl
            | EntityKind::Method
            | EntityKind::StructDecl
            | EntityKind::ClassDecl
            | EntityKind::UnionDecl
            | EntityKind::VarDecl
            | EntityKind::FieldDecl
            | EntityKind::Constructor
            | EntityKind::Destructor
            | EntityKind::ConversionFunction
            | EntityKind::EnumDecl
            | EntityKind::EnumConstantDecl
            | EntityKind::TypedefDecl
            | EntityKind::TypeAliasDecl
            | EntityKind::Namespace
            | EntityKind::NamespaceAlias
            | EntityKind::UsingDeclaration
            | EntityKind::UsingDirective
            | EntityKind::FunctionTemplate
            | EntityKind::ClassTemplate
            | EntityKind::ClassTemplatePartialSpecialization
            | EntityKind::TemplateTypeParameter
            | EntityKind::TemplateTemplateParameter
            | EntityKind::NonTypeTemplateParameter
            | EntityKind::FriendDecl
    )
}

fn visit_one(
    entity: &Entity<'_>,
    path_cache: &mut HashMap<PathBuf, PathBuf>,
    symbols: &mut Vec<SymbolRow>,
    refs: &mut Vec<RefRow>,
) {
    let kind = entity.get_kind();

    if definition_eligible(kind) {
        let is_macro = kind == EntityKind::MacroDefinition;
        if is_macro || entity.is_definition() {
            emit_definition(entity, kind, path_cache, symbols, refs);
        }
    }

    if reference_eligible(kind) {
        if let Some(target) = entity.get_reference() {
            emit_reference(entity, &target, kind, path_cache, symbols, refs);
        }
    }
}

fn emit_definition(
    entity: &Entity<'_>,
    kind: EntityKind,
    path_cache: &mut HashMap<PathBuf, PathBuf>,
    symbols: &mut Vec<SymbolRow>,
    refs: &mut Vec<RefRow>,
) {
    let (Some(usr), Some(name)) = (entity.get_usr(), entity.get_name()) else {
        return;
    };
    let Some(location) = entity.get_location() else {
        return;
    };
    let file_location = location.get_file_location();
    let Some(file) = file_location.file else {
        return;
    };

    let path = canonical_path(&file, path_cache);
    let s_line = file_location.line as i64;
    let s_col = file_location.column as i64;

    symbols.push(SymbolRow { usr: usr.0.clone(), name: name.clone(), kind: map_symbol_kind(kind) });
    refs.push(RefRow {
        usr: usr.0,
        caller_usr: None,
        file_path: path.display().to_string(),
        s_line,
        s_col,
        e_line: s_line,
        e_col: s_col + name.chars().count() as i64,
        role: RefRole::Def,
    });
}

fn emit_reference(
    entity: &Entity<'_>,
    target: &Entity<'_>,
    kind: EntityKind,
    path_cache: &mut HashMap<PathBuf, PathBuf>,
    symbols: &mut Vec<SymbolRow>,
    refs: &mut Vec<RefRow>,
) {
    let (Some(usr), Some(name)) = (target.get_usr(), target.get_name()) else {
        return;
    };
    let Some(location) = entity.get_location() else {
        return;
    };
    let file_location = location.get_file_location();
    let Some(file) = file_location.file else {
        return;
    };

    let caller_usr = entity
        .get_semantic_parent()
        .filter(|parent| is_declaration_kind(parent.get_kind()))
        .and_then(|parent| parent.get_usr())
        .map(|u| u.0);

    let path = canonical_path(&file, path_cache);
    let s_line = file_location.line as i64;
    let s_col = file_location.column as i64;
    let role = if kind == EntityKind::CallExpr { RefRole::Call } else { RefRole::Ref };

    symbols.push(SymbolRow { usr: usr.0.clone(), name: name.clone(), kind: map_symbol_kind(target.get_kind()) });
    refs.push(RefRow {
        usr: usr.0,
        caller_usr,
        file_path: path.display().to_string(),
        s_line,
        s_col,
        e_line: s_line,
        e_col: s_col + name.chars().count() as i64,
        role,
    });
}

/// Pre-order traversal of `unit`, producing the symbol and reference rows
/// the worker's output tuple needs.
pub fn walk(unit: &ParsedUnit<'_>) -> (Vec<SymbolRow>, Vec<RefRow>) {
    let mut symbols = Vec::new();
    let mut refs = Vec::new();
    let mut path_cache = HashMap::new();

    unit.tu.get_entity().visit_children(|entity, _parent| {
        visit_one(&entity, &mut path_cache, &mut symbols, &mut refs);
        EntityVisitResult::Recurse
    });

    (symbols, refs)
}
