//! TypeScript/JavaScript parser using tree-sitter
//!
//! Extracts every string specifier that pulls another module into the file:
//! static imports, re-exports, `import x = require(...)`, dynamic `import()`
//! and CommonJS `require()`.

use super::{ImportStatement, ParseResult, StatementKind};
use anyhow::{Context, Result};
use std::path::Path;
use tree_sitter::{Language, Node, Parser};

/// Parse a TypeScript/JavaScript file and extract its import statements
pub fn parse(path: &Path) -> Result<ParseResult> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    parse_source(&source, ext)
        .with_context(|| format!("Failed to parse file: {}", path.display()))
}

/// Parse TypeScript/JavaScript source code directly
pub fn parse_source(source: &str, ext: &str) -> Result<ParseResult> {
    let mut parser = Parser::new();

    // Choose language based on extension
    let language: Language = match ext {
        "ts" | "mts" | "cts" => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        "tsx" => tree_sitter_typescript::LANGUAGE_TSX.into(),
        "js" | "jsx" | "mjs" | "cjs" => tree_sitter_javascript::LANGUAGE.into(),
        _ => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
    };

    parser
        .set_language(&language)
        .context("Failed to set TypeScript/JavaScript language")?;

    let tree = parser
        .parse(source, None)
        .context("Failed to parse source")?;

    let root = tree.root_node();
    let mut result = ParseResult {
        has_errors: root.has_error(),
        ..Default::default()
    };

    extract_imports(root, source.as_bytes(), &mut result);

    Ok(result)
}

/// Walk the whole tree in document order, collecting specifiers
fn extract_imports(root: Node, source: &[u8], result: &mut ParseResult) {
    let mut cursor = root.walk();
    loop {
        if let Some(statement) = statement_at(cursor.node(), source) {
            result.imports.push(statement);
        }

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

fn statement_at(node: Node, source: &[u8]) -> Option<ImportStatement> {
    match node.kind() {
        "import_statement" => {
            // `import x = require("y")` is reported by its require clause
            let string = node.child_by_field_name("source")?;
            to_statement(string, source, StatementKind::Import)
        }
        "export_statement" => {
            let string = node.child_by_field_name("source")?;
            to_statement(string, source, StatementKind::Export)
        }
        "import_require_clause" => {
            let string = node
                .child_by_field_name("source")
                .or_else(|| first_named_child_of_kind(node, "string"))?;
            to_statement(string, source, StatementKind::Require)
        }
        "call_expression" => {
            let function = node.child_by_field_name("function")?;
            let kind = match function.kind() {
                "import" => StatementKind::DynamicImport,
                "identifier" if function.utf8_text(source).ok() == Some("require") => {
                    StatementKind::Require
                }
                _ => return None,
            };
            let arguments = node.child_by_field_name("arguments")?;
            let first = arguments.named_child(0)?;
            if first.kind() != "string" {
                // computed specifiers cannot be resolved statically
                return None;
            }
            to_statement(first, source, kind)
        }
        _ => None,
    }
}

fn first_named_child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| c.kind() == kind);
    found
}

fn to_statement(string: Node, source: &[u8], kind: StatementKind) -> Option<ImportStatement> {
    let text = string.utf8_text(source).ok()?;
    let specifier = text
        .trim_start_matches(['"', '\''])
        .trim_end_matches(['"', '\'']);
    if specifier.is_empty() {
        return None;
    }
    let position = string.start_position();
    Some(ImportStatement::new(
        specifier,
        position.row as u32 + 1,
        char_column(source, string.start_byte(), position.column) as u32 + 1,
        kind,
    ))
}

/// 0-based column in characters; tree-sitter columns count bytes
fn char_column(source: &[u8], start_byte: usize, byte_column: usize) -> usize {
    let line_start = start_byte.saturating_sub(byte_column);
    source
        .get(line_start..start_byte)
        .and_then(|prefix| std::str::from_utf8(prefix).ok())
        .map(|prefix| prefix.chars().count())
        .unwrap_or(byte_column)
}
