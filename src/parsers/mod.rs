//! Source code parsers using tree-sitter
//!
//! This module extracts the import/export statements of a source file,
//! with the position of each string specifier. Nothing else about the file
//! is needed to build the module graph.

mod typescript;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parse a file and extract its import/export statements
pub fn parse_file(path: &Path) -> Result<ParseResult> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        // TypeScript/JavaScript
        "ts" | "tsx" | "mts" | "cts" | "js" | "jsx" | "mjs" | "cjs" => typescript::parse(path),

        // Unknown extension
        _ => Ok(ParseResult::default()),
    }
}

/// Parse source text directly; `ext` picks the grammar
pub fn parse_source(source: &str, ext: &str) -> Result<ParseResult> {
    typescript::parse_source(source, ext)
}

/// Get the language name for a file extension
pub fn language_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "ts" | "tsx" | "mts" | "cts" => Some("TypeScript"),
        "js" | "jsx" | "mjs" | "cjs" => Some("JavaScript"),
        _ => None,
    }
}

/// How a specifier entered the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatementKind {
    /// `import ... from "x"` or `import "x"`
    Import,
    /// `export ... from "x"`
    Export,
    /// `import("x")`
    DynamicImport,
    /// `require("x")` or `import x = require("x")`
    Require,
}

/// One import/export statement referencing a string specifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStatement {
    /// Specifier without quotes
    pub specifier: String,
    /// 1-based line of the specifier token
    pub line: u32,
    /// 1-based column of the specifier token
    pub column: u32,
    pub kind: StatementKind,
}

impl ImportStatement {
    pub fn new(specifier: impl Into<String>, line: u32, column: u32, kind: StatementKind) -> Self {
        Self {
            specifier: specifier.into(),
            line,
            column,
            kind,
        }
    }
}

/// Result of parsing a source file
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Statements in source order
    pub imports: Vec<ImportStatement>,

    /// The syntax tree contained error nodes; `imports` holds what was recovered
    pub has_errors: bool,
}

impl ParseResult {
    /// Create a new empty ParseResult
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the result is empty
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }
}
