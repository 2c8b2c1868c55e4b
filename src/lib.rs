//! archgate - Layered-architecture compliance for module monorepos
//!
//! Scans the modules declared in `archgate.toml`, builds the directed
//! dependency graph between them from their import/export statements,
//! validates every edge against a fixed rule catalog, detects cycles and
//! computes a weighted compliance score.
//!
//! ```text
//! config ─► scanner ─► rules ─► scoring ─► reporters
//! ```

pub mod config;
pub mod models;
pub mod parsers;
pub mod reporters;
pub mod rules;
pub mod scanner;
pub mod scoring;
