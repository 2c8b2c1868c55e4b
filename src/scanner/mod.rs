//! Module scanner
//!
//! Walks every registered module root, extracts import statements from its
//! files (in parallel), classifies each specifier and folds the results
//! into a [`ModuleGraph`]. Edge rules are evaluated while folding; cycle
//! detection runs once the whole graph is known.
//!
//! ```text
//! registry ─► enumerate roots ─► parse files (rayon) ─► fold per file ─► finish
//!                                                        (edge rules)     (cycles)
//! ```

mod builder;
pub mod cycles;
mod source;
pub mod specifier;

pub use builder::{ModuleGraph, ModuleGraphBuilder};
pub use cycles::{detect_cycles, format_cycle};
pub use source::{FileSystemSource, InMemorySource, SourceTree};
pub use specifier::{classify, package_name, SpecifierKind};

use crate::config::ModuleRegistry;
use crate::parsers::ParseResult;
use crate::rules::RuleCatalog;
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Fatal scan errors. Per-file problems are warnings, not errors.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot read module root {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One file waiting to be parsed
struct ParseJob {
    module: String,
    file: PathBuf,
}

/// Scans a source tree against a module registry
pub struct Scanner<'a, S: SourceTree> {
    registry: &'a ModuleRegistry,
    source: &'a S,
    catalog: &'a RuleCatalog,
    progress: Option<ProgressBar>,
}

impl<'a, S: SourceTree> Scanner<'a, S> {
    pub fn new(registry: &'a ModuleRegistry, source: &'a S, catalog: &'a RuleCatalog) -> Self {
        Self {
            registry,
            source,
            catalog,
            progress: None,
        }
    }

    /// Report parsing progress on `bar`; its length is set by the scan
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = Some(bar);
        self
    }

    /// Build the module graph.
    ///
    /// Deterministic: the same tree and registry always produce the same
    /// graph, whatever order the parser threads finish in.
    pub fn run(&self) -> Result<ModuleGraph, ScanError> {
        let mut builder = ModuleGraphBuilder::new(self.registry, self.catalog);

        let mut jobs = Vec::new();
        for module in self.registry.iter() {
            let Some(files) = self.source.module_files(module)? else {
                builder.missing_root(module);
                continue;
            };
            builder.add_files(module, &files, |f| self.source.display_path(f));
            jobs.extend(files.into_iter().map(|file| ParseJob {
                module: module.name.clone(),
                file,
            }));
        }

        info!(
            "Scanning {} files across {} modules",
            jobs.len(),
            self.registry.len()
        );
        if let Some(bar) = &self.progress {
            bar.set_length(jobs.len() as u64);
        }

        // Parsing is independent per file; collect keeps job order.
        let parsed: Vec<(ParseJob, anyhow::Result<ParseResult>)> = jobs
            .into_par_iter()
            .map(|job| {
                let result = self.source.parse(&job.file);
                if let Some(bar) = &self.progress {
                    bar.inc(1);
                }
                (job, result)
            })
            .collect();

        for (job, result) in parsed {
            let display = self.source.display_path(&job.file);
            builder.record_file(&job.module, &display, result);
        }
        if let Some(bar) = &self.progress {
            bar.finish_and_clear();
        }

        // Every file has been folded in; only now is the graph complete.
        let graph = builder.finish();
        debug!(
            "Scan finished: {} modules, {} violations, {} warnings",
            graph.len(),
            graph.violations().count(),
            graph.warnings().len()
        );
        Ok(graph)
    }
}

/// Scan without progress reporting
pub fn scan<S: SourceTree>(
    registry: &ModuleRegistry,
    source: &S,
    catalog: &RuleCatalog,
) -> Result<ModuleGraph, ScanError> {
    Scanner::new(registry, source, catalog).run()
}
