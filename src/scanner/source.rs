//! Where module files and their parsed statements come from
//!
//! The scanner only needs two things from a source tree: the files of a
//! module root and the import statements of each file. [`FileSystemSource`]
//! walks and parses real files; [`InMemorySource`] serves statements that
//! were parsed elsewhere.

use super::ScanError;
use crate::config::{ConfigError, ProjectConfig, RegisteredModule};
use crate::parsers::{parse_file, ImportStatement, ParseResult};
use anyhow::Result;
use globset::GlobSet;
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Enumerates module files and yields their parsed statements
pub trait SourceTree: Sync {
    /// Files under a module root, sorted.
    ///
    /// `Ok(None)` when the root does not exist. An `Err` means the root
    /// exists but cannot be read, which aborts the scan.
    fn module_files(&self, module: &RegisteredModule) -> Result<Option<Vec<PathBuf>>, ScanError>;

    /// Import statements of one file
    fn parse(&self, file: &Path) -> Result<ParseResult>;

    /// Path recorded in module records and violations
    fn display_path(&self, file: &Path) -> PathBuf {
        file.to_path_buf()
    }
}

/// Source tree on disk, walked with .gitignore support and parsed with tree-sitter
pub struct FileSystemSource {
    repo_root: PathBuf,
    extensions: Vec<String>,
    exclude: GlobSet,
}

impl FileSystemSource {
    pub fn new(repo_root: &Path, config: &ProjectConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            repo_root: repo_root.to_path_buf(),
            extensions: config.scan.extensions.clone(),
            exclude: config.exclude.build_globset()?,
        })
    }

    fn is_source_file(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        if !self.extensions.iter().any(|e| e == ext) {
            return false;
        }
        let relative = path.strip_prefix(&self.repo_root).unwrap_or(path);
        !self.exclude.is_match(relative)
    }
}

impl SourceTree for FileSystemSource {
    fn module_files(&self, module: &RegisteredModule) -> Result<Option<Vec<PathBuf>>, ScanError> {
        let root = &module.root;
        if !root.is_dir() {
            return Ok(None);
        }
        // An unreadable root is fatal; unreadable entries below it are not.
        std::fs::read_dir(root).map_err(|source| ScanError::Io {
            path: root.clone(),
            source,
        })?;

        let mut builder = WalkBuilder::new(root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .require_git(false)
            .add_custom_ignore_filename(".archgateignore");

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };
            let path = entry.path();
            if path.is_file() && self.is_source_file(path) {
                files.push(path.to_path_buf());
            }
        }
        files.sort();

        debug!("{}: {} source files under {}", module.name, files.len(), root.display());
        Ok(Some(files))
    }

    fn parse(&self, file: &Path) -> Result<ParseResult> {
        parse_file(file)
    }

    fn display_path(&self, file: &Path) -> PathBuf {
        file.strip_prefix(&self.repo_root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| file.to_path_buf())
    }
}

/// Pre-parsed statements keyed by module and file
#[derive(Debug, Default, Clone)]
pub struct InMemorySource {
    modules: BTreeMap<String, Vec<PathBuf>>,
    files: BTreeMap<PathBuf, Result<ParseResult, String>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with its statements to a module
    pub fn with_file(
        mut self,
        module: &str,
        path: impl Into<PathBuf>,
        imports: Vec<ImportStatement>,
    ) -> Self {
        let path = path.into();
        self.add(module, path, Ok(ParseResult { imports, has_errors: false }));
        self
    }

    /// Add a file that fails to parse
    pub fn with_unparsable(mut self, module: &str, path: impl Into<PathBuf>, error: &str) -> Self {
        self.add(module, path.into(), Err(error.to_string()));
        self
    }

    /// Declare a module root that exists but holds no files
    pub fn with_empty_module(mut self, module: &str) -> Self {
        self.modules.entry(module.to_string()).or_default();
        self
    }

    fn add(&mut self, module: &str, path: PathBuf, result: Result<ParseResult, String>) {
        let files = self.modules.entry(module.to_string()).or_default();
        if !files.contains(&path) {
            files.push(path.clone());
            files.sort();
        }
        self.files.insert(path, result);
    }
}

impl SourceTree for InMemorySource {
    fn module_files(&self, module: &RegisteredModule) -> Result<Option<Vec<PathBuf>>, ScanError> {
        Ok(self.modules.get(&module.name).cloned())
    }

    fn parse(&self, file: &Path) -> Result<ParseResult> {
        match self.files.get(file) {
            Some(Ok(result)) => Ok(result.clone()),
            Some(Err(message)) => Err(anyhow::anyhow!("{}", message)),
            None => Err(anyhow::anyhow!("Unknown file: {}", file.display())),
        }
    }
}
