//! Project-level configuration support
//!
//! Loads per-project configuration from `archgate.toml` or `.archgaterc.json`
//! in the scanned root. The configuration is the module registry: every
//! module must be declared with its layer, there is no default layer.
//!
//! # Configuration Format
//!
//! ```toml
//! # archgate.toml
//! namespace = "@app"
//!
//! [scan]
//! modules_dir = "packages"
//! extensions = ["ts", "tsx", "js"]
//!
//! [exclude]
//! paths = ["**/fixtures/**"]
//!
//! [modules.core]
//! layer = 0
//!
//! [modules.auth]
//! layer = 1
//! root = "packages/auth/src"
//!
//! [defaults]
//! format = "text"
//! fail_on = "critical"
//! ```

use super::registry::{ModuleRegistry, RegisteredModule};
use crate::models::Layer;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Config files searched in the scanned root, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["archgate.toml", ".archgaterc.json"];

/// Test, spec and generated files excluded unless `skip_defaults = true`.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    "**/*.test.*",
    "**/*.spec.*",
    "**/__tests__/**",
    "**/__mocks__/**",
    "**/*.d.ts",
    "**/*.generated.*",
    "**/node_modules/**",
    "**/dist/**",
    "**/build/**",
];

/// Source extensions scanned by default
pub const DEFAULT_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];

/// Template written by `archgate init`
pub const EXAMPLE_CONFIG: &str = r#"# archgate configuration
#
# Every module is declared with its layer. Layer 0 is the most foundational;
# higher layers may depend on lower ones, never the other way round.

# Scoped import prefix: `@app/core` refers to the module `core`
namespace = "@app"

[scan]
# Module roots default to <modules_dir>/<module name>
modules_dir = "packages"
extensions = ["ts", "tsx", "js", "jsx", "mjs", "cjs"]

[exclude]
# Added to the built-in test/spec/generated patterns
paths = []

[modules.core]
layer = 0

[modules.auth]
layer = 1

[modules.profile]
layer = 2

[modules.editor]
layer = 3

[modules.web]
layer = 4
# root = "apps/web/src"

[defaults]
format = "text"
fail_on = "critical"
"#;

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No archgate config found in {dir} (expected one of: {expected})")]
    NotFound { dir: PathBuf, expected: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Project-level configuration loaded from archgate.toml or similar
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Scoped import prefix, e.g. `@app`
    pub namespace: String,

    /// Registered modules by name
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleConfig>,

    /// File discovery settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// Path exclusion patterns
    #[serde(default)]
    pub exclude: ExcludeConfig,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// One registered module
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleConfig {
    /// Assigned layer (required)
    pub layer: Layer,

    /// Source root, relative to the scanned directory
    #[serde(default)]
    pub root: Option<PathBuf>,
}

/// File discovery settings
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Parent directory of module roots (default: packages)
    #[serde(default = "default_modules_dir")]
    pub modules_dir: PathBuf,

    /// File extensions to scan
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            modules_dir: default_modules_dir(),
            extensions: default_extensions(),
        }
    }
}

fn default_modules_dir() -> PathBuf {
    PathBuf::from("packages")
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

/// Path exclusion configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExcludeConfig {
    /// Paths/patterns to exclude from analysis
    #[serde(default)]
    pub paths: Vec<String>,

    /// If true, disable built-in default exclusion patterns
    #[serde(default)]
    pub skip_defaults: bool,
}

impl ExcludeConfig {
    /// Returns effective exclusion patterns (defaults + user patterns).
    /// If `skip_defaults` is true, only user patterns are returned.
    pub fn effective_patterns(&self) -> Vec<String> {
        let mut patterns = Vec::new();

        if !self.skip_defaults {
            patterns.extend(DEFAULT_EXCLUDE_PATTERNS.iter().map(|s| s.to_string()));
        }

        for p in &self.paths {
            if !patterns.contains(p) {
                patterns.push(p.clone());
            }
        }

        patterns
    }

    /// Compile the effective patterns
    pub fn build_globset(&self) -> Result<GlobSet, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in self.effective_patterns() {
            let glob = Glob::new(&pattern).map_err(|source| ConfigError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|source| ConfigError::Pattern {
            pattern: "<set>".to_string(),
            source,
        })
    }
}

/// Default CLI flags that can be set in project config
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CliDefaults {
    /// Default output format (text, json, markdown, html, dot)
    #[serde(default)]
    pub format: Option<String>,

    /// Fail-on severity threshold for CI
    #[serde(default)]
    pub fail_on: Option<String>,
}

/// Load project configuration from the repository root.
///
/// Searches for configuration files in this order:
/// 1. `archgate.toml`
/// 2. `.archgaterc.json`
pub fn load_project_config(repo_path: &Path) -> Result<ProjectConfig, ConfigError> {
    for name in CONFIG_FILE_NAMES {
        let path = repo_path.join(name);
        if !path.exists() {
            continue;
        }
        let config = if name.ends_with(".json") {
            load_json_config(&path)?
        } else {
            load_toml_config(&path)?
        };
        config.validate()?;
        debug!(
            "Loaded project config from {} ({} modules)",
            path.display(),
            config.modules.len()
        );
        return Ok(config);
    }

    Err(ConfigError::NotFound {
        dir: repo_path.to_path_buf(),
        expected: CONFIG_FILE_NAMES.join(", "),
    })
}

/// Load configuration from a TOML file
fn load_toml_config(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = read(path)?;
    toml::from_str(&content).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

/// Load configuration from a JSON file
fn load_json_config(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = read(path)?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

impl ProjectConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ProjectConfig =
            toml::from_str(content).map_err(|source| ConfigError::Toml {
                path: PathBuf::from("<inline>"),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the scanner cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let namespace = self.namespace.trim();
        if namespace.is_empty() || namespace.ends_with('/') {
            return Err(ConfigError::Invalid(format!(
                "namespace '{}' must be a non-empty prefix without a trailing '/'",
                self.namespace
            )));
        }
        for name in self.modules.keys() {
            if name.is_empty() || name.contains('/') {
                return Err(ConfigError::Invalid(format!(
                    "module name '{}' must be a single path segment",
                    name
                )));
            }
        }
        if self.scan.extensions.is_empty() {
            return Err(ConfigError::Invalid(
                "scan.extensions must list at least one extension".to_string(),
            ));
        }
        Ok(())
    }

    /// Root directory of a module, resolved against the scanned root
    pub fn module_root(&self, repo_path: &Path, name: &str) -> PathBuf {
        match self.modules.get(name).and_then(|m| m.root.as_ref()) {
            Some(root) => repo_path.join(root),
            None => repo_path.join(&self.scan.modules_dir).join(name),
        }
    }

    /// Build the registry the scanner consumes
    pub fn registry(&self, repo_path: &Path) -> ModuleRegistry {
        let mut registry = ModuleRegistry::new(self.namespace.trim());
        for (name, module) in &self.modules {
            registry.insert(RegisteredModule {
                name: name.clone(),
                layer: module.layer,
                root: self.module_root(repo_path, name),
            });
        }
        registry
    }
}

#[cfg(test)]
mod tests;
