//! Configuration module for archgate
//!
//! This module handles:
//! - Project-level configuration (archgate.toml / .archgaterc.json)
//! - The module registry (module name -> layer + source root)
//! - Exclusion patterns for test and generated files
//! - CLI defaults

mod project_config;
mod registry;

pub use project_config::{
    load_project_config, CliDefaults, ConfigError, ExcludeConfig, ModuleConfig, ProjectConfig,
    ScanConfig, CONFIG_FILE_NAMES, DEFAULT_EXCLUDE_PATTERNS, DEFAULT_EXTENSIONS, EXAMPLE_CONFIG,
};
pub use registry::{ModuleRegistry, RegisteredModule};
