//! Module registry: the externally supplied name -> layer assignment

use crate::models::Layer;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A module declared in the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredModule {
    pub name: String,
    pub layer: Layer,
    /// Absolute (or caller-relative) source root
    pub root: PathBuf,
}

/// Registered modules, keyed by name, plus the scoped import prefix
/// (`<namespace>/<module-name>`) that refers to them.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    namespace: String,
    modules: BTreeMap<String, RegisteredModule>,
}

impl ModuleRegistry {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            modules: BTreeMap::new(),
        }
    }

    /// Builder-style registration
    pub fn with_module(mut self, name: &str, layer: Layer, root: impl Into<PathBuf>) -> Self {
        self.insert(RegisteredModule {
            name: name.to_string(),
            layer,
            root: root.into(),
        });
        self
    }

    pub fn insert(&mut self, module: RegisteredModule) {
        self.modules.insert(module.name.clone(), module);
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredModule> {
        self.modules.get(name)
    }

    pub fn layer_of(&self, name: &str) -> Option<Layer> {
        self.modules.get(name).map(|m| m.layer)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Modules in name order
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredModule> {
        self.modules.values()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
