//! Incremental construction of the module graph
//!
//! [`ModuleGraphBuilder`] is the only mutable state of a scan. Each module's
//! record is written only while its own files are folded in. [`finish`]
//! runs cycle detection on the complete graph and hands back the frozen
//! [`ModuleGraph`].
//!
//! [`finish`]: ModuleGraphBuilder::finish

use super::cycles::{detect_cycles, format_cycle};
use super::specifier::{classify, SpecifierKind};
use crate::config::{ModuleRegistry, RegisteredModule};
use crate::models::{
    EdgeSite, ModuleRecord, ScanWarning, Severity, SeverityCounts, Violation, WarningKind,
};
use crate::parsers::{ImportStatement, ParseResult};
use crate::rules::{validate_dependency, EdgeContext, RuleCatalog, RuleId, CORE_LAYER};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Mutable scan state, threaded through the scan
pub struct ModuleGraphBuilder<'a> {
    registry: &'a ModuleRegistry,
    catalog: &'a RuleCatalog,
    records: BTreeMap<String, ModuleRecord>,
    /// First source location of each (source, target) edge
    edge_sites: BTreeMap<(String, String), EdgeSite>,
    warnings: Vec<ScanWarning>,
}

impl<'a> ModuleGraphBuilder<'a> {
    /// One empty record per registered module
    pub fn new(registry: &'a ModuleRegistry, catalog: &'a RuleCatalog) -> Self {
        let records = registry
            .iter()
            .map(|m| (m.name.clone(), ModuleRecord::new(m.name.clone(), m.layer)))
            .collect();
        Self {
            registry,
            catalog,
            records,
            edge_sites: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    /// The module's root does not exist; its record stays empty
    pub fn missing_root(&mut self, module: &RegisteredModule) {
        warn!(
            "Module '{}' has no source root at {}; recording it empty",
            module.name,
            module.root.display()
        );
        self.warnings.push(ScanWarning {
            module: module.name.clone(),
            file: None,
            kind: WarningKind::MissingRoot,
            message: format!("Module root not found: {}", module.root.display()),
        });
    }

    /// Register the discovered files of a module before they are parsed
    pub fn add_files(
        &mut self,
        module: &RegisteredModule,
        files: &[PathBuf],
        display: impl Fn(&Path) -> PathBuf,
    ) {
        let has_entry_point = files.iter().any(|f| is_entry_point(&module.root, f));
        let Some(record) = self.records.get_mut(&module.name) else {
            return;
        };
        record.files.extend(files.iter().map(|f| display(f)));
        record.file_count = record.files.len();
        record.has_entry_point = has_entry_point;

        if !has_entry_point {
            self.warnings.push(ScanWarning {
                module: module.name.clone(),
                file: None,
                kind: WarningKind::MissingEntryPoint,
                message: format!(
                    "No index entry file in {}; the module has no single public entry point",
                    module.root.display()
                ),
            });
        }
    }

    /// Fold the parse outcome of one file into its module's record
    pub fn record_file(
        &mut self,
        module: &str,
        file: &Path,
        outcome: anyhow::Result<ParseResult>,
    ) {
        let parsed = match outcome {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Failed to parse {}: {:#}", file.display(), e);
                self.warnings.push(ScanWarning {
                    module: module.to_string(),
                    file: Some(file.to_path_buf()),
                    kind: WarningKind::ParseFailure,
                    message: format!("Skipped unparsable file: {:#}", e),
                });
                return;
            }
        };

        if parsed.has_errors {
            debug!("{} has syntax errors; using recovered statements", file.display());
            self.warnings.push(ScanWarning {
                module: module.to_string(),
                file: Some(file.to_path_buf()),
                kind: WarningKind::SyntaxErrors,
                message: "File contains syntax errors; imports were extracted from the recovered tree"
                    .to_string(),
            });
        }

        for statement in &parsed.imports {
            self.record_statement(module, file, statement);
        }
    }

    fn record_statement(&mut self, module: &str, file: &Path, statement: &ImportStatement) {
        let registry = self.registry;
        let Some(source_layer) = registry.layer_of(module) else {
            return;
        };

        match classify(&statement.specifier, registry) {
            SpecifierKind::Relative => {}
            SpecifierKind::External(package) => {
                self.record_external(module, source_layer, file, statement, package);
            }
            SpecifierKind::Module(target) if target == module => {}
            SpecifierKind::Module(target) => {
                let Some(target_layer) = registry.layer_of(target) else {
                    return;
                };
                self.record_edge(module, target, source_layer, target_layer, file, statement);
            }
        }
    }

    fn record_edge(
        &mut self,
        module: &str,
        target: &str,
        source_layer: u32,
        target_layer: u32,
        file: &Path,
        statement: &ImportStatement,
    ) {
        self.edge_sites
            .entry((module.to_string(), target.to_string()))
            .or_insert_with(|| site(file, statement));

        let catalog = self.catalog;
        let evaluation = validate_dependency(catalog, module, target, source_layer, target_layer);
        let edge = EdgeContext::new(module, target, source_layer, target_layer);

        let Some(record) = self.records.get_mut(module) else {
            return;
        };
        record.import_count += 1;
        record.dependencies.insert(target.to_string());
        record.checks_passed += evaluation.passed.len();
        record.checks_failed += evaluation.failed.len();

        for rule in evaluation.failed {
            record.violations.push(Violation {
                module: module.to_string(),
                file: file.to_path_buf(),
                line: statement.line,
                column: statement.column,
                import_path: statement.specifier.clone(),
                target_module: target.to_string(),
                kind: rule.kind,
                severity: rule.severity,
                message: rule.violation_message(&edge),
                rule: Some(rule.id),
            });
        }
    }

    fn record_external(
        &mut self,
        module: &str,
        source_layer: u32,
        file: &Path,
        statement: &ImportStatement,
        package: String,
    ) {
        let catalog = self.catalog;
        let Some(record) = self.records.get_mut(module) else {
            return;
        };
        if !record.external_dependencies.insert(package.clone()) || source_layer != CORE_LAYER {
            return;
        }
        let Some(rule) = catalog.get(RuleId::R10) else {
            return;
        };
        record.checks_failed += 1;
        record.violations.push(Violation {
            module: module.to_string(),
            file: file.to_path_buf(),
            line: statement.line,
            column: statement.column,
            import_path: statement.specifier.clone(),
            target_module: package.clone(),
            kind: rule.kind,
            severity: rule.severity,
            message: format!(
                "Core module '{}' depends on external package '{}'; keep foundational dependencies minimal",
                module, package
            ),
            rule: Some(rule.id),
        });
    }

    /// Run cycle detection over the complete graph and freeze it.
    ///
    /// Must only be called once every module's files have been recorded:
    /// a partial graph would hide cycles.
    pub fn finish(mut self) -> ModuleGraph {
        let adjacency: BTreeMap<String, BTreeSet<String>> = self
            .records
            .iter()
            .map(|(name, record)| (name.clone(), record.dependencies.clone()))
            .collect();

        let cycles = detect_cycles(&adjacency);
        if !cycles.is_empty() {
            info!("Found {} dependency cycle(s)", cycles.len());
        }
        for cycle in &cycles {
            self.record_cycle(cycle);
        }

        for record in self.records.values_mut() {
            let in_cycle = record
                .violations
                .iter()
                .any(|v| v.rule == Some(RuleId::R8));
            if !in_cycle {
                record.checks_passed += 1;
            }
        }

        ModuleGraph {
            modules: self.records,
            edge_sites: self.edge_sites,
            cycles,
            warnings: self.warnings,
        }
    }

    fn record_cycle(&mut self, cycle: &[String]) {
        let catalog = self.catalog;
        let Some(rule) = catalog.get(RuleId::R8) else {
            return;
        };
        let path = format_cycle(cycle);

        for pair in cycle.windows(2) {
            let (node, next) = (&pair[0], &pair[1]);
            let site = self
                .edge_sites
                .get(&(node.clone(), next.clone()))
                .cloned()
                .unwrap_or_else(|| EdgeSite {
                    file: PathBuf::new(),
                    line: 0,
                    column: 0,
                    specifier: String::new(),
                });
            let Some(record) = self.records.get_mut(node) else {
                continue;
            };
            record.checks_failed += 1;
            record.violations.push(Violation {
                module: node.clone(),
                file: site.file,
                line: site.line,
                column: site.column,
                import_path: site.specifier,
                target_module: next.clone(),
                kind: rule.kind,
                severity: rule.severity,
                message: format!("Circular dependency: {}", path),
                rule: Some(rule.id),
            });
        }
    }
}

fn site(file: &Path, statement: &ImportStatement) -> EdgeSite {
    EdgeSite {
        file: file.to_path_buf(),
        line: statement.line,
        column: statement.column,
        specifier: statement.specifier.clone(),
    }
}

/// `index.*` directly in the module root or in its `src/` folder
fn is_entry_point(root: &Path, file: &Path) -> bool {
    let is_index = file
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s == "index");
    let parent = file.parent();
    is_index && (parent == Some(root) || parent == Some(root.join("src").as_path()))
}

/// Frozen result of a scan
#[derive(Debug, Clone, Serialize)]
pub struct ModuleGraph {
    modules: BTreeMap<String, ModuleRecord>,
    #[serde(skip)]
    edge_sites: BTreeMap<(String, String), EdgeSite>,
    cycles: Vec<Vec<String>>,
    warnings: Vec<ScanWarning>,
}

impl ModuleGraph {
    /// Graph made of already-built records (no cycle detection)
    pub fn from_records(records: impl IntoIterator<Item = ModuleRecord>) -> Self {
        Self {
            modules: records.into_iter().map(|r| (r.name.clone(), r)).collect(),
            edge_sites: BTreeMap::new(),
            cycles: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Records in module-name order
    pub fn modules(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.modules.values()
    }

    pub fn module(&self, name: &str) -> Option<&ModuleRecord> {
        self.modules.get(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// All `(source, target)` dependency edges
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.modules.values().flat_map(|r| {
            r.dependencies
                .iter()
                .map(move |d| (r.name.as_str(), d.as_str()))
        })
    }

    /// Where an edge first appears in the sources
    pub fn edge_site(&self, source: &str, target: &str) -> Option<&EdgeSite> {
        self.edge_sites.get(&(source.to_string(), target.to_string()))
    }

    /// Detected cycles, each closed with its first node
    pub fn cycles(&self) -> &[Vec<String>] {
        &self.cycles
    }

    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    /// Every violation, module by module
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.modules.values().flat_map(|r| r.violations.iter())
    }

    pub fn severity_counts(&self) -> SeverityCounts {
        SeverityCounts::from_violations(self.violations())
    }

    pub fn has_violations_at_or_above(&self, severity: Severity) -> bool {
        self.violations().any(|v| v.severity >= severity)
    }

    pub fn has_critical(&self) -> bool {
        self.has_violations_at_or_above(Severity::Critical)
    }
}
