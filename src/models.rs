//! Core data models for archgate
//!
//! These models are shared by the scanner, the rule engine and the
//! reporters: module records, violations and scan warnings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Architectural layer. 0 is the most foundational layer.
pub type Layer = u32;

/// Severity levels for violations
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Minor,
    Major,
    Critical,
}

impl Severity {
    /// All severities, most severe first
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::Major,
        Severity::Minor,
        Severity::Warning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Major => "major",
            Severity::Minor => "minor",
            Severity::Warning => "warning",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "major" => Ok(Severity::Major),
            "minor" => Ok(Severity::Minor),
            "warning" => Ok(Severity::Warning),
            _ => Err(anyhow::anyhow!(
                "Unknown severity '{}'. Valid severities: critical, major, minor, warning",
                s
            )),
        }
    }
}

/// What kind of architectural rule a violation breaks
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ViolationKind {
    /// Dependency points up (or sideways past) the layer hierarchy
    Layer,
    /// Module takes part in a dependency cycle
    Circular,
    /// Dependency that the module is not allowed to have at all
    Forbidden,
    /// Dependency between two modules of the same layer
    Peer,
}

impl ViolationKind {
    pub const ALL: [ViolationKind; 4] = [
        ViolationKind::Circular,
        ViolationKind::Forbidden,
        ViolationKind::Layer,
        ViolationKind::Peer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::Layer => "layer",
            ViolationKind::Circular => "circular",
            ViolationKind::Forbidden => "forbidden",
            ViolationKind::Peer => "peer",
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A rule failure on a specific edge or structural property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Offending (source) module
    pub module: String,
    pub file: PathBuf,
    /// 1-based
    pub line: u32,
    /// 1-based
    pub column: u32,
    /// Import specifier as written in the source
    pub import_path: String,
    pub target_module: String,
    pub kind: ViolationKind,
    pub severity: Severity,
    pub message: String,
    /// Catalog rule that produced this violation, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<crate::rules::RuleId>,
}

/// Where an edge was first seen in the source tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeSite {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
    pub specifier: String,
}

/// Everything the scan learned about one registered module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRecord {
    pub name: String,
    pub layer: Layer,
    /// Source files, relative to the scanned root
    pub files: BTreeSet<PathBuf>,
    pub file_count: usize,
    /// Number of inter-module import/export statements examined
    pub import_count: usize,
    /// Other registered modules this one imports
    pub dependencies: BTreeSet<String>,
    /// Non-registered packages this one imports (first path segment)
    pub external_dependencies: BTreeSet<String>,
    pub violations: Vec<Violation>,
    /// Rule evaluations that passed
    pub checks_passed: usize,
    /// Rule evaluations that failed
    pub checks_failed: usize,
    /// Whether the module root exposes an `index.*` entry file
    pub has_entry_point: bool,
}

impl ModuleRecord {
    /// Empty record for a registered module
    pub fn new(name: impl Into<String>, layer: Layer) -> Self {
        Self {
            name: name.into(),
            layer,
            files: BTreeSet::new(),
            file_count: 0,
            import_count: 0,
            dependencies: BTreeSet::new(),
            external_dependencies: BTreeSet::new(),
            violations: Vec::new(),
            checks_passed: 0,
            checks_failed: 0,
            has_entry_point: false,
        }
    }

    pub fn violations_of(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }
}

/// Category of a non-fatal scan problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// Registered module has no discoverable root
    MissingRoot,
    /// File could not be read or parsed and was skipped
    ParseFailure,
    /// File parsed with syntax errors; recovered statements were used
    SyntaxErrors,
    /// Module root has no `index.*` barrel entry
    MissingEntryPoint,
}

/// A non-fatal problem surfaced in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanWarning {
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    pub kind: WarningKind,
    pub message: String,
}

/// Count of violations per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub major: usize,
    pub minor: usize,
    pub warning: usize,
}

impl SeverityCounts {
    pub fn from_violations<'a>(violations: impl IntoIterator<Item = &'a Violation>) -> Self {
        let mut counts = Self::default();
        for v in violations {
            match v.severity {
                Severity::Critical => counts.critical += 1,
                Severity::Major => counts.major += 1,
                Severity::Minor => counts.minor += 1,
                Severity::Warning => counts.warning += 1,
            }
        }
        counts
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::Major => self.major,
            Severity::Minor => self.minor,
            Severity::Warning => self.warning,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.major + self.minor + self.warning
    }
}
