//! Output reporters for archgate compliance results
//!
//! Supports multiple output formats:
//! - `text` - Terminal output with colors and status symbols
//! - `json` - Machine-readable JSON carrying every record verbatim
//! - `html` - Standalone HTML report
//! - `markdown` - GitHub-flavored Markdown with an optional Mermaid graph
//! - `dot` - Graphviz digraph of the module dependencies

mod dot;
mod html;
mod json;
mod markdown;
pub mod remediation;
mod text;

use crate::models::{EdgeSite, ModuleRecord, ScanWarning, Severity, Violation};
use crate::rules::RuleId;
use crate::scanner::ModuleGraph;
use crate::scoring::{ComplianceScore, ScoreStatus};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
    Markdown,
    Dot,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "dot" | "graphviz" => Ok(OutputFormat::Dot),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, html, markdown, dot",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Html => write!(f, "html"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Dot => write!(f, "dot"),
        }
    }
}

/// Top-level counts
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_modules: usize,
    pub total_files: usize,
    pub total_violations: usize,
    pub critical: usize,
    pub major: usize,
    pub minor: usize,
    pub warning: usize,
    pub status: ScoreStatus,
}

impl ReportSummary {
    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::Major => self.major,
            Severity::Minor => self.minor,
            Severity::Warning => self.warning,
        }
    }
}

/// Size of a module and of its dependency surface
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleMetrics {
    pub file_count: usize,
    pub import_count: usize,
    pub dependency_count: usize,
    pub external_dependency_count: usize,
    pub violation_count: usize,
}

/// One module as reported
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleEntry {
    pub name: String,
    pub layer: u32,
    pub metrics: ModuleMetrics,
    pub score: f64,
    pub has_entry_point: bool,
    pub checks_passed: usize,
    pub checks_failed: usize,
    pub files: Vec<PathBuf>,
    pub dependencies: Vec<String>,
    pub external_dependencies: Vec<String>,
    pub violations: Vec<Violation>,
}

impl ModuleEntry {
    fn from_record(record: &ModuleRecord, score: f64) -> Self {
        Self {
            name: record.name.clone(),
            layer: record.layer,
            metrics: ModuleMetrics {
                file_count: record.file_count,
                import_count: record.import_count,
                dependency_count: record.dependencies.len(),
                external_dependency_count: record.external_dependencies.len(),
                violation_count: record.violations.len(),
            },
            score,
            has_entry_point: record.has_entry_point,
            checks_passed: record.checks_passed,
            checks_failed: record.checks_failed,
            files: record.files.iter().cloned().collect(),
            dependencies: record.dependencies.iter().cloned().collect(),
            external_dependencies: record.external_dependencies.iter().cloned().collect(),
            violations: record.violations.clone(),
        }
    }

    pub fn status(&self) -> ScoreStatus {
        ScoreStatus::from_score(self.score)
    }
}

/// A module-to-module edge with the rules it breaks
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    pub source: String,
    pub target: String,
    pub violated_rules: Vec<RuleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<EdgeSite>,
}

impl DependencyEdge {
    pub fn is_compliant(&self) -> bool {
        self.violated_rules.is_empty()
    }
}

/// Everything a reporter renders
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    pub modules: Vec<ModuleEntry>,
    pub score: ComplianceScore,
    pub cycles: Vec<Vec<String>>,
    pub warnings: Vec<ScanWarning>,
    /// Dependency edges; `None` when the graph section is disabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<Vec<DependencyEdge>>,
}

impl ComplianceReport {
    /// Assemble a report from a scanned graph and its score
    pub fn new(graph: &ModuleGraph, score: &ComplianceScore) -> Self {
        let counts = graph.severity_counts();
        let modules: Vec<ModuleEntry> = graph
            .modules()
            .map(|record| {
                let module_score = score.modules.get(&record.name).copied().unwrap_or(100.0);
                ModuleEntry::from_record(record, module_score)
            })
            .collect();

        let summary = ReportSummary {
            total_modules: modules.len(),
            total_files: modules.iter().map(|m| m.metrics.file_count).sum(),
            total_violations: counts.total(),
            critical: counts.critical,
            major: counts.major,
            minor: counts.minor,
            warning: counts.warning,
            status: score.status(),
        };

        Self {
            generated_at: Utc::now(),
            summary,
            modules,
            score: score.clone(),
            cycles: graph.cycles().to_vec(),
            warnings: graph.warnings().to_vec(),
            graph: Some(dependency_edges(graph)),
        }
    }

    /// Drop the graph section
    pub fn without_graph(mut self) -> Self {
        self.graph = None;
        self
    }

    /// Every violation, module by module
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.modules.iter().flat_map(|m| m.violations.iter())
    }
}

fn dependency_edges(graph: &ModuleGraph) -> Vec<DependencyEdge> {
    graph
        .edges()
        .map(|(source, target)| {
            let violated_rules: BTreeSet<RuleId> = graph
                .module(source)
                .into_iter()
                .flat_map(|m| m.violations.iter())
                .filter(|v| v.target_module == target)
                .filter_map(|v| v.rule)
                .collect();
            DependencyEdge {
                source: source.to_string(),
                target: target.to_string(),
                violated_rules: violated_rules.into_iter().collect(),
                site: graph.edge_site(source, target).cloned(),
            }
        })
        .collect()
}

/// Render a compliance report in the specified format
pub fn report(report: &ComplianceReport, format: &str) -> Result<String> {
    let fmt = OutputFormat::from_str(format)?;
    report_with_format(report, fmt)
}

/// Render a compliance report using an OutputFormat enum
pub fn report_with_format(report: &ComplianceReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(report),
        OutputFormat::Json => json::render(report),
        OutputFormat::Html => html::render(report),
        OutputFormat::Markdown => markdown::render(report),
        OutputFormat::Dot => dot::render(report),
    }
}

/// Title-case a lowercase label
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
