//! Weighted compliance scoring
//!
//! Every module starts with the full catalog weight. Each recorded
//! violation deducts the weight of the rule that produced it.
//!
//! # Scoring Formula
//!
//! ```text
//! module weight   = Σ rule weights                      (56, same for every module)
//! achieved        = max(0, module weight − Σ weight(rule of violation))
//! module score    = achieved / module weight × 100
//! overall score   = Σ achieved / Σ module weight × 100  (100 for an empty graph)
//! ```
//!
//! # Severity Scores
//!
//! - Critical: 100 with no critical violations, otherwise 0
//! - Major: max(0, 100 − 20 × count)
//! - Minor: max(0, 100 − 10 × count)
//! - Warning: max(0, 100 − 5 × count)
//!
//! # Example
//!
//! `core` (layer 0) imports `auth` (layer 1): R1 (10) and R2 (8) fail.
//!
//! core = (56 − 18) / 56 = 67.86, auth = 100, overall = 94 / 112 = 83.93

use crate::models::{ModuleRecord, Severity, SeverityCounts, Violation};
use crate::rules::RuleCatalog;
use crate::scanner::ModuleGraph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Per-violation deduction from the major severity score
const MAJOR_PENALTY: f64 = 20.0;
const MINOR_PENALTY: f64 = 10.0;
const WARNING_PENALTY: f64 = 5.0;

/// Score at or above which compliance is excellent
pub const EXCELLENT_THRESHOLD: f64 = 99.0;
/// Score at or above which compliance is acceptable
pub const ACCEPTABLE_THRESHOLD: f64 = 80.0;

/// Per-severity scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityScores {
    pub critical: f64,
    pub major: f64,
    pub minor: f64,
    pub warning: f64,
}

impl SeverityScores {
    pub fn from_counts(counts: &SeverityCounts) -> Self {
        let deduct = |count: usize, penalty: f64| (100.0 - penalty * count as f64).max(0.0);
        Self {
            critical: if counts.critical == 0 { 100.0 } else { 0.0 },
            major: deduct(counts.major, MAJOR_PENALTY),
            minor: deduct(counts.minor, MINOR_PENALTY),
            warning: deduct(counts.warning, WARNING_PENALTY),
        }
    }

    pub fn get(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Critical => self.critical,
            Severity::Major => self.major,
            Severity::Minor => self.minor,
            Severity::Warning => self.warning,
        }
    }
}

/// Rule-evaluation totals plus every violation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDetails {
    pub total_checks: usize,
    pub passed: usize,
    pub failed: usize,
    pub violations: Vec<Violation>,
}

/// Weighted compliance of a module graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceScore {
    /// 0-100, two decimals
    pub overall: f64,
    /// Module name -> 0-100, two decimals
    pub modules: BTreeMap<String, f64>,
    pub severities: SeverityScores,
    pub details: ScoreDetails,
}

impl ComplianceScore {
    pub fn status(&self) -> ScoreStatus {
        ScoreStatus::from_score(self.overall)
    }
}

/// Coarse rating of a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreStatus {
    Excellent,
    Acceptable,
    Poor,
}

impl ScoreStatus {
    pub fn from_score(score: f64) -> Self {
        if score >= EXCELLENT_THRESHOLD {
            ScoreStatus::Excellent
        } else if score >= ACCEPTABLE_THRESHOLD {
            ScoreStatus::Acceptable
        } else {
            ScoreStatus::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreStatus::Excellent => "excellent",
            ScoreStatus::Acceptable => "acceptable",
            ScoreStatus::Poor => "poor",
        }
    }
}

impl std::fmt::Display for ScoreStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Score a scanned graph against the catalog
pub fn calculate_compliance_score(graph: &ModuleGraph, catalog: &RuleCatalog) -> ComplianceScore {
    let module_weight = catalog.total_weight();

    let mut modules = BTreeMap::new();
    let mut achieved_total: u64 = 0;
    let mut weight_total: u64 = 0;
    for record in graph.modules() {
        let achieved = achieved_weight(record, catalog, module_weight);
        modules.insert(
            record.name.clone(),
            round2(percentage(achieved as f64, module_weight as f64)),
        );
        achieved_total += u64::from(achieved);
        weight_total += u64::from(module_weight);
    }

    let overall = if weight_total == 0 {
        100.0
    } else {
        round2(percentage(achieved_total as f64, weight_total as f64))
    };

    let passed: usize = graph.modules().map(|r| r.checks_passed).sum();
    let failed: usize = graph.modules().map(|r| r.checks_failed).sum();
    let violations: Vec<Violation> = graph.violations().cloned().collect();
    let severities = SeverityScores::from_counts(&SeverityCounts::from_violations(&violations));

    debug!(
        "Compliance: overall={:.2} over {} modules ({} passed, {} failed checks)",
        overall,
        modules.len(),
        passed,
        failed
    );

    ComplianceScore {
        overall,
        modules,
        severities,
        details: ScoreDetails {
            total_checks: passed + failed,
            passed,
            failed,
            violations,
        },
    }
}

/// Module weight minus the weight of every violated rule, floored at zero
fn achieved_weight(record: &ModuleRecord, catalog: &RuleCatalog, module_weight: u32) -> u32 {
    let deducted: u32 = record
        .violations
        .iter()
        .filter_map(|v| {
            v.rule
                .and_then(|id| catalog.get(id))
                .or_else(|| catalog.rule_for(v.kind, v.severity))
        })
        .map(|rule| rule.weight)
        .sum();
    module_weight.saturating_sub(deducted)
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        100.0
    } else {
        (part / whole * 100.0).clamp(0.0, 100.0)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModuleRegistry;
    use crate::models::ViolationKind;
    use crate::parsers::{ImportStatement, StatementKind};
    use crate::scanner::{scan, InMemorySource};
    use std::path::PathBuf;

    fn violation(kind: ViolationKind, severity: Severity) -> Violation {
        Violation {
            module: "m".into(),
            file: PathBuf::from("packages/m/index.ts"),
            line: 1,
            column: 1,
            import_path: "@app/x".into(),
            target_module: "x".into(),
            kind,
            severity,
            message: String::new(),
            rule: None,
        }
    }

    fn core_auth_graph(core_imports_auth: bool) -> ModuleGraph {
        let registry = ModuleRegistry::new("@app")
            .with_module("core", 0, "packages/core")
            .with_module("auth", 1, "packages/auth");
        let stmt = |s: &str| vec![ImportStatement::new(s, 1, 1, StatementKind::Import)];
        let source = if core_imports_auth {
            InMemorySource::new()
                .with_file("core", "packages/core/index.ts", stmt("@app/auth"))
                .with_file("auth", "packages/auth/index.ts", vec![])
        } else {
            InMemorySource::new()
                .with_file("core", "packages/core/index.ts", vec![])
                .with_file("auth", "packages/auth/index.ts", stmt("@app/core"))
        };
        scan(&registry, &source, &RuleCatalog::standard()).unwrap()
    }

    #[test]
    fn test_compliant_graph_scores_100() {
        let score = calculate_compliance_score(&core_auth_graph(false), &RuleCatalog::standard());
        assert_eq!(score.overall, 100.0);
        assert_eq!(score.modules["core"], 100.0);
        assert_eq!(score.modules["auth"], 100.0);
        assert_eq!(score.severities.critical, 100.0);
        assert!(score.details.violations.is_empty());
        assert_eq!(score.status(), ScoreStatus::Excellent);
    }

    #[test]
    fn test_reversed_import_lowers_scores() {
        let score = calculate_compliance_score(&core_auth_graph(true), &RuleCatalog::standard());
        assert_eq!(score.details.violations.len(), 2);
        assert_eq!(score.modules["core"], 67.86);
        assert_eq!(score.modules["auth"], 100.0);
        assert_eq!(score.overall, 83.93);
        assert_eq!(score.severities.critical, 0.0);
        assert_eq!(score.status(), ScoreStatus::Acceptable);
        assert_eq!(score.details.failed, 2);
        assert_eq!(score.details.total_checks, score.details.passed + 2);
    }

    #[test]
    fn test_empty_graph_scores_100() {
        let graph = ModuleGraph::from_records(Vec::new());
        let score = calculate_compliance_score(&graph, &RuleCatalog::standard());
        assert_eq!(score.overall, 100.0);
        assert!(score.modules.is_empty());
        assert_eq!(score.details.total_checks, 0);
    }

    #[test]
    fn test_severity_scores() {
        let counts = SeverityCounts {
            critical: 1,
            major: 3,
            minor: 0,
            warning: 25,
        };
        let scores = SeverityScores::from_counts(&counts);
        assert_eq!(scores.critical, 0.0);
        assert_eq!(scores.major, 40.0);
        assert_eq!(scores.minor, 100.0);
        assert_eq!(scores.warning, 0.0);

        let many = SeverityCounts {
            critical: 7,
            ..Default::default()
        };
        assert_eq!(SeverityScores::from_counts(&many).critical, 0.0);
    }

    #[test]
    fn test_deduction_falls_back_to_kind_and_severity() {
        let mut record = ModuleRecord::new("m", 3);
        record.violations.push(violation(ViolationKind::Peer, Severity::Major));
        record.violations.push(violation(ViolationKind::Circular, Severity::Critical));
        let score =
            calculate_compliance_score(&ModuleGraph::from_records(vec![record]), &RuleCatalog::standard());
        // R3 (6) + R8 (10)
        assert_eq!(score.modules["m"], round2(40.0 / 56.0 * 100.0));
    }

    #[test]
    fn test_scores_never_go_negative() {
        let mut record = ModuleRecord::new("m", 0);
        for _ in 0..20 {
            record
                .violations
                .push(violation(ViolationKind::Forbidden, Severity::Critical));
        }
        let score =
            calculate_compliance_score(&ModuleGraph::from_records(vec![record]), &RuleCatalog::standard());
        assert_eq!(score.modules["m"], 0.0);
        assert_eq!(score.overall, 0.0);
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(ScoreStatus::from_score(99.0), ScoreStatus::Excellent);
        assert_eq!(ScoreStatus::from_score(98.99), ScoreStatus::Acceptable);
        assert_eq!(ScoreStatus::from_score(80.0), ScoreStatus::Acceptable);
        assert_eq!(ScoreStatus::from_score(79.99), ScoreStatus::Poor);
    }
}
