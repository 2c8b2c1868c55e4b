//! Markdown reporter for GitHub-flavored Markdown output
//!
//! Generates reports suitable for:
//! - Pull request comments
//! - CI job summaries
//! - Architecture decision records

use super::{capitalize, remediation, ComplianceReport, DependencyEdge, ModuleEntry};
use crate::models::{Severity, Violation, ViolationKind};
use crate::scoring::ScoreStatus;
use anyhow::Result;

/// Maximum violations to show per module and kind
const MAX_VIOLATIONS_PER_KIND: usize = 10;

/// Render report as GitHub-flavored Markdown
pub fn render(report: &ComplianceReport) -> Result<String> {
    let mut md = String::new();

    // Header
    md.push_str(&render_header(report));
    md.push('\n');

    // Executive summary
    md.push_str(&render_summary(report));
    md.push('\n');

    // Severity breakdown
    md.push_str(&render_severity_table(report));
    md.push('\n');

    // Modules
    md.push_str(&render_module_table(report));
    md.push('\n');

    // Violations, grouped by module then kind
    md.push_str(&render_violations(report));
    md.push('\n');

    if !report.warnings.is_empty() {
        md.push_str(&render_warnings(report));
        md.push('\n');
    }

    if let Some(edges) = &report.graph {
        md.push_str(&render_graph(report, edges));
        md.push('\n');
    }

    // Footer
    md.push_str(&render_footer());

    Ok(md)
}

fn render_header(report: &ComplianceReport) -> String {
    let timestamp = report.generated_at.format("%Y-%m-%d %H:%M:%S UTC");

    format!(
        r#"# {} Architecture Compliance Report

**Score: {:.2}/100** | **Status: {}**

Generated: {}
"#,
        status_emoji(report.summary.status),
        report.score.overall,
        capitalize(report.summary.status.as_str()),
        timestamp
    )
}

fn render_summary(report: &ComplianceReport) -> String {
    let s = &report.summary;
    let assessment = match s.status {
        ScoreStatus::Excellent => "The dependency graph follows the layered architecture",
        ScoreStatus::Acceptable => "Some dependencies cross layer boundaries and should be addressed",
        ScoreStatus::Poor => "The layering is significantly eroded; fix critical violations first",
    };

    format!(
        r#"## Executive Summary

| Metric | Value |
|--------|-------|
| **Overall Score** | {:.2}/100 |
| **Modules** | {} |
| **Files** | {} |
| **Violations** | {} |
| **Rule Checks** | {} passed / {} failed |
| **Cycles** | {} |
| **Assessment** | {} |
"#,
        report.score.overall,
        s.total_modules,
        s.total_files,
        s.total_violations,
        report.score.details.passed,
        report.score.details.failed,
        report.cycles.len(),
        assessment
    )
}

fn render_severity_table(report: &ComplianceReport) -> String {
    let mut md = String::from(
        "## Violations by Severity\n\n| Severity | Count | Score |\n|----------|-------|-------|\n",
    );
    for severity in Severity::ALL {
        md.push_str(&format!(
            "| {} {} | {} | {:.0} |\n",
            severity_emoji(severity),
            capitalize(severity.as_str()),
            report.summary.count(severity),
            report.score.severities.get(severity)
        ));
    }
    md.push_str(&format!(
        "| **Total** | **{}** | |\n",
        report.summary.total_violations
    ));
    md
}

fn render_module_table(report: &ComplianceReport) -> String {
    let mut md = String::from(
        r#"## Modules

| Module | Layer | Files | Imports | Dependencies | Violations | Score |
|--------|-------|-------|---------|--------------|------------|-------|
"#,
    );
    for module in &report.modules {
        md.push_str(&format!(
            "| `{}` | {} | {} | {} | {} | {} | {:.2} {} |\n",
            module.name,
            module.layer,
            module.metrics.file_count,
            module.metrics.import_count,
            module.metrics.dependency_count,
            module.metrics.violation_count,
            module.score,
            status_emoji(module.status())
        ));
    }
    md
}

fn render_violations(report: &ComplianceReport) -> String {
    let mut md = String::from("## Violations\n\n");

    if report.summary.total_violations == 0 {
        md.push_str("✅ No violations found! Every dependency respects the layering.\n");
        return md;
    }

    for module in report.modules.iter().filter(|m| !m.violations.is_empty()) {
        md.push_str(&render_module_violations(module));
    }
    md
}

fn render_module_violations(module: &ModuleEntry) -> String {
    let mut md = format!(
        "### `{}` (layer {}, score {:.2})\n\n",
        module.name, module.layer, module.score
    );

    for kind in ViolationKind::ALL {
        let violations: Vec<&Violation> =
            module.violations.iter().filter(|v| v.kind == kind).collect();
        if violations.is_empty() {
            continue;
        }

        md.push_str(&format!(
            "#### {} ({})\n\n",
            capitalize(kind.as_str()),
            violations.len()
        ));

        for v in violations.iter().take(MAX_VIOLATIONS_PER_KIND) {
            md.push_str(&render_violation(v));
        }
        let hidden = violations.len().saturating_sub(MAX_VIOLATIONS_PER_KIND);
        if hidden > 0 {
            md.push_str(&format!("*...and {} more {} violations*\n", hidden, kind));
        }
        md.push('\n');

        md.push_str("**Remediation:**\n\n");
        for suggestion in remediation::suggestions(kind) {
            md.push_str(&format!("> 💡 {}\n", suggestion));
        }
        md.push('\n');
    }
    md
}

fn render_violation(v: &Violation) -> String {
    let rule = v.rule.map(|r| format!("`{}` ", r)).unwrap_or_default();
    format!(
        "- {} {}{} at `{}:{}:{}` (`{}`)\n",
        severity_emoji(v.severity),
        rule,
        v.message,
        v.file.display(),
        v.line,
        v.column,
        v.import_path
    )
}

fn render_warnings(report: &ComplianceReport) -> String {
    let mut md = format!("## Warnings ({})\n\n", report.warnings.len());
    for w in &report.warnings {
        match &w.file {
            Some(file) => md.push_str(&format!(
                "- ⚠️ `{}`: {} (`{}`)\n",
                w.module,
                w.message,
                file.display()
            )),
            None => md.push_str(&format!("- ⚠️ `{}`: {}\n", w.module, w.message)),
        }
    }
    md
}

fn render_graph(report: &ComplianceReport, edges: &[DependencyEdge]) -> String {
    let mut md = String::from("## Dependency Graph\n\n```mermaid\ngraph TD\n");
    for module in &report.modules {
        md.push_str(&format!(
            "    {}[\"{} (L{})\"]\n",
            mermaid_id(&module.name),
            module.name,
            module.layer
        ));
    }
    for edge in edges {
        if edge.is_compliant() {
            md.push_str(&format!(
                "    {} --> {}\n",
                mermaid_id(&edge.source),
                mermaid_id(&edge.target)
            ));
        } else {
            let rules: Vec<String> = edge.violated_rules.iter().map(|r| r.to_string()).collect();
            md.push_str(&format!(
                "    {} -.->|{}| {}\n",
                mermaid_id(&edge.source),
                rules.join(", "),
                mermaid_id(&edge.target)
            ));
        }
    }
    md.push_str("```\n");
    md
}

fn render_footer() -> String {
    r#"---

*Generated by archgate*
"#
    .to_string()
}

/// Mermaid node ids must be plain identifiers
fn mermaid_id(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn status_emoji(status: ScoreStatus) -> &'static str {
    match status {
        ScoreStatus::Excellent => "✅",
        ScoreStatus::Acceptable => "⚠️",
        ScoreStatus::Poor => "❌",
    }
}

fn severity_emoji(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "🔴",
        Severity::Major => "🟠",
        Severity::Minor => "🟡",
        Severity::Warning => "🔵",
    }
}
