//! Text (terminal) reporter with colors and status symbols
//!
//! Styling goes through `console`, which drops the escape codes when the
//! output is not a terminal.

use super::{ComplianceReport, ModuleEntry};
use crate::models::{Severity, Violation};
use crate::scoring::ScoreStatus;
use anyhow::Result;
use console::{style, StyledObject};

/// Maximum violations listed before the rest are summarized
const MAX_VIOLATIONS: usize = 20;

/// Status symbol and color for a score
fn styled_status<D>(status: ScoreStatus, value: D) -> StyledObject<D> {
    match status {
        ScoreStatus::Excellent => style(value).green(),
        ScoreStatus::Acceptable => style(value).yellow(),
        ScoreStatus::Poor => style(value).red(),
    }
}

fn status_symbol(status: ScoreStatus) -> &'static str {
    match status {
        ScoreStatus::Excellent => "✓",
        ScoreStatus::Acceptable => "!",
        ScoreStatus::Poor => "✗",
    }
}

/// Severity tag
fn severity_tag(severity: Severity) -> StyledObject<&'static str> {
    match severity {
        Severity::Critical => style("[C]").red().bold(),
        Severity::Major => style("[M]").red(),
        Severity::Minor => style("[m]").yellow(),
        Severity::Warning => style("[W]").blue(),
    }
}

/// Render report as formatted terminal output
pub fn render(report: &ComplianceReport) -> Result<String> {
    let mut out = String::new();
    let s = &report.summary;

    // Header
    out.push_str(&format!("\n{}\n", style("archgate compliance").bold()));
    out.push_str(&format!(
        "{}\n",
        style("──────────────────────────────────────").dim()
    ));
    out.push_str(&format!(
        "Score: {}  {}  Modules: {}  Files: {}  Violations: {}\n\n",
        styled_status(s.status, format!("{:.2}/100", report.score.overall)).bold(),
        styled_status(s.status, format!("{} {}", status_symbol(s.status), s.status)),
        s.total_modules,
        s.total_files,
        s.total_violations
    ));

    // Severity scores
    out.push_str(&format!("{}\n ", style("SEVERITY").bold()));
    for severity in Severity::ALL {
        let score = report.score.severities.get(severity);
        out.push_str(&format!(
            " {} {} ({:.0})",
            severity,
            s.count(severity),
            styled_status(ScoreStatus::from_score(score), score)
        ));
    }
    out.push_str("\n\n");

    // Modules
    out.push_str(&format!("{}\n", style("MODULES").bold()));
    out.push_str(&format!(
        "{}\n",
        style("     MODULE                LAYER  FILES  IMPORTS  DEPS  VIOL   SCORE").dim()
    ));
    for module in &report.modules {
        out.push_str(&render_module_row(module));
    }
    out.push('\n');

    // Violations
    if s.total_violations > 0 {
        out.push_str(&format!(
            "{} ({} total)\n",
            style("VIOLATIONS").bold(),
            s.total_violations
        ));
        for v in report.violations().take(MAX_VIOLATIONS) {
            out.push_str(&render_violation(v));
        }
        let remaining = s.total_violations.saturating_sub(MAX_VIOLATIONS);
        if remaining > 0 {
            out.push_str(&format!(
                "  {}\n",
                style(format!("...and {} more (use --format markdown for all)", remaining)).dim()
            ));
        }
        out.push('\n');
    }

    // Cycles
    for cycle in &report.cycles {
        out.push_str(&format!(
            "{} {}\n",
            style("cycle:").red().bold(),
            cycle.join(" → ")
        ));
    }
    if !report.cycles.is_empty() {
        out.push('\n');
    }

    // Warnings
    if !report.warnings.is_empty() {
        out.push_str(&format!(
            "{} ({})\n",
            style("WARNINGS").bold(),
            report.warnings.len()
        ));
        for w in &report.warnings {
            out.push_str(&format!(
                "  {} {}: {}\n",
                style("!").yellow(),
                w.module,
                style(&w.message).dim()
            ));
        }
        out.push('\n');
    }

    // Tips based on status
    let tip = match s.status {
        ScoreStatus::Excellent => "Layering is intact.",
        ScoreStatus::Acceptable => "Address remaining violations to keep the layering intact.",
        ScoreStatus::Poor => "Fix critical violations first; run `archgate rules` to see the catalog.",
    };
    out.push_str(&format!("{}\n", style(tip).dim()));

    Ok(out)
}

fn render_module_row(module: &ModuleEntry) -> String {
    let status = module.status();
    let name: String = module.name.chars().take(20).collect();
    format!(
        "  {}  {:<20}  {:>5}  {:>5}  {:>7}  {:>4}  {:>4}  {}\n",
        styled_status(status, status_symbol(status)),
        name,
        module.layer,
        module.metrics.file_count,
        module.metrics.import_count,
        module.metrics.dependency_count,
        module.metrics.violation_count,
        styled_status(status, format!("{:>6.2}", module.score))
    )
}

fn render_violation(v: &Violation) -> String {
    let rule = v.rule.map(|r| r.to_string()).unwrap_or_else(|| "-".to_string());
    format!(
        "  {} {:<3} {} → {}  {}\n      {}\n",
        severity_tag(v.severity),
        rule,
        v.module,
        v.target_module,
        style(format!("{}:{}:{}", v.file.display(), v.line, v.column)).dim(),
        v.message
    )
}
