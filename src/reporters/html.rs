//! HTML reporter with embedded styles
//!
//! Generates a standalone HTML report that can be viewed in any browser.
//! Includes:
//! - Overall score and status badge
//! - Severity scores as progress bars
//! - Per-module table
//! - Violations grouped by module with remediation hints
//! - Dependency edge table (omitted when the graph section is disabled)
//! - Responsive design for mobile and desktop

use super::{capitalize, remediation, ComplianceReport, DependencyEdge, ModuleEntry};
use crate::models::{Severity, Violation, ViolationKind};
use crate::scoring::ScoreStatus;
use anyhow::Result;

/// Render report as standalone HTML
pub fn render(report: &ComplianceReport) -> Result<String> {
    let mut html = String::new();

    // DOCTYPE and head
    html.push_str(&render_head(report));

    // Body
    html.push_str("<body>\n<div class=\"container\">\n");

    // Header
    html.push_str(&render_header(report));

    // Content
    html.push_str("<div class=\"content\">\n");

    html.push_str(&render_score_section(report));
    html.push_str(&render_severity_scores(report));
    html.push_str(&render_modules(report));
    html.push_str(&render_violations(report));
    if !report.warnings.is_empty() {
        html.push_str(&render_warnings(report));
    }
    if let Some(edges) = &report.graph {
        html.push_str(&render_graph(edges));
    }

    html.push_str("</div>\n"); // content

    // Footer
    html.push_str(&render_footer());

    html.push_str("</div>\n</body>\n</html>");

    Ok(html)
}

fn render_head(report: &ComplianceReport) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>archgate Report - {:.2}/100</title>
    <style>
{CSS}
    </style>
</head>
"#,
        report.score.overall
    )
}

fn render_header(report: &ComplianceReport) -> String {
    let timestamp = report.generated_at.format("%Y-%m-%d %H:%M:%S UTC");
    format!(
        r#"<div class="header">
    <h1>Architecture Compliance Report</h1>
    <p class="timestamp">Generated {}</p>
</div>
"#,
        timestamp
    )
}

fn render_score_section(report: &ComplianceReport) -> String {
    let s = &report.summary;
    let description = match s.status {
        ScoreStatus::Excellent => "The dependency graph follows the layered architecture",
        ScoreStatus::Acceptable => "Some dependencies cross layer boundaries",
        ScoreStatus::Poor => "The layering is significantly eroded",
    };

    format!(
        r#"<div class="score-section">
    <div class="status-badge status-{}">{:.0}</div>
    <div class="score">Overall Score: {:.2}/100</div>
    <p class="status-description">{}</p>
    <div class="stats-grid">
        <div class="stat-item"><div class="stat-value">{}</div><div class="stat-label">Modules</div></div>
        <div class="stat-item"><div class="stat-value">{}</div><div class="stat-label">Files</div></div>
        <div class="stat-item"><div class="stat-value">{}</div><div class="stat-label">Violations</div></div>
        <div class="stat-item"><div class="stat-value">{}</div><div class="stat-label">Cycles</div></div>
    </div>
</div>
"#,
        s.status,
        report.score.overall,
        report.score.overall,
        description,
        s.total_modules,
        s.total_files,
        s.total_violations,
        report.cycles.len()
    )
}

fn render_severity_scores(report: &ComplianceReport) -> String {
    let mut html = String::from(
        r#"<div class="section">
    <h2 class="section-title">Severity Scores</h2>
    <div class="metrics-grid">
"#,
    );
    for severity in Severity::ALL {
        let score = report.score.severities.get(severity);
        html.push_str(&format!(
            r#"        <div class="metric-card">
            <h3>{} ({})</h3>
            <div class="metric-value">{:.0}</div>
            <div class="metric-bar">
                <div class="metric-bar-fill {}" style="width: {}%"></div>
            </div>
        </div>
"#,
            capitalize(severity.as_str()),
            report.summary.count(severity),
            score,
            bar_class(score),
            score
        ));
    }
    html.push_str("    </div>\n</div>\n");
    html
}

fn render_modules(report: &ComplianceReport) -> String {
    let mut html = String::from(
        r#"<div class="section">
    <h2 class="section-title">Modules</h2>
    <table class="module-table">
        <thead><tr><th>Module</th><th>Layer</th><th>Files</th><th>Imports</th><th>Dependencies</th><th>Violations</th><th>Score</th></tr></thead>
        <tbody>
"#,
    );
    for m in &report.modules {
        html.push_str(&format!(
            "            <tr><td><code>{}</code></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{:.2}</td></tr>\n",
            html_escape(&m.name),
            m.layer,
            m.metrics.file_count,
            m.metrics.import_count,
            m.metrics.dependency_count,
            m.metrics.violation_count,
            bar_class(m.score),
            m.score
        ));
    }
    html.push_str("        </tbody>\n    </table>\n</div>\n");
    html
}

fn render_violations(report: &ComplianceReport) -> String {
    if report.summary.total_violations == 0 {
        return r#"<div class="section">
    <h2 class="section-title">No Violations Found</h2>
    <p>Every dependency respects the layering.</p>
</div>
"#
        .to_string();
    }

    let mut html = format!(
        r#"<div class="section">
    <h2 class="section-title">Violations ({} total)</h2>
    <div class="violations-list">
"#,
        report.summary.total_violations
    );

    for module in report.modules.iter().filter(|m| !m.violations.is_empty()) {
        html.push_str(&render_module_violations(module));
    }

    html.push_str("    </div>\n</div>\n");
    html
}

fn render_module_violations(module: &ModuleEntry) -> String {
    let mut html = format!(
        r#"<div class="module-card">
        <div class="module-header"><code>{}</code> <span class="layer-badge">layer {}</span></div>
        <div class="module-body">
"#,
        html_escape(&module.name),
        module.layer
    );

    for kind in ViolationKind::ALL {
        let violations: Vec<&Violation> =
            module.violations.iter().filter(|v| v.kind == kind).collect();
        if violations.is_empty() {
            continue;
        }
        html.push_str(&format!(
            "            <h3>{} ({})</h3>\n",
            capitalize(kind.as_str()),
            violations.len()
        ));
        for v in violations {
            html.push_str(&render_violation(v));
        }

        let tips: Vec<String> = remediation::suggestions(kind)
            .iter()
            .map(|s| format!("<li>{}</li>", html_escape(s)))
            .collect();
        html.push_str(&format!(
            r#"            <div class="suggested-fix">
                <div class="suggested-fix-label">Remediation</div>
                <ul class="suggested-fix-text">{}</ul>
            </div>
"#,
            tips.join("")
        ));
    }

    html.push_str("        </div>\n    </div>\n");
    html
}

fn render_violation(v: &Violation) -> String {
    let rule = v
        .rule
        .map(|r| format!("<span class=\"rule-badge\">{}</span>", r))
        .unwrap_or_default();
    format!(
        r#"            <div class="violation">
                <span class="severity-badge severity-{}">{}</span>{}
                <span class="violation-message">{}</span>
                <div class="file-item">{}:{}:{} <code>{}</code></div>
            </div>
"#,
        v.severity,
        capitalize(v.severity.as_str()),
        rule,
        html_escape(&v.message),
        html_escape(&v.file.display().to_string()),
        v.line,
        v.column,
        html_escape(&v.import_path)
    )
}

fn render_warnings(report: &ComplianceReport) -> String {
    let items: Vec<String> = report
        .warnings
        .iter()
        .map(|w| {
            let file = w
                .file
                .as_ref()
                .map(|f| format!(" <code>{}</code>", html_escape(&f.display().to_string())))
                .unwrap_or_default();
            format!(
                "        <li><code>{}</code>: {}{}</li>",
                html_escape(&w.module),
                html_escape(&w.message),
                file
            )
        })
        .collect();
    format!(
        r#"<div class="section">
    <h2 class="section-title">Warnings ({})</h2>
    <ul class="warnings-list">
{}
    </ul>
</div>
"#,
        report.warnings.len(),
        items.join("\n")
    )
}

fn render_graph(edges: &[DependencyEdge]) -> String {
    if edges.is_empty() {
        return r#"<div class="section">
    <h2 class="section-title">Dependency Graph</h2>
    <p>No module depends on another module.</p>
</div>
"#
        .to_string();
    }

    let mut html = String::from(
        r#"<div class="section">
    <h2 class="section-title">Dependency Graph</h2>
    <table class="module-table edge-table">
        <thead><tr><th>From</th><th>To</th><th>Broken rules</th><th>First import</th></tr></thead>
        <tbody>
"#,
    );
    for edge in edges {
        let rules = if edge.is_compliant() {
            "<span class=\"bar-good\">&#10003;</span>".to_string()
        } else {
            edge.violated_rules
                .iter()
                .map(|r| format!("<span class=\"rule-badge\">{}</span>", r))
                .collect::<Vec<_>>()
                .join(" ")
        };
        let site = edge
            .site
            .as_ref()
            .map(|s| {
                format!(
                    "<code>{}:{}:{}</code>",
                    html_escape(&s.file.display().to_string()),
                    s.line,
                    s.column
                )
            })
            .unwrap_or_default();
        html.push_str(&format!(
            "            <tr><td><code>{}</code></td><td><code>{}</code></td><td>{}</td><td>{}</td></tr>\n",
            html_escape(&edge.source),
            html_escape(&edge.target),
            rules,
            site
        ));
    }
    html.push_str("        </tbody>\n    </table>\n</div>\n");
    html
}

fn render_footer() -> String {
    r#"<div class="footer">
    <p>Generated by archgate</p>
</div>
"#
    .to_string()
}

fn bar_class(score: f64) -> &'static str {
    match ScoreStatus::from_score(score) {
        ScoreStatus::Excellent => "bar-good",
        ScoreStatus::Acceptable => "bar-moderate",
        ScoreStatus::Poor => "bar-poor",
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// Embedded CSS
const CSS: &str = r#"
:root {
    --primary-color: #0f766e;
    --background-color: #f8fafc;
    --text-color: #1e293b;
    --muted-color: #64748b;
    --card-background: white;
    --border-color: #e2e8f0;
}

* { margin: 0; padding: 0; box-sizing: border-box; }

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    line-height: 1.6;
    color: var(--text-color);
    background: var(--background-color);
    padding: 2rem;
}

.container {
    max-width: 1200px;
    margin: 0 auto;
    background: var(--card-background);
    border-radius: 12px;
    box-shadow: 0 4px 6px -1px rgba(0,0,0,0.1);
    overflow: hidden;
}

.header {
    background: linear-gradient(135deg, #0f766e 0%, #0369a1 100%);
    color: white;
    padding: 2.5rem 2rem;
    text-align: center;
}

.header h1 { font-size: 2.25rem; margin-bottom: 0.5rem; }
.header .timestamp { opacity: 0.9; font-size: 0.95rem; }

.content { padding: 2rem; }

.score-section {
    text-align: center;
    padding: 2rem;
    background: #f1f5f9;
    border-radius: 8px;
    margin-bottom: 2rem;
}

.status-badge {
    display: inline-block;
    font-size: 2.5rem;
    font-weight: bold;
    width: 120px;
    height: 120px;
    line-height: 120px;
    border-radius: 50%;
    margin-bottom: 1rem;
    color: white;
}

.status-excellent { background: #10b981; }
.status-acceptable { background: #eab308; }
.status-poor { background: #ef4444; }

.score { font-size: 1.5rem; color: var(--muted-color); }
.status-description { color: var(--muted-color); font-style: italic; margin-bottom: 1.5rem; }

.section { margin-bottom: 2rem; }
.section-title {
    font-size: 1.5rem;
    margin-bottom: 1rem;
    padding-bottom: 0.5rem;
    border-bottom: 2px solid var(--border-color);
}

.metrics-grid, .stats-grid {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
    gap: 1rem;
}

.metric-card, .stat-item {
    background: var(--card-background);
    border: 1px solid var(--border-color);
    border-radius: 8px;
    padding: 1.25rem;
}

.metric-card h3 {
    font-size: 0.875rem;
    color: var(--muted-color);
    margin-bottom: 0.5rem;
    text-transform: uppercase;
}

.metric-value, .stat-value { font-size: 2rem; font-weight: bold; }
.stat-label { font-size: 0.875rem; color: var(--muted-color); }

.metric-bar { height: 8px; background: #e2e8f0; border-radius: 4px; overflow: hidden; }
.metric-bar-fill { height: 100%; border-radius: 4px; }
.bar-good { background: #10b981; }
.bar-moderate { background: #f59e0b; }
.bar-poor { background: #ef4444; }
td.bar-good, td.bar-moderate, td.bar-poor { background: none; font-weight: 600; }
td.bar-good { color: #059669; }
td.bar-moderate { color: #b45309; }
td.bar-poor { color: #dc2626; }

.module-table { width: 100%; border-collapse: collapse; }
.module-table th, .module-table td {
    padding: 0.5rem 0.75rem;
    border-bottom: 1px solid var(--border-color);
    text-align: left;
}
.module-table th { font-size: 0.8rem; text-transform: uppercase; color: var(--muted-color); }

.violations-list { display: flex; flex-direction: column; gap: 1rem; }

.module-card { border: 1px solid var(--border-color); border-radius: 8px; overflow: hidden; }
.module-header { padding: 0.75rem 1rem; background: #f8fafc; font-weight: 600; }
.module-body { padding: 1rem; }
.module-body h3 { font-size: 1rem; margin: 0.5rem 0; }

.layer-badge, .rule-badge {
    background: #ccfbf1;
    color: #0f766e;
    padding: 0.1rem 0.5rem;
    border-radius: 6px;
    font-size: 0.8rem;
    margin-left: 0.5rem;
}

.violation { margin-bottom: 0.75rem; }
.violation-message { margin-left: 0.5rem; }

.severity-badge {
    padding: 0.15rem 0.6rem;
    border-radius: 6px;
    font-size: 0.8rem;
    font-weight: 600;
    color: white;
}

.severity-critical { background: #dc2626; }
.severity-major { background: #ea580c; }
.severity-minor { background: #ca8a04; }
.severity-warning { background: #2563eb; }

.file-item {
    font-family: monospace;
    font-size: 0.85rem;
    color: var(--muted-color);
    padding: 0.35rem 0.5rem;
    background: #f8fafc;
    border-radius: 4px;
    margin-top: 0.25rem;
}

.suggested-fix {
    padding: 0.75rem 1rem;
    background: #ecfdf5;
    border-left: 4px solid #10b981;
    border-radius: 4px;
    margin-bottom: 1rem;
}

.suggested-fix-label { font-weight: 600; color: #059669; margin-bottom: 0.25rem; }
.suggested-fix-text { color: #065f46; padding-left: 1.25rem; }

.warnings-list { padding-left: 1.25rem; color: #92400e; }

.footer {
    text-align: center;
    padding: 2rem;
    color: var(--muted-color);
    border-top: 1px solid var(--border-color);
}

@media (max-width: 768px) {
    body { padding: 1rem; }
    .header { padding: 2rem 1rem; }
    .header h1 { font-size: 1.75rem; }
    .status-badge { width: 80px; height: 80px; line-height: 80px; font-size: 1.75rem; }
}

@media print {
    body { padding: 0; background: white; }
    .container { box-shadow: none; }
    .module-card { page-break-inside: avoid; }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::{clean_report, test_report};

    #[test]
    fn test_html_is_standalone_document() {
        let html = render(&test_report()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>"));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn test_html_lists_modules_and_violations() {
        let html = render(&test_report()).unwrap();
        assert!(html.contains("<code>core</code>"));
        assert!(html.contains("severity-critical"));
        assert!(html.contains("<span class=\"rule-badge\">R1</span>"));
        assert!(html.contains("@app/auth"));
        assert!(html.contains("Remediation"));
    }

    #[test]
    fn test_html_escapes_messages() {
        assert_eq!(html_escape("<a & 'b'>"), "&lt;a &amp; &#39;b&#39;&gt;");
        let html = render(&test_report()).unwrap();
        assert!(html.contains("&#39;core&#39;"));
    }

    #[test]
    fn test_html_clean_report() {
        let html = render(&clean_report()).unwrap();
        assert!(html.contains("No Violations Found"));
        assert!(html.contains("status-excellent"));
    }

    #[test]
    fn test_html_dependency_graph_section() {
        let report = test_report();
        let html = render(&report).unwrap();
        assert!(html.contains("Dependency Graph"));
        assert!(html.contains("edge-table"));
        assert!(html.contains(
            "<td><code>core</code></td><td><code>auth</code></td><td><span class=\"rule-badge\">R1</span> <span class=\"rule-badge\">R2</span></td>"
        ));
        assert!(html.contains("packages/core/index.ts:3:20"));

        let html = render(&report.without_graph()).unwrap();
        assert!(!html.contains("Dependency Graph"));
        assert!(!html.contains("edge-table"));
    }
}
