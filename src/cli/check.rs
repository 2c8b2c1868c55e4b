//! Check command - scan, validate, score and report

use super::CheckArgs;
use anyhow::{Context, Result};
use archgate::config::load_project_config;
use archgate::models::Severity;
use archgate::reporters::{report_with_format, ComplianceReport, OutputFormat};
use archgate::rules::RuleCatalog;
use archgate::scanner::{FileSystemSource, ModuleGraph, Scanner};
use archgate::scoring::calculate_compliance_score;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::process::ExitCode;
use std::str::FromStr;
use tracing::info;

/// Run the check command
pub fn run(path: &Path, args: &CheckArgs) -> Result<ExitCode> {
    let repo_path = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;
    if !repo_path.is_dir() {
        anyhow::bail!("Path is not a directory: {}", repo_path.display());
    }

    let config = load_project_config(&repo_path)?;

    // CLI flags win over [defaults] in the config file
    let format_name = args
        .format
        .as_deref()
        .or(config.defaults.format.as_deref())
        .unwrap_or("text");
    let format = OutputFormat::from_str(format_name)?;
    let fail_on = parse_fail_on(
        args.fail_on
            .as_deref()
            .or(config.defaults.fail_on.as_deref())
            .unwrap_or("critical"),
    )?;

    let registry = config.registry(&repo_path);
    let source = FileSystemSource::new(&repo_path, &config)?;
    let catalog = RuleCatalog::standard();

    let bar = ProgressBar::new(0);
    bar.set_style(create_bar_style()?);
    bar.set_message("Scanning modules...");

    let graph = Scanner::new(&registry, &source, &catalog)
        .with_progress(bar)
        .run()
        .with_context(|| format!("Scan of {} failed", repo_path.display()))?;

    let score = calculate_compliance_score(&graph, &catalog);
    info!(
        "{} modules scanned, score {:.2}",
        graph.len(),
        score.overall
    );

    let mut report = ComplianceReport::new(&graph, &score);
    if args.no_graph {
        report = report.without_graph();
    }
    let rendered = report_with_format(&report, format)?;

    match &args.output {
        Some(output) => {
            std::fs::write(output, &rendered)
                .with_context(|| format!("Failed to write report to {}", output.display()))?;
            eprintln!(
                "{} Report written to {}",
                style("✓").green(),
                style(output.display()).cyan()
            );
        }
        None => print!("{}", rendered),
    }

    if check_fail_threshold(fail_on, &graph) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// `none` disables the gate
fn parse_fail_on(value: &str) -> Result<Option<Severity>> {
    if value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    Severity::from_str(value)
        .map(Some)
        .with_context(|| format!("Invalid fail_on threshold '{}'", value))
}

/// `true` when the gate fails
fn check_fail_threshold(fail_on: Option<Severity>, graph: &ModuleGraph) -> bool {
    let Some(threshold) = fail_on else {
        return false;
    };
    let failing = graph
        .violations()
        .filter(|v| v.severity >= threshold)
        .count();
    if failing > 0 {
        eprintln!(
            "Failing due to --fail-on={}: {} violation(s) at or above {}",
            threshold, failing, threshold
        );
    }
    failing > 0
}

/// Create bar progress style
fn create_bar_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
        .progress_chars("█▓▒░  "))
}
