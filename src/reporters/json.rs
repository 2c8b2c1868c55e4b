//! JSON reporter
//!
//! Outputs the full ComplianceReport as pretty-printed JSON.
//! Useful for CI dashboards, piping to jq, or further processing.

use super::ComplianceReport;
use anyhow::Result;

/// Render report as JSON
pub fn render(report: &ComplianceReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
