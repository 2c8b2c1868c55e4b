//! Rules command - print the rule catalog

use anyhow::Result;
use archgate::rules::{Rule, RuleCatalog};
use console::style;

/// Run the rules command
pub fn run(format: &str) -> Result<()> {
    let catalog = RuleCatalog::standard();
    let out = match format {
        "json" => serde_json::to_string_pretty(catalog.rules())?,
        _ => render_text(&catalog),
    };
    println!("{}", out);
    Ok(())
}

fn render_text(catalog: &RuleCatalog) -> String {
    let mut out = format!("\n{}\n", style("Architecture rules").bold());
    out.push_str(&format!(
        "{}\n",
        style("  ID   RULE                              SEVERITY  WEIGHT  KIND").dim()
    ));
    for rule in catalog.rules() {
        out.push_str(&render_rule(rule));
    }
    out.push_str(&format!(
        "\n  {} total weight per module: {}\n",
        style("Σ").dim(),
        catalog.total_weight()
    ));
    out
}

fn render_rule(rule: &Rule) -> String {
    format!(
        "  {:<4} {:<33} {:<9} {:>6}  {}\n       {}\n",
        rule.id,
        rule.name,
        rule.severity,
        rule.weight,
        rule.kind,
        style(rule.description).dim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_text_lists_catalog() {
        let out = console::strip_ansi_codes(&render_text(&RuleCatalog::standard())).into_owned();
        assert!(out.contains("R1   core-isolation"));
        assert!(out.contains("R10  external-dependency-minimization"));
        assert!(out.contains("total weight per module: 56"));
    }
}
