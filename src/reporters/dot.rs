//! Graphviz reporter
//!
//! Emits the module dependency graph as a DOT digraph. Nodes are labelled
//! with their layer; edges that break rules are labelled with the rule ids
//! and drawn red.

use super::ComplianceReport;
use crate::rules::RuleId;
use anyhow::Result;
use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeSet, HashMap};

/// Render report as a DOT digraph
pub fn render(report: &ComplianceReport) -> Result<String> {
    let graph = build_graph(report);
    let dot = Dot::with_attr_getters(
        &graph,
        &[],
        &|_, edge| {
            if edge.weight().is_empty() {
                String::new()
            } else {
                "color = red fontcolor = red".to_string()
            }
        },
        &|_, _| "shape = box".to_string(),
    );
    Ok(format!("{}\n", dot))
}

/// Module graph with `name (Ln)` nodes and rule-list edges
fn build_graph(report: &ComplianceReport) -> DiGraph<String, String> {
    let mut graph = DiGraph::new();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();

    for module in &report.modules {
        let idx = graph.add_node(format!("{} (L{})", module.name, module.layer));
        nodes.insert(module.name.as_str(), idx);
    }

    for module in &report.modules {
        for dep in &module.dependencies {
            let (Some(&from), Some(&to)) = (nodes.get(module.name.as_str()), nodes.get(dep.as_str()))
            else {
                continue;
            };
            let rules: BTreeSet<RuleId> = module
                .violations
                .iter()
                .filter(|v| &v.target_module == dep)
                .filter_map(|v| v.rule)
                .collect();
            let label: Vec<String> = rules.iter().map(|r| r.to_string()).collect();
            graph.add_edge(from, to, label.join(", "));
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModuleRegistry;
    use crate::parsers::{ImportStatement, StatementKind};
    use crate::reporters::tests::{clean_report, test_report};
    use crate::rules::RuleCatalog;
    use crate::scanner::{scan, InMemorySource};
    use crate::scoring::calculate_compliance_score;

    #[test]
    fn test_dot_is_digraph() {
        let dot = render(&test_report()).unwrap();
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("core (L0)"));
        assert!(dot.contains("web (L4)"));
        assert!(dot.contains("->"));
    }

    #[test]
    fn test_dot_labels_violating_edges() {
        let dot = render(&test_report()).unwrap();
        assert!(dot.contains("R1, R2"));
        assert!(dot.contains("color = red"));
    }

    #[test]
    fn test_dot_graph_shape() {
        let graph = build_graph(&test_report());
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);

        let clean = render(&clean_report()).unwrap();
        assert!(!clean.contains("color = red"));
    }

    #[test]
    fn test_dot_repeated_import_labels_each_rule_once() {
        let registry = ModuleRegistry::new("@app")
            .with_module("core", 0, "packages/core")
            .with_module("auth", 1, "packages/auth");
        let stmt = |line| ImportStatement::new("@app/auth", line, 1, StatementKind::Import);
        let source = InMemorySource::new()
            .with_file("core", "packages/core/index.ts", vec![stmt(1), stmt(2)])
            .with_file("auth", "packages/auth/index.ts", vec![]);
        let catalog = RuleCatalog::standard();
        let graph = scan(&registry, &source, &catalog).unwrap();
        let score = calculate_compliance_score(&graph, &catalog);
        let report = ComplianceReport::new(&graph, &score);

        let dot = render(&report).unwrap();
        assert!(dot.contains("label = \"R1, R2\""), "{dot}");
        assert!(!dot.contains("R1, R2, R1"), "{dot}");
    }
}
