//! Cycle detection over the module graph
//!
//! Depth-first search with a global visited set and a per-traversal
//! recursion stack. When a node already on the stack is reached again, the
//! stack slice from its first occurrence, closed with the node itself, is
//! recorded as a cycle.

use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Find cycles in `adjacency` (module -> dependencies).
///
/// Each cycle lists its nodes in traversal order and repeats the first node
/// at the end: `[a, b, c, a]`. Roots and neighbors are visited in sorted
/// order, so the output is deterministic.
pub fn detect_cycles(adjacency: &BTreeMap<String, BTreeSet<String>>) -> Vec<Vec<String>> {
    let mut state = DfsState::default();

    for node in adjacency.keys() {
        if !state.visited.contains(node.as_str()) {
            dfs(node, adjacency, &mut state);
        }
    }

    state.cycles
}

#[derive(Default)]
struct DfsState<'g> {
    visited: HashSet<&'g str>,
    recursion_stack: HashSet<&'g str>,
    path_stack: Vec<&'g str>,
    cycles: Vec<Vec<String>>,
}

fn dfs<'g>(node: &'g str, adjacency: &'g BTreeMap<String, BTreeSet<String>>, state: &mut DfsState<'g>) {
    state.visited.insert(node);
    state.recursion_stack.insert(node);
    state.path_stack.push(node);

    if let Some(neighbors) = adjacency.get(node) {
        for neighbor in neighbors {
            if !state.visited.contains(neighbor.as_str()) {
                dfs(neighbor, adjacency, state);
            } else if state.recursion_stack.contains(neighbor.as_str()) {
                record_cycle(neighbor, state);
            }
        }
    }

    state.recursion_stack.remove(node);
    state.path_stack.pop();
}

fn record_cycle(neighbor: &str, state: &mut DfsState<'_>) {
    if let Some(pos) = state.path_stack.iter().position(|n| *n == neighbor) {
        let mut cycle: Vec<String> = state.path_stack[pos..].iter().map(|n| n.to_string()).collect();
        cycle.push(neighbor.to_string());
        state.cycles.push(cycle);
    }
}

/// `a → b → c → a`
pub fn format_cycle(cycle: &[String]) -> String {
    cycle.join(" → ")
}
