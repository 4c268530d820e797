//! Diagnostics for graph snapshots
//!
//! Editors hand over whatever the canvas currently holds, so snapshots may
//! contain edges to deleted nodes, self loops, duplicates, or cycles. None
//! of these stop the picker; they are reported so hosts can log or surface
//! them.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::types::WorkflowGraph;

/// A structural problem found in a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphIssue {
    /// An edge references a non-existent node
    DanglingEdge { edge_id: String, node_id: String },
    /// An edge connects a node to itself
    SelfLoop { edge_id: String, node_id: String },
    /// The same source/target pair appears more than once
    DuplicateEdge { source: String, target: String },
    /// Cycle detected in the graph
    CycleDetected,
}

impl std::fmt::Display for GraphIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DanglingEdge { edge_id, node_id } => {
                write!(f, "Edge '{}' references unknown node '{}'", edge_id, node_id)
            }
            Self::SelfLoop { edge_id, node_id } => {
                write!(f, "Edge '{}' loops node '{}' onto itself", edge_id, node_id)
            }
            Self::DuplicateEdge { source, target } => {
                write!(f, "Duplicate edge '{}' -> '{}'", source, target)
            }
            Self::CycleDetected => write!(f, "Cycle detected in graph"),
        }
    }
}

/// Collect every structural issue in `graph` (not just the first)
pub fn diagnose(graph: &WorkflowGraph) -> Vec<GraphIssue> {
    let mut issues = Vec::new();

    check_edge_references(graph, &mut issues);
    check_self_loops_and_duplicates(graph, &mut issues);
    detect_cycles(graph, &mut issues);

    issues
}

/// Check that all edge source/target nodes exist
fn check_edge_references(graph: &WorkflowGraph, issues: &mut Vec<GraphIssue>) {
    let node_ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();

    for edge in &graph.edges {
        for endpoint in [&edge.source, &edge.target] {
            if !node_ids.contains(endpoint.as_str()) {
                issues.push(GraphIssue::DanglingEdge {
                    edge_id: edge.id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
    }
}

fn check_self_loops_and_duplicates(graph: &WorkflowGraph, issues: &mut Vec<GraphIssue>) {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut reported: HashSet<(&str, &str)> = HashSet::new();

    for edge in &graph.edges {
        if edge.source == edge.target {
            issues.push(GraphIssue::SelfLoop {
                edge_id: edge.id.clone(),
                node_id: edge.source.clone(),
            });
        }
        let pair = (edge.source.as_str(), edge.target.as_str());
        if !seen.insert(pair) && reported.insert(pair) {
            issues.push(GraphIssue::DuplicateEdge {
                source: edge.source.clone(),
                target: edge.target.clone(),
            });
        }
    }
}

/// Detect cycles using Kahn's algorithm (topological sort)
///
/// Only edges between known nodes take part; dangling edges are reported
/// separately.
fn detect_cycles(graph: &WorkflowGraph, issues: &mut Vec<GraphIssue>) {
    let mut in_degree: HashMap<&str, usize> = HashMap::new();
    for node in &graph.nodes {
        in_degree.insert(&node.id, 0);
    }
    let edges: Vec<(&str, &str)> = graph
        .edges
        .iter()
        .filter(|e| {
            in_degree.contains_key(e.source.as_str()) && in_degree.contains_key(e.target.as_str())
        })
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect();
    for &(_, target) in &edges {
        if let Some(deg) = in_degree.get_mut(target) {
            *deg += 1;
        }
    }

    let mut queue: VecDeque<&str> = in_degree
        .iter()
        .filter(|(_, &deg)| deg == 0)
        .map(|(&id, _)| id)
        .collect();

    let mut visited = 0;
    while let Some(node_id) = queue.pop_front() {
        visited += 1;
        for &(source, target) in &edges {
            if source == node_id {
                if let Some(deg) = in_degree.get_mut(target) {
                    *deg -= 1;
                    if *deg == 0 {
                        queue.push_back(target);
                    }
                }
            }
        }
    }

    if visited < in_degree.len() {
        issues.push(GraphIssue::CycleDetected);
    }
}
