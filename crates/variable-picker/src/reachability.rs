//! Upstream reachability over the workflow graph
//!
//! A node can reference the output of any node with a directed path into
//! it. The traversal walks edges backward breadth-first and keeps a visited
//! set, so cycles and duplicate edges are harmless.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::types::{GraphEdge, GraphNode};

/// Compute the ancestors of `target_id`
///
/// Node ids are returned in the order they are first discovered (BFS
/// order). The target itself is never included, even when a cycle leads
/// back to it. Edge endpoints with no matching node are dropped silently.
pub fn ancestors_of<'a>(
    nodes: &'a [GraphNode],
    edges: &[GraphEdge],
    target_id: &str,
) -> Vec<&'a GraphNode> {
    let ids = ancestor_ids(edges, target_id);
    if ids.is_empty() {
        return Vec::new();
    }

    let by_id: HashMap<&str, &GraphNode> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    let resolved: Vec<&GraphNode> = ids.iter().filter_map(|id| by_id.get(id).copied()).collect();

    if resolved.len() < ids.len() {
        log::debug!(
            "ancestors_of({}): dropped {} edge endpoint(s) with no matching node",
            target_id,
            ids.len() - resolved.len()
        );
    }

    resolved
}

/// Ancestor ids of `target_id` in BFS discovery order
pub fn ancestor_ids<'e>(edges: &'e [GraphEdge], target_id: &str) -> Vec<&'e str> {
    let mut incoming: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        incoming
            .entry(edge.target.as_str())
            .or_default()
            .push(edge.source.as_str());
    }

    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(target_id);

    let mut order = Vec::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    queue.push_back(target_id);

    while let Some(current) = queue.pop_front() {
        let Some(sources) = incoming.get(current) else {
            continue;
        };
        for &source in sources {
            if visited.insert(source) {
                order.push(source);
                queue.push_back(source);
            }
        }
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::WorkflowBuilder;

    fn ids(nodes: &[&GraphNode]) -> Vec<String> {
        nodes.iter().map(|n| n.id.clone()).collect()
    }

    #[test]
    fn test_linear_chain() {
        let graph = WorkflowBuilder::new()
            .add_node("a", "trigger", "A")
            .add_node("b", "action", "B")
            .add_node("c", "action", "C")
            .add_edge("a", "b")
            .add_edge("b", "c")
            .build();

        assert_eq!(ids(&graph.ancestors_of("c")), vec!["b", "a"]);
        assert_eq!(ids(&graph.ancestors_of("b")), vec!["a"]);
        assert!(graph.ancestors_of("a").is_empty());
    }

    #[test]
    fn test_bfs_discovery_order() {
        // a -> c, b -> c, d -> a, c -> e
        let graph = WorkflowBuilder::new()
            .add_node("a", "action", "A")
            .add_node("b", "action", "B")
            .add_node("c", "action", "C")
            .add_node("d", "trigger", "D")
            .add_node("e", "action", "E")
            .add_edge("a", "c")
            .add_edge("b", "c")
            .add_edge("d", "a")
            .add_edge("c", "e")
            .build();

        assert_eq!(ids(&graph.ancestors_of("e")), vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_excludes_unreachable_and_downstream() {
        let graph = WorkflowBuilder::new()
            .add_node("a", "trigger", "A")
            .add_node("b", "action", "B")
            .add_node("c", "action", "C")
            .add_node("island", "action", "Island")
            .add_edge("a", "b")
            .add_edge("b", "c")
            .build();

        assert_eq!(ids(&graph.ancestors_of("b")), vec!["a"]);
    }

    #[test]
    fn test_cycle_terminates_without_target() {
        let graph = WorkflowBuilder::new()
            .add_node("a", "action", "A")
            .add_node("b", "action", "B")
            .add_node("c", "action", "C")
            .add_edge("a", "b")
            .add_edge("b", "c")
            .add_edge("c", "a")
            .build();

        let ancestors = ids(&graph.ancestors_of("c"));
        assert_eq!(ancestors, vec!["b", "a"]);
        assert!(!ancestors.contains(&"c".to_string()));
    }

    #[test]
    fn test_self_loop_excluded() {
        let graph = WorkflowBuilder::new()
            .add_node("a", "action", "A")
            .add_edge("a", "a")
            .build();

        assert!(graph.ancestors_of("a").is_empty());
    }

    #[test]
    fn test_duplicate_edges_deduplicated() {
        let graph = WorkflowBuilder::new()
            .add_node("a", "trigger", "A")
            .add_node("b", "action", "B")
            .add_edge("a", "b")
            .add_edge("a", "b")
            .add_edge("a", "b")
            .build();

        assert_eq!(ids(&graph.ancestors_of("b")), vec!["a"]);
    }

    #[test]
    fn test_dangling_edges_dropped() {
        let graph = WorkflowBuilder::new()
            .add_node("a", "trigger", "A")
            .add_node("c", "action", "C")
            .add_edge("ghost", "c")
            .add_edge("a", "ghost")
            .build();

        // "ghost" is traversed but has no node record
        assert_eq!(ancestor_ids(&graph.edges, "c"), vec!["ghost", "a"]);
        assert_eq!(ids(&graph.ancestors_of("c")), vec!["a"]);
    }

    #[test]
    fn test_unknown_target() {
        let graph = WorkflowBuilder::new()
            .add_node("a", "trigger", "A")
            .build();

        assert!(graph.ancestors_of("missing").is_empty());
    }
}
