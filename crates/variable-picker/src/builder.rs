//! Fluent builder for workflow graph snapshots
//!
//! Provides a compact API for constructing graphs programmatically, mostly
//! for hosts that assemble snapshots from their own editor state and for tests.

use crate::schema::OutputField;
use crate::types::{GraphEdge, GraphNode, WorkflowGraph};

/// Fluent builder for constructing workflow graphs
///
/// # Example
///
/// ```ignore
/// let graph = WorkflowBuilder::new()
///     .add_node("trigger", "webhook", "Webhook")
///     .with_sample(serde_json::json!({"body": {"email": "a@b.c"}}))
///     .add_node("send", "email", "Send Mail")
///     .add_edge("trigger", "send")
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct WorkflowBuilder {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    edge_counter: usize,
}

impl WorkflowBuilder {
    /// Create a new workflow builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the graph
    pub fn add_node(
        mut self,
        id: impl Into<String>,
        node_type: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        self.nodes.push(GraphNode::new(id, node_type, label));
        self
    }

    /// Set sample output on the most recently added node
    ///
    /// Must be called immediately after `add_node`.
    pub fn with_sample(mut self, sample: serde_json::Value) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.sample_output = Some(sample);
        }
        self
    }

    /// Set a static output schema on the most recently added node
    pub fn with_schema(mut self, schema: Vec<OutputField>) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.output_schema = Some(schema);
        }
        self
    }

    /// Add an edge between two nodes (auto-generates edge ID)
    pub fn add_edge(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.edge_counter += 1;
        self.edges.push(GraphEdge::new(
            format!("edge-{}", self.edge_counter),
            source,
            target,
        ));
        self
    }

    /// Build the graph without validation
    pub fn build(self) -> WorkflowGraph {
        WorkflowGraph {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_assigns_edge_ids() {
        let graph = WorkflowBuilder::new()
            .add_node("a", "trigger", "A")
            .add_node("b", "action", "B")
            .add_edge("a", "b")
            .add_edge("a", "b")
            .build();

        assert_eq!(graph.edges[0].id, "edge-1");
        assert_eq!(graph.edges[1].id, "edge-2");
    }

    #[test]
    fn test_with_sample_applies_to_last_node() {
        let graph = WorkflowBuilder::new()
            .add_node("a", "trigger", "A")
            .add_node("b", "action", "B")
            .with_sample(json!({"ok": true}))
            .with_schema(vec![OutputField::new("ok", "boolean")])
            .build();

        assert!(graph.nodes[0].sample_output.is_none());
        assert_eq!(graph.nodes[1].sample_output, Some(json!({"ok": true})));
        assert_eq!(graph.nodes[1].output_schema.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_with_sample_on_empty_builder_is_noop() {
        let graph = WorkflowBuilder::new().with_sample(json!(1)).build();
        assert!(graph.nodes.is_empty());
    }
}
