//! Core types for workflow graph snapshots
//!
//! These types describe the graph as the editor hands it to the picker:
//! nodes with optional sample output and static schema, and directed
//! edges between them. The picker never mutates a snapshot.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schema::OutputField;

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for an edge
pub type EdgeId = String;

/// A node instance in a graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Unique identifier for this node instance
    pub id: NodeId,
    /// Node type tag (e.g., "http-request", "trigger")
    #[serde(rename = "type")]
    pub node_type: String,
    /// Display name, also the leading segment of inserted expressions
    pub label: String,
    /// Captured output of a prior test execution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_output: Option<serde_json::Value>,
    /// Static description of the node's outputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Vec<OutputField>>,
}

impl GraphNode {
    /// Create a node with no sample output or schema
    pub fn new(
        id: impl Into<String>,
        node_type: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            label: label.into(),
            sample_output: None,
            output_schema: None,
        }
    }

    /// Attach captured sample output
    pub fn with_sample(mut self, sample: serde_json::Value) -> Self {
        self.sample_output = Some(sample);
        self
    }

    /// Attach a static output schema
    pub fn with_schema(mut self, schema: Vec<OutputField>) -> Self {
        self.output_schema = Some(schema);
        self
    }
}

/// A directed data-flow connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    /// Identifier for this edge (editors do not always provide one)
    #[serde(default)]
    pub id: EdgeId,
    /// Source node ID
    pub source: NodeId,
    /// Target node ID
    pub target: NodeId,
}

impl GraphEdge {
    /// Create an edge between two nodes
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A snapshot of the workflow graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowGraph {
    /// Nodes in the graph
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    /// Edges connecting nodes
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

impl WorkflowGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot from the editor's JSON representation
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Find a node by ID
    pub fn find_node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Upstream nodes of `node_id`, in breadth-first discovery order
    pub fn ancestors_of(&self, node_id: &str) -> Vec<&GraphNode> {
        crate::reachability::ancestors_of(&self.nodes, &self.edges, node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_graph_from_json() {
        let graph = WorkflowGraph::from_json(
            r#"{
                "nodes": [
                    {
                        "id": "n1", "type": "trigger", "label": "Webhook",
                        "sampleOutput": {"body": {}}
                    },
                    {"id": "n2", "type": "http-request", "label": "Fetch User"}
                ],
                "edges": [{"source": "n1", "target": "n2"}]
            }"#,
        )
        .unwrap();

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].node_type, "trigger");
        assert_eq!(graph.nodes[0].sample_output, Some(json!({"body": {}})));
        assert!(graph.nodes[1].sample_output.is_none());
        assert_eq!(graph.edges[0].id, "");
        let upstream: Vec<&str> = graph.ancestors_of("n2").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(upstream, vec!["n1"]);
    }

    #[test]
    fn test_graph_from_invalid_json() {
        assert!(WorkflowGraph::from_json("{\"nodes\": 3}").is_err());
    }

    #[test]
    fn test_node_serializes_type_tag() {
        let node = GraphNode::new("n1", "trigger", "Start");
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "trigger");
        assert!(value.get("sampleOutput").is_none());
    }
}
