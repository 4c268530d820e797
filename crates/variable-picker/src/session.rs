//! Editor session: the picker's view of editor state
//!
//! The surrounding editor owns the graph, captured sample outputs, and the
//! node being configured. It hands them to the picker through this
//! explicit context object. Every replacement bumps a version counter so
//! derived data can be recomputed only when something actually changed.

use crate::error::{PickerError, Result};
use crate::expression::{self, ExpressionRef};
use crate::fields::{self, FieldEntry, SampleData};
use crate::path::DrillPath;
use crate::schema::SchemaRegistry;
use crate::types::{GraphNode, NodeId, WorkflowGraph};
use crate::validation;

/// Versions of the session inputs, compared for change detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SessionVersion {
    pub graph: u64,
    pub samples: u64,
    pub schemas: u64,
}

/// Snapshot of editor state consumed by the picker
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    graph: WorkflowGraph,
    samples: SampleData,
    schemas: SchemaRegistry,
    current_node: Option<NodeId>,
    version: SessionVersion,
}

impl EditorSession {
    /// Create a session over a graph snapshot
    pub fn new(graph: WorkflowGraph) -> Self {
        let mut session = Self::default();
        session.set_graph(graph);
        session
    }

    /// Set the node being configured
    pub fn with_current_node(mut self, node_id: impl Into<String>) -> Self {
        self.current_node = Some(node_id.into());
        self
    }

    /// Set captured sample outputs
    pub fn with_samples(mut self, samples: SampleData) -> Self {
        self.set_samples(samples);
        self
    }

    /// Set the static schema registry
    pub fn with_schemas(mut self, schemas: SchemaRegistry) -> Self {
        self.set_schemas(schemas);
        self
    }

    /// Replace the graph snapshot
    ///
    /// Structural problems are logged, never rejected.
    pub fn set_graph(&mut self, graph: WorkflowGraph) {
        for issue in validation::diagnose(&graph) {
            log::warn!("Graph snapshot: {}", issue);
        }
        self.graph = graph;
        self.version.graph += 1;
    }

    /// Replace all captured sample outputs
    pub fn set_samples(&mut self, samples: SampleData) {
        self.samples = samples;
        self.version.samples += 1;
    }

    /// Record the sample output of one node
    pub fn set_sample(&mut self, node_id: impl Into<String>, sample: serde_json::Value) {
        self.samples.insert(node_id.into(), sample);
        self.version.samples += 1;
    }

    /// Replace the static schema registry
    pub fn set_schemas(&mut self, schemas: SchemaRegistry) {
        self.schemas = schemas;
        self.version.schemas += 1;
    }

    /// Change the node being configured
    pub fn set_current_node(&mut self, node_id: Option<NodeId>) {
        self.current_node = node_id;
    }

    pub fn graph(&self) -> &WorkflowGraph {
        &self.graph
    }

    pub fn samples(&self) -> &SampleData {
        &self.samples
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    pub fn current_node(&self) -> Option<&str> {
        self.current_node.as_deref()
    }

    pub fn version(&self) -> SessionVersion {
        self.version
    }

    /// Look up a node, failing if the snapshot no longer contains it
    pub fn node(&self, node_id: &str) -> Result<&GraphNode> {
        self.graph
            .find_node(node_id)
            .ok_or_else(|| PickerError::UnknownNode(node_id.to_string()))
    }

    /// The node's display label as of this snapshot
    pub fn label_of(&self, node_id: &str) -> Option<&str> {
        self.graph.find_node(node_id).map(|n| n.label.as_str())
    }

    /// Upstream nodes of the node being configured
    pub fn ancestors(&self) -> Vec<&GraphNode> {
        match &self.current_node {
            Some(id) => self.graph.ancestors_of(id),
            None => Vec::new(),
        }
    }

    /// Fields of a node's output at `path`; empty for unknown nodes
    pub fn fields_at(&self, node_id: &str, path: &DrillPath) -> Vec<FieldEntry> {
        match self.graph.find_node(node_id) {
            Some(node) => fields::fields_at(node, path, &self.samples, &self.schemas),
            None => Vec::new(),
        }
    }

    /// Expression tokens in `text` that no current upstream node answers to
    ///
    /// Tokens are keyed by label text, so renaming an upstream node leaves
    /// earlier tokens pointing at the old name. This finds them.
    pub fn stale_references(&self, text: &str) -> Vec<ExpressionRef> {
        let labels: Vec<&str> = match &self.current_node {
            Some(_) => self.ancestors().iter().map(|n| n.label.as_str()).collect(),
            None => self.graph.nodes.iter().map(|n| n.label.as_str()).collect(),
        };

        expression::references(text)
            .into_iter()
            .filter(|reference| !labels.iter().any(|label| reference.path_after(label).is_some()))
            .collect()
    }
}
