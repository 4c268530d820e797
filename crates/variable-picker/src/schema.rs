//! Static output schemas for node types
//!
//! When a node has never been test-executed there is no sample output to
//! drill into. The picker then falls back to a declared list of outputs,
//! taken from the node itself or from a registry keyed by node type.
//!
//! # Usage
//!
//! ```ignore
//! use variable_picker::{OutputField, SchemaRegistry};
//!
//! let mut registry = SchemaRegistry::new();
//! registry.register("http-request", vec![
//!     OutputField::new("status", "number").with_description("HTTP status code"),
//!     OutputField::new("body", "object"),
//! ]);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::GraphNode;

/// One declared output of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputField {
    /// Output name, used as the path segment
    pub name: String,
    /// Declared type label (free-form, shown as-is)
    #[serde(rename = "type")]
    pub data_type: String,
    /// Optional human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OutputField {
    /// Create a declared output
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            description: None,
        }
    }

    /// Set a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Registry of static output schemas, keyed by node type
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: HashMap<String, Vec<OutputField>>,
}

impl SchemaRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the schema for a node type
    pub fn register(&mut self, node_type: impl Into<String>, outputs: Vec<OutputField>) {
        self.entries.insert(node_type.into(), outputs);
    }

    /// Get the schema for a node type
    pub fn get(&self, node_type: &str) -> Option<&[OutputField]> {
        self.entries.get(node_type).map(|v| v.as_slice())
    }

    /// Check if a node type is registered
    pub fn has_node_type(&self, node_type: &str) -> bool {
        self.entries.contains_key(node_type)
    }

    /// List all registered node type strings
    pub fn node_types(&self) -> Vec<&str> {
        self.entries.keys().map(|s| s.as_str()).collect()
    }

    /// Merge another registry into this one
    ///
    /// Entries from `other` override entries in `self` if they share the same node_type.
    pub fn merge(&mut self, other: SchemaRegistry) {
        self.entries.extend(other.entries);
    }

    /// Schema for a specific node: its own declaration wins over the type's
    pub fn schema_for<'a>(&'a self, node: &'a GraphNode) -> Option<&'a [OutputField]> {
        node.output_schema
            .as_deref()
            .or_else(|| self.get(&node.node_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_schema() -> Vec<OutputField> {
        vec![
            OutputField::new("status", "number").with_description("HTTP status code"),
            OutputField::new("body", "object"),
        ]
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = SchemaRegistry::new();
        registry.register("http-request", http_schema());

        assert!(registry.has_node_type("http-request"));
        assert!(!registry.has_node_type("email"));
        assert_eq!(registry.get("http-request").unwrap().len(), 2);
        assert_eq!(registry.node_types(), vec!["http-request"]);
    }

    #[test]
    fn test_node_schema_overrides_registry() {
        let mut registry = SchemaRegistry::new();
        registry.register("http-request", http_schema());

        let plain = GraphNode::new("n1", "http-request", "Fetch");
        assert_eq!(registry.schema_for(&plain).unwrap()[0].name, "status");

        let custom = GraphNode::new("n2", "http-request", "Fetch")
            .with_schema(vec![OutputField::new("raw", "string")]);
        let schema = registry.schema_for(&custom).unwrap();
        assert_eq!(schema.len(), 1);
        assert_eq!(schema[0].name, "raw");

        let unknown = GraphNode::new("n3", "email", "Send");
        assert!(registry.schema_for(&unknown).is_none());
    }

    #[test]
    fn test_merge_overrides() {
        let mut base = SchemaRegistry::new();
        base.register("http-request", http_schema());
        base.register("delay", vec![]);

        let mut plugin = SchemaRegistry::new();
        plugin.register("http-request", vec![OutputField::new("response", "object")]);
        base.merge(plugin);

        assert_eq!(base.get("http-request").unwrap()[0].name, "response");
        assert!(base.has_node_type("delay"));
    }

    #[test]
    fn test_output_field_serialization() {
        let field = OutputField::new("status", "number");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "number");
        assert!(json.get("description").is_none());
    }
}
