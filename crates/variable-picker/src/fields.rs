//! Field listing for a node's output at a drill path
//!
//! Sample output (captured from a prior test execution) is authoritative
//! and supports drilling to any depth. Without it, only the top level can
//! be listed, from the node's static output schema.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::path::{DrillPath, PathSegment};
use crate::schema::SchemaRegistry;
use crate::types::{GraphNode, NodeId};

/// Captured sample outputs keyed by node id
pub type SampleData = HashMap<NodeId, Value>;

/// One navigable field at a drill location
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldEntry {
    /// Segment to push when drilling into (or selecting) this field
    pub segment: PathSegment,
    /// `array[n]`, `object`, a primitive type name, or a declared schema type
    pub type_label: String,
    /// The sample value at this field, if the listing came from sample data
    pub sample: Option<Value>,
    /// Declared description (schema fallback only)
    pub description: Option<String>,
    /// Whether the field can be drilled into
    pub is_nested: bool,
}

impl FieldEntry {
    fn from_value(segment: PathSegment, value: &Value) -> Self {
        Self {
            segment,
            type_label: type_label(value),
            sample: Some(value.clone()),
            description: None,
            is_nested: is_container(value),
        }
    }

    /// Display label (`name` or `[0]`)
    pub fn label(&self) -> String {
        self.segment.label()
    }

    /// Compact one-line rendering of the sample value
    ///
    /// Strings are shown unquoted. Anything longer than `max_chars`
    /// characters is cut and suffixed with an ellipsis.
    pub fn preview(&self, max_chars: usize) -> String {
        let text = match &self.sample {
            None => return String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        if text.chars().count() <= max_chars {
            text
        } else {
            let mut cut: String = text.chars().take(max_chars).collect();
            cut.push('…');
            cut
        }
    }
}

/// Type label for a sample value
///
/// Arrays are checked before objects so that they report their length.
pub fn type_label(value: &Value) -> String {
    match value {
        Value::Array(items) => format!("array[{}]", items.len()),
        Value::Object(_) => "object".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Null => "null".to_string(),
    }
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Array(_) | Value::Object(_))
}

/// Follow `path` into `root`
///
/// Returns `None` as soon as a step lands on null, a primitive, or a
/// missing key/index. Index segments applied to an object look up the
/// literal bracketed key.
pub fn resolve<'v>(root: &'v Value, path: &DrillPath) -> Option<&'v Value> {
    let mut current = root;
    for segment in path.segments() {
        current = match (current, segment) {
            (Value::Array(items), PathSegment::Index(i)) => items.get(*i)?,
            (Value::Object(map), PathSegment::Key(key)) => map.get(key)?,
            (Value::Object(map), index @ PathSegment::Index(_)) => map.get(&index.label())?,
            _ => return None,
        };
    }
    Some(current)
}

/// Sample output for a node: captured data first, then the node's own
fn sample_for<'a>(node: &'a GraphNode, samples: &'a SampleData) -> Option<&'a Value> {
    samples.get(&node.id).or(node.sample_output.as_ref())
}

/// List the fields of `node`'s output at `path`
///
/// Never fails: anything that cannot be navigated yields an empty list.
pub fn fields_at(
    node: &GraphNode,
    path: &DrillPath,
    samples: &SampleData,
    schemas: &SchemaRegistry,
) -> Vec<FieldEntry> {
    if let Some(sample) = sample_for(node, samples) {
        return match resolve(sample, path) {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| FieldEntry::from_value(PathSegment::Index(i), item))
                .collect(),
            Some(Value::Object(map)) => map
                .iter()
                .map(|(key, value)| FieldEntry::from_value(PathSegment::Key(key.clone()), value))
                .collect(),
            _ => Vec::new(),
        };
    }

    if !path.is_empty() {
        return Vec::new();
    }

    schemas
        .schema_for(node)
        .map(|outputs| {
            outputs
                .iter()
                .map(|field| FieldEntry {
                    segment: PathSegment::Key(field.name.clone()),
                    type_label: field.data_type.clone(),
                    sample: None,
                    description: field.description.clone(),
                    is_nested: false,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Whether `node` has sample output available
pub fn has_sample(node: &GraphNode, samples: &SampleData) -> bool {
    sample_for(node, samples).is_some()
}
