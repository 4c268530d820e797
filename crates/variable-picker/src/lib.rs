//! Variable Picker - Upstream output references for workflow node configuration
//!
//! This crate resolves which workflow nodes can feed the node being
//! configured and lets a user build `{{ Node Label.field.subfield }}`
//! references into their outputs. It supports:
//!
//! - Backward breadth-first reachability that tolerates cycles and
//!   dangling edges
//! - Field listing from captured sample output, with a static schema
//!   fallback at the top level
//! - Splicing tokens into text at an `@` or `{{` trigger
//! - An interactive picker with keyboard navigation, search, and
//!   debounced outside-click closing
//!
//! # Architecture
//!
//! - `EditorSession`: explicit snapshot of editor state (graph, samples,
//!   schemas, current node) with version counters
//! - `Picker`: state machine over the session, recomputing its rows
//!   through a `Memo` only when inputs change
//! - `EventSink` / `ListenerHost`: host-facing seams for events and
//!   listener registration
//!
//! Evaluation of the produced expressions happens elsewhere.
//!
//! # Example
//!
//! ```ignore
//! use variable_picker::{EditorSession, Key, Picker, PickerConfig, WorkflowGraph};
//!
//! let graph = WorkflowGraph::from_json(&snapshot_json)?;
//! let session = EditorSession::new(graph).with_current_node("send-mail");
//! let mut picker = Picker::new(session, PickerConfig::default());
//!
//! picker.open("Dear @", 6);
//! picker.handle_key(Key::Enter, Instant::now());
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod events;
pub mod expression;
pub mod fields;
pub mod listeners;
pub mod memo;
pub mod path;
pub mod picker;
pub mod reachability;
pub mod schema;
pub mod session;
pub mod types;
pub mod validation;

// Re-export key types
pub use builder::WorkflowBuilder;
pub use config::PickerConfig;
pub use error::{PickerError, Result};
pub use events::{CloseReason, EventSink, NullEventSink, PickerEvent, VecEventSink};
pub use expression::{format_token, insert, ExpressionRef, Insertion, TriggerKind};
pub use fields::{fields_at, FieldEntry, SampleData};
pub use listeners::{ListenerGuard, ListenerHost, ListenerKind};
pub use path::{DrillPath, PathSegment};
pub use picker::{Key, Picker, PickerItem, PickerState};
pub use reachability::ancestors_of;
pub use schema::{OutputField, SchemaRegistry};
pub use session::EditorSession;
pub use types::{GraphEdge, GraphNode, NodeId, WorkflowGraph};
pub use validation::{diagnose, GraphIssue};
