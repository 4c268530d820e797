//! Event types emitted by the picker
//!
//! Events are sent to the host editor (or any consumer) to report view
//! changes, inserted expressions, and closing.

use serde::{Deserialize, Serialize};

use crate::picker::PickerState;

/// Trait for receiving picker events
///
/// This abstracts over the host's transport (UI callback, channel, etc.)
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be delivered
    fn send(&self, event: PickerEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

/// Why the picker closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    /// Escape pressed in the node list
    Escape,
    /// A leaf was selected and inserted
    Inserted,
    /// Pointer pressed outside the picker
    OutsideClick,
    /// Focus moved outside the picker
    Blur,
    /// Host closed the picker
    Explicit,
}

/// Events emitted during a picker session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PickerEvent {
    /// The picker opened for a node
    #[serde(rename_all = "camelCase")]
    Opened { node_id: String },

    /// The view (node list or drill location) changed
    #[serde(rename_all = "camelCase")]
    ViewChanged { state: PickerState },

    /// An expression was spliced into the target text
    #[serde(rename_all = "camelCase")]
    ExpressionInserted {
        source_node_id: String,
        expression: String,
        text: String,
        cursor: usize,
    },

    /// The picker closed
    #[serde(rename_all = "camelCase")]
    Closed { reason: CloseReason },
}

/// A no-op event sink that discards all events
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: PickerEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecEventSink {
    events: std::sync::Mutex<Vec<PickerEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<PickerEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: PickerEvent) -> Result<(), EventError> {
        self.events
            .lock()
            .map_err(|_| EventError {
                message: "Event buffer poisoned".to_string(),
            })?
            .push(event);
        Ok(())
    }
}
