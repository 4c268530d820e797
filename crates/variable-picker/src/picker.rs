//! Interactive picker state machine
//!
//! The picker moves between three views:
//!
//! - `Closed`: nothing shown, no listeners registered
//! - `NodeList`: upstream nodes of the node being configured, filtered by
//!   the search term
//! - `FieldDrill`: fields of one node's output at a drill path
//!
//! Selecting a nested field drills deeper; selecting a leaf splices the
//! finished `{{ … }}` token into the target text and closes. Every
//! transition resets the selection to the first item. Requests that do
//! not fit the current view (an index past the end, a selection while
//! closed) are ignored.
//!
//! # Example
//!
//! ```ignore
//! let session = EditorSession::new(graph).with_current_node("send-mail");
//! let mut picker = Picker::new(session, PickerConfig::default());
//!
//! picker.open("Hello @", 7);
//! picker.handle_key(Key::Enter, Instant::now()); // drill into the first node
//! if let Some(insertion) = picker.handle_key(Key::Enter, Instant::now()) {
//!     editor.set_text(insertion.text, insertion.cursor);
//! }
//! ```

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::PickerConfig;
use crate::events::{CloseReason, EventSink, NullEventSink, PickerEvent};
use crate::expression::{self, Insertion};
use crate::fields::{self, FieldEntry};
use crate::listeners::{ListenerGuard, ListenerHost, NullListenerHost, PendingClose};
use crate::memo::{Memo, MemoStats};
use crate::path::{DrillPath, PathSegment};
use crate::session::{EditorSession, SessionVersion};
use crate::types::NodeId;

/// Which view the picker is showing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum PickerState {
    #[default]
    Closed,
    NodeList,
    #[serde(rename_all = "camelCase")]
    FieldDrill { node_id: NodeId, path: DrillPath },
}

/// One selectable row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PickerItem {
    /// An upstream node
    #[serde(rename_all = "camelCase")]
    Node {
        id: NodeId,
        label: String,
        node_type: String,
        has_sample: bool,
    },
    /// A field inside the drilled node's output
    Field(FieldEntry),
}

impl PickerItem {
    /// Text matched by the search filter and shown as the row title
    pub fn label(&self) -> String {
        match self {
            Self::Node { label, .. } => label.clone(),
            Self::Field(field) => field.label(),
        }
    }

    /// Sample value shown next to a field row, cut to the configured width
    pub fn preview(&self, config: &PickerConfig) -> Option<String> {
        match self {
            Self::Field(field) if field.sample.is_some() => {
                Some(field.preview(config.preview_max_chars))
            }
            _ => None,
        }
    }
}

/// Keyboard input routed to the picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Tab,
    Escape,
    Backspace,
    Char(char),
}

/// Text field the picker inserts into
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct TextTarget {
    text: String,
    cursor: usize,
}

type ItemsKey = (SessionVersion, Option<NodeId>, PickerState, String);

/// The picker: view state, search, selection, and insertion target
pub struct Picker {
    session: EditorSession,
    config: PickerConfig,
    state: PickerState,
    search: String,
    selected: usize,
    target: TextTarget,
    items: Memo<ItemsKey, Vec<PickerItem>>,
    listener_host: Arc<dyn ListenerHost>,
    listeners: Option<ListenerGuard>,
    pending_close: PendingClose,
    event_sink: Arc<dyn EventSink>,
}

impl Picker {
    /// Create a closed picker over an editor session
    pub fn new(session: EditorSession, config: PickerConfig) -> Self {
        Self {
            session,
            config,
            state: PickerState::Closed,
            search: String::new(),
            selected: 0,
            target: TextTarget::default(),
            items: Memo::new(),
            listener_host: Arc::new(NullListenerHost),
            listeners: None,
            pending_close: PendingClose::default(),
            event_sink: Arc::new(NullEventSink),
        }
    }

    /// Route events to `sink`
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Register keyboard/pointer/focus listeners with `host` while open
    pub fn with_listener_host(mut self, host: Arc<dyn ListenerHost>) -> Self {
        self.listener_host = host;
        self
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    /// Mutable access for the editor to push fresh snapshots
    pub fn session_mut(&mut self) -> &mut EditorSession {
        &mut self.session
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn state(&self) -> &PickerState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != PickerState::Closed
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Current target text (updated after each insertion)
    pub fn text(&self) -> &str {
        &self.target.text
    }

    /// Current target cursor, in characters
    pub fn cursor(&self) -> usize {
        self.target.cursor
    }

    /// Statistics for the item cache
    pub fn cache_stats(&self) -> MemoStats {
        self.items.stats()
    }

    // ---------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------

    /// Open the node list for inserting into `text` at `cursor`
    ///
    /// Opening an already open picker resets it to the node list.
    pub fn open(&mut self, text: impl Into<String>, cursor: usize) {
        self.target = TextTarget {
            text: text.into(),
            cursor,
        };
        if self.listeners.is_none() {
            self.listeners = Some(ListenerGuard::acquire(self.listener_host.clone()));
        }
        self.pending_close.cancel();

        let node_id = self.session.current_node().unwrap_or_default().to_string();
        log::debug!("Picker opened for node '{}'", node_id);
        self.emit(PickerEvent::Opened { node_id });
        self.transition(PickerState::NodeList);
    }

    /// Close the picker and release its listeners
    pub fn close(&mut self, reason: CloseReason) {
        if !self.is_open() {
            return;
        }
        self.state = PickerState::Closed;
        self.search.clear();
        self.selected = 0;
        self.listeners = None;
        self.pending_close.cancel();

        log::debug!("Picker closed ({:?})", reason);
        self.emit(PickerEvent::Closed { reason });
    }

    /// Update the target text while the picker is open
    pub fn set_target(&mut self, text: impl Into<String>, cursor: usize) {
        self.target = TextTarget {
            text: text.into(),
            cursor,
        };
    }

    // ---------------------------------------------------------------
    // Items and selection
    // ---------------------------------------------------------------

    /// Rows for the current view, recomputed only when inputs change
    ///
    /// A selection left past the end by a shrinking list is pulled back
    /// onto the last row.
    pub fn items(&mut self) -> &[PickerItem] {
        let Self {
            items,
            session,
            config,
            state,
            search,
            selected,
            ..
        } = self;

        let key: ItemsKey = (
            session.version(),
            session.current_node().map(str::to_string),
            state.clone(),
            search.clone(),
        );
        let rows = items.get_or_compute(key, || compute_items(session, config, state, search));
        if *selected >= rows.len() {
            *selected = rows.len().saturating_sub(1);
        }
        rows
    }

    /// Previews for the current rows, in row order
    pub fn previews(&mut self) -> Vec<Option<String>> {
        let config = self.config.clone();
        self.items().iter().map(|item| item.preview(&config)).collect()
    }

    /// Number of rows in the current view
    pub fn item_count(&mut self) -> usize {
        self.items().len()
    }

    /// Row at the selection, if any
    pub fn selected_item(&mut self) -> Option<PickerItem> {
        let index = self.selected;
        self.items().get(index).cloned()
    }

    /// Replace the search term
    pub fn set_search(&mut self, search: impl Into<String>) {
        if !self.is_open() {
            return;
        }
        self.search = search.into();
        self.selected = 0;
    }

    /// Move the selection by `delta`, clamped to the item range
    pub fn move_selection(&mut self, delta: isize) {
        let count = self.item_count();
        if count == 0 {
            self.selected = 0;
            return;
        }
        let max = count - 1;
        let current = self.selected.min(max);
        self.selected = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta as usize).min(max)
        };
    }

    // ---------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------

    /// Activate the row at `index`
    ///
    /// Nodes and nested fields drill in; a leaf field is inserted and the
    /// picker closes, returning the new text and cursor.
    pub fn select(&mut self, index: usize) -> Option<Insertion> {
        let item = self.items().get(index).cloned()?;

        match (self.state.clone(), item) {
            (PickerState::NodeList, PickerItem::Node { id, .. }) => {
                self.transition(PickerState::FieldDrill {
                    node_id: id,
                    path: DrillPath::root(),
                });
                None
            }
            (PickerState::FieldDrill { node_id, path }, PickerItem::Field(field)) => {
                let child = path.child(field.segment);
                if field.is_nested {
                    self.transition(PickerState::FieldDrill {
                        node_id,
                        path: child,
                    });
                    None
                } else {
                    self.insert(&node_id, &child)
                }
            }
            _ => None,
        }
    }

    /// Activate the selected row
    pub fn select_current(&mut self) -> Option<Insertion> {
        self.items();
        self.select(self.selected)
    }

    /// Drill into the selected row without inserting leaves
    pub fn drill_current(&mut self) {
        let can_drill = match self.selected_item() {
            Some(PickerItem::Node { .. }) => true,
            Some(PickerItem::Field(field)) => field.is_nested,
            None => false,
        };
        if can_drill {
            self.select_current();
        }
    }

    /// Insert a token for the current location itself
    ///
    /// In the node list this is the selected node's whole output; while
    /// drilling it is the value at the current path.
    pub fn insert_current(&mut self) -> Option<Insertion> {
        match self.state.clone() {
            PickerState::NodeList => match self.selected_item()? {
                PickerItem::Node { id, .. } => self.insert(&id, &DrillPath::root()),
                PickerItem::Field(_) => None,
            },
            PickerState::FieldDrill { node_id, path } => self.insert(&node_id, &path),
            PickerState::Closed => None,
        }
    }

    /// Go up one level: pop a path segment, or return to the node list
    ///
    /// Returns whether anything changed.
    pub fn back(&mut self) -> bool {
        match self.state.clone() {
            PickerState::FieldDrill { node_id, mut path } => {
                if path.pop().is_some() {
                    self.transition(PickerState::FieldDrill { node_id, path });
                } else {
                    self.transition(PickerState::NodeList);
                }
                true
            }
            PickerState::NodeList | PickerState::Closed => false,
        }
    }

    /// Escape: clear the drill path, then leave the node, then close
    pub fn escape(&mut self) {
        match self.state.clone() {
            PickerState::FieldDrill { node_id, path } if !path.is_empty() => {
                self.transition(PickerState::FieldDrill {
                    node_id,
                    path: DrillPath::root(),
                });
            }
            PickerState::FieldDrill { .. } => self.transition(PickerState::NodeList),
            PickerState::NodeList => self.close(CloseReason::Escape),
            PickerState::Closed => {}
        }
    }

    /// Route a key press; returns an insertion when one happened
    pub fn handle_key(&mut self, key: Key, now: Instant) -> Option<Insertion> {
        // An expired close wins over a late key press
        if !self.is_open() || self.tick(now) {
            return None;
        }

        match key {
            Key::Up => self.move_selection(-1),
            Key::Down => self.move_selection(1),
            Key::Enter | Key::Tab => return self.select_current(),
            Key::Escape => self.escape(),
            Key::Right => self.drill_current(),
            Key::Left => {
                if self.search.is_empty() {
                    self.back();
                }
            }
            Key::Backspace => {
                if self.search.is_empty() {
                    self.back();
                } else {
                    let mut search = self.search.clone();
                    search.pop();
                    self.set_search(search);
                }
            }
            Key::Char(c) => {
                let mut search = self.search.clone();
                search.push(c);
                self.set_search(search);
            }
        }
        None
    }

    // ---------------------------------------------------------------
    // Pointer and focus
    // ---------------------------------------------------------------

    /// A pointer press, inside or outside the picker's region
    pub fn pointer_down(&mut self, inside: bool, now: Instant) {
        if !self.is_open() {
            return;
        }
        if inside {
            self.pending_close.cancel();
        } else {
            self.pending_close
                .schedule(now + self.config.close_delay(), CloseReason::OutsideClick);
        }
    }

    /// Focus left a picker element; `next_inside` tells where it went
    pub fn focus_out(&mut self, next_inside: bool, now: Instant) {
        if !self.is_open() || next_inside {
            return;
        }
        self.pending_close
            .schedule(now + self.config.close_delay(), CloseReason::Blur);
    }

    /// Focus arrived on a picker element
    pub fn focus_in(&mut self) {
        self.pending_close.cancel();
    }

    /// Apply a pending close whose debounce has expired
    ///
    /// Returns whether the picker closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.pending_close.take_due(now) {
            Some(reason) => {
                self.close(reason);
                true
            }
            None => false,
        }
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    fn transition(&mut self, state: PickerState) {
        log::debug!("Picker view: {:?} -> {:?}", self.state, state);
        self.state = state.clone();
        self.search.clear();
        self.selected = 0;
        self.emit(PickerEvent::ViewChanged { state });
    }

    fn insert(&mut self, node_id: &str, path: &DrillPath) -> Option<Insertion> {
        // Live label: whatever the node is called in the current snapshot
        let Some(label) = self.session.label_of(node_id) else {
            log::debug!("Picker: node '{}' vanished before insertion", node_id);
            return None;
        };
        let token = expression::format_token(label, path);
        let insertion = expression::insert(&self.target.text, self.target.cursor, &token);

        self.target = TextTarget {
            text: insertion.text.clone(),
            cursor: insertion.cursor,
        };
        self.emit(PickerEvent::ExpressionInserted {
            source_node_id: node_id.to_string(),
            expression: token,
            text: insertion.text.clone(),
            cursor: insertion.cursor,
        });
        self.close(CloseReason::Inserted);
        Some(insertion)
    }

    fn emit(&self, event: PickerEvent) {
        if let Err(e) = self.event_sink.send(event) {
            log::warn!("Picker event dropped: {}", e);
        }
    }
}

fn compute_items(
    session: &EditorSession,
    config: &PickerConfig,
    state: &PickerState,
    search: &str,
) -> Vec<PickerItem> {
    log::trace!("Recomputing picker items for {:?} (search '{}')", state, search);
    match state {
        PickerState::Closed => Vec::new(),
        PickerState::NodeList => {
            let limit = config.max_node_results.unwrap_or(usize::MAX);
            session
                .ancestors()
                .into_iter()
                .filter(|node| {
                    config.matches(&node.label, search) || config.matches(&node.node_type, search)
                })
                .take(limit)
                .map(|node| PickerItem::Node {
                    id: node.id.clone(),
                    label: node.label.clone(),
                    node_type: node.node_type.clone(),
                    has_sample: fields::has_sample(node, session.samples()),
                })
                .collect()
        }
        PickerState::FieldDrill { node_id, path } => session
            .fields_at(node_id, path)
            .into_iter()
            .filter(|field| config.matches(&field.label(), search))
            .map(PickerItem::Field)
            .collect(),
    }
}

/// Segment a field row would add when drilled into
pub fn item_segment(item: &PickerItem) -> Option<&PathSegment> {
    match item {
        PickerItem::Field(field) => Some(&field.segment),
        PickerItem::Node { .. } => None,
    }
}
