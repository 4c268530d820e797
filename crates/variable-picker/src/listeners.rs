//! Scoped event-listener registration and debounced closing
//!
//! While the picker is open the host must route keyboard, pointer, and
//! focus events to it. Registration is tied to a [`ListenerGuard`]: the
//! picker acquires one on open and drops it on close, so listeners can
//! never outlive the interactive session.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::events::CloseReason;

/// Kinds of host events the picker listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Keyboard navigation
    KeyDown,
    /// Pointer presses, to detect outside clicks
    PointerDown,
    /// Focus leaving the picker
    FocusOut,
}

impl ListenerKind {
    pub const ALL: [ListenerKind; 3] = [Self::KeyDown, Self::PointerDown, Self::FocusOut];
}

/// Handle returned by a host registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Host-side listener registry (DOM, window system, terminal, ...)
pub trait ListenerHost: Send + Sync {
    /// Start delivering events of `kind` to the picker
    fn register(&self, kind: ListenerKind) -> ListenerId;

    /// Stop delivering events for a previous registration
    fn unregister(&self, id: ListenerId);
}

/// Registrations held for the lifetime of one open session
pub struct ListenerGuard {
    host: Arc<dyn ListenerHost>,
    ids: Vec<ListenerId>,
}

impl ListenerGuard {
    /// Register every listener kind with `host`
    pub fn acquire(host: Arc<dyn ListenerHost>) -> Self {
        let ids = ListenerKind::ALL.iter().map(|&kind| host.register(kind)).collect();
        Self { host, ids }
    }

    /// Ids held by this guard
    pub fn ids(&self) -> &[ListenerId] {
        &self.ids
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            self.host.unregister(id);
        }
    }
}

/// A host that ignores registrations
pub struct NullListenerHost;

impl ListenerHost for NullListenerHost {
    fn register(&self, _kind: ListenerKind) -> ListenerId {
        ListenerId(0)
    }

    fn unregister(&self, _id: ListenerId) {}
}

/// A host that tracks active registrations
///
/// Useful for testing that every registration is released.
#[derive(Default)]
pub struct RecordingListenerHost {
    state: Mutex<RecordingState>,
}

#[derive(Default)]
struct RecordingState {
    next_id: u64,
    active: HashSet<ListenerId>,
    total: usize,
}

impl RecordingListenerHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registrations not yet released
    pub fn active_count(&self) -> usize {
        self.state.lock().map(|s| s.active.len()).unwrap_or(0)
    }

    /// Number of registrations ever made
    pub fn total_registered(&self) -> usize {
        self.state.lock().map(|s| s.total).unwrap_or(0)
    }
}

impl ListenerHost for RecordingListenerHost {
    fn register(&self, kind: ListenerKind) -> ListenerId {
        let Ok(mut state) = self.state.lock() else {
            return ListenerId(u64::MAX);
        };
        state.next_id += 1;
        let id = ListenerId(state.next_id);
        state.active.insert(id);
        state.total += 1;
        log::trace!("registered {:?} listener {:?}", kind, id);
        id
    }

    fn unregister(&self, id: ListenerId) {
        if let Ok(mut state) = self.state.lock() {
            state.active.remove(&id);
        }
    }
}

/// A close that waits out the debounce before taking effect
#[derive(Debug, Default)]
pub struct PendingClose {
    pending: Option<(Instant, CloseReason)>,
}

impl PendingClose {
    /// Schedule a close at `deadline`; an earlier pending close is kept
    pub fn schedule(&mut self, deadline: Instant, reason: CloseReason) {
        if self.pending.is_none() {
            self.pending = Some((deadline, reason));
        }
    }

    /// Drop any pending close
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether a close is waiting
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the close reason if its deadline has passed
    pub fn take_due(&mut self, now: Instant) -> Option<CloseReason> {
        match self.pending {
            Some((deadline, reason)) if now >= deadline => {
                self.pending = None;
                Some(reason)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_guard_releases_on_drop() {
        let host = Arc::new(RecordingListenerHost::new());
        {
            let guard = ListenerGuard::acquire(host.clone());
            assert_eq!(guard.ids().len(), 3);
            assert_eq!(host.active_count(), 3);
        }
        assert_eq!(host.active_count(), 0);
        assert_eq!(host.total_registered(), 3);
    }

    #[test]
    fn test_pending_close() {
        let start = Instant::now();
        let mut pending = PendingClose::default();
        pending.schedule(start + Duration::from_millis(100), CloseReason::Blur);
        pending.schedule(start + Duration::from_millis(500), CloseReason::OutsideClick);

        assert!(pending.take_due(start).is_none());
        assert_eq!(
            pending.take_due(start + Duration::from_millis(100)),
            Some(CloseReason::Blur)
        );
        assert!(!pending.is_pending());
    }

    #[test]
    fn test_pending_close_cancel() {
        let start = Instant::now();
        let mut pending = PendingClose::default();
        pending.schedule(start, CloseReason::Blur);
        pending.cancel();
        assert!(pending.take_due(start + Duration::from_secs(1)).is_none());
    }
}
