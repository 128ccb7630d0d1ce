//! Sync status listeners
//!
//! Callbacks for sync status changes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::types::SyncStatus;

/// Listener trait.
///
/// Implement this trait to receive every recorded sync status.
pub trait SyncListener: Send + Sync {
    /// Called with the full new status.
    fn on_status(&self, status: &SyncStatus);
}

/// Simple callback-based listener.
///
/// Wraps a closure for easy status handling.
pub struct CallbackListener<F>
where
    F: Fn(&SyncStatus) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackListener<F>
where
    F: Fn(&SyncStatus) + Send + Sync,
{
    /// Creates a new callback listener.
    pub fn new(callback: F) -> Self {
        CallbackListener { callback }
    }
}

impl<F> SyncListener for CallbackListener<F>
where
    F: Fn(&SyncStatus) + Send + Sync,
{
    fn on_status(&self, status: &SyncStatus) {
        (self.callback)(status);
    }
}

/// Handle returned on registration, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registry of status listeners, notified in registration order.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(ListenerId, Arc<dyn SyncListener>)>>,
}

impl ListenerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a listener.
    pub fn add(&self, listener: Arc<dyn SyncListener>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push((id, listener));
        }
        id
    }

    /// Removes a listener, returning whether it was registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let Ok(mut listeners) = self.listeners.lock() else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Removes all listeners.
    pub fn clear(&self) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.clear();
        }
    }

    /// Returns the number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Delivers a status to a snapshot of the current listeners.
    ///
    /// The lock is released before any callback runs, so a listener may
    /// add or remove listeners (itself included) while being notified.
    pub fn notify(&self, status: &SyncStatus) {
        let snapshot: Vec<Arc<dyn SyncListener>> = match self.listeners.lock() {
            Ok(listeners) => listeners.iter().map(|(_, l)| Arc::clone(l)).collect(),
            Err(_) => return,
        };
        for listener in snapshot {
            listener.on_status(status);
        }
    }
}
