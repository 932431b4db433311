//! Change listeners for positions
//!
//! Listeners are registered against a position and receive every non-empty
//! [`Changes`] batch once propagation has finished. They only see the batch,
//! never the position itself.

use crate::core::Changes;
use std::collections::HashMap;
use std::fmt;

/// Callback invoked with each notification batch
pub type ChangeListener = Box<dyn FnMut(&Changes) + Send>;

/// Subscription handle returned by [`ListenerRegistry::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionHandle(u32);

impl SubscriptionHandle {
    fn new(id: u32) -> Self {
        SubscriptionHandle(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Registered listeners, dispatched in subscription order
#[derive(Default)]
pub struct ListenerRegistry {
    counter: u32,
    listeners: HashMap<SubscriptionHandle, ChangeListener>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: ChangeListener) -> SubscriptionHandle {
        self.counter += 1;
        let handle = SubscriptionHandle::new(self.counter);
        self.listeners.insert(handle, listener);
        handle
    }

    /// Removes a listener; returns false for an unknown handle
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        self.listeners.remove(&handle).is_some()
    }

    /// Delivers a batch to every listener; empty batches are dropped
    pub fn notify(&mut self, changes: &Changes) {
        if changes.is_empty() {
            return;
        }
        let mut handles: Vec<SubscriptionHandle> = self.listeners.keys().copied().collect();
        handles.sort();
        for handle in handles {
            if let Some(listener) = self.listeners.get_mut(&handle) {
                listener(changes);
            }
        }
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
