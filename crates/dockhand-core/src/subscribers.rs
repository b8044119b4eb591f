//! Change-notification fan-out for the UI layer.
//!
//! Listeners are called synchronously, in the order they subscribed.

use std::sync::Arc;

/// Identifies a subscription so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// An ordered list of change listeners.
pub struct Subscribers<T> {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
}

impl<T> Subscribers<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Adds a listener after every existing one.
    pub fn subscribe(&mut self, listener: impl Fn(&T) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Delivers `change` to every listener in registration order.
    pub fn notify(&self, change: &T) {
        for (_, listener) in &self.listeners {
            listener(change);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Copies share the listeners, so a copy can be notified without holding
/// whatever guards the original.
impl<T> Clone for Subscribers<T> {
    fn clone(&self) -> Self {
        Self {
            next_id: self.next_id,
            listeners: self.listeners.clone(),
        }
    }
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}
