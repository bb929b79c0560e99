// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronous hierarchical event hub

use super::event::{Event, EventKey, Handler, SharedEvent};
use super::subscription::{Forwarder, HandlerList, Subscription};
use crate::error::{EventError, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Anything that accepts a raised event for delivery
pub trait Publisher: Send + Sync {
    fn publish(&self, event: SharedEvent) -> Result<()>;
}

impl<P: Publisher + ?Sized> Publisher for Arc<P> {
    fn publish(&self, event: SharedEvent) -> Result<()> {
        (**self).publish(event)
    }
}

/// The event hub delivers raised events to handlers on the caller's thread
///
/// An event reaches handlers of its exact type, then of each ancestor, then
/// of each capability. Within a key, handlers run in subscription order.
pub struct EventHub {
    handlers: RwLock<HashMap<EventKey, HandlerList>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribe a handler to events viewed as `T`
    pub fn subscribe<T: ?Sized + 'static>(&self, handler: Handler<T>) {
        self.insert(EventKey::of::<T>(), Subscription::typed(handler));
    }

    /// Remove the most recent subscription of `handler` to `T`
    ///
    /// Returns false if the handler was not subscribed.
    pub fn unsubscribe<T: ?Sized + 'static>(&self, handler: &Handler<T>) -> bool {
        self.remove(EventKey::of::<T>(), |s| s.is_handler(handler))
            .is_some()
    }

    /// Raise an event, blocking until every handler returned
    ///
    /// The first handler error aborts the raise; handlers already invoked
    /// keep their effects.
    pub fn raise<E: Event>(&self, event: E) -> Result<()> {
        self.publish(SharedEvent::new(event))
    }

    pub fn subscriber_count<T: ?Sized + 'static>(&self) -> usize {
        let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        handlers
            .get(&EventKey::of::<T>())
            .map_or(0, HandlerList::len)
    }

    pub fn has_subscribers<T: ?Sized + 'static>(&self) -> bool {
        self.subscriber_count::<T>() > 0
    }

    /// Drop every subscription
    pub fn clear(&self) {
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        for list in handlers.values_mut() {
            list.clear();
        }
        handlers.clear();
    }

    pub(crate) fn subscribe_forward(&self, key: EventKey, forwarder: Forwarder) -> Arc<Subscription> {
        let subscription = Subscription::forward(forwarder);
        self.insert(key, subscription.clone());
        subscription
    }

    pub(crate) fn unsubscribe_forward(&self, key: EventKey, subscription: &Arc<Subscription>) {
        self.remove(key, |s| std::ptr::eq(s, Arc::as_ptr(subscription)));
    }

    fn insert(&self, key: EventKey, subscription: Arc<Subscription>) {
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        handlers.entry(key).or_default().push(subscription);
        tracing::debug!(event = key.name(), "subscribed");
    }

    fn remove(
        &self,
        key: EventKey,
        pred: impl Fn(&Subscription) -> bool,
    ) -> Option<Arc<Subscription>> {
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        let list = handlers.get_mut(&key)?;
        let removed = list.remove_last(pred);
        if list.is_empty() {
            handlers.remove(&key);
        }
        if removed.is_some() {
            tracing::debug!(event = key.name(), "unsubscribed");
        }
        removed
    }

    fn snapshot(&self, key: EventKey) -> Vec<Arc<Subscription>> {
        let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        handlers
            .get(&key)
            .map(HandlerList::snapshot)
            .unwrap_or_default()
    }
}

impl Publisher for EventHub {
    fn publish(&self, event: SharedEvent) -> Result<()> {
        tracing::trace!(event = event.type_name(), "raise");
        let lineage = event.lineage();
        for view in lineage.views() {
            // Snapshot per key; no lock is held while handlers run
            for subscription in self.snapshot(view.key()) {
                if !subscription.is_active() {
                    continue;
                }
                subscription
                    .invoke(view, &event)
                    .map_err(|source| EventError::Handler {
                        event: view.key().name(),
                        source,
                    })?;
            }
        }
        Ok(())
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "hub_tests.rs"]
mod tests;
