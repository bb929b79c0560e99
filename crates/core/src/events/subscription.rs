// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handler registrations and per-key handler lists
//!
//! Dispatch walks a snapshot of the list. Removing a registration marks it
//! inactive before taking it out of the list, so a pass that already holds
//! the snapshot skips it without shifting any other handler.

use super::event::{Handler, HandlerResult, SharedEvent, View};
use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Callback that receives the whole shared event (used by async bridges)
pub(crate) type Forwarder = Arc<dyn Fn(&SharedEvent) -> HandlerResult + Send + Sync>;

enum Callback {
    Typed(Box<dyn Any + Send + Sync>),
    Forward(Forwarder),
}

/// One subscription of a handler to a key
pub(crate) struct Subscription {
    callback: Callback,
    active: AtomicBool,
}

impl Subscription {
    pub(crate) fn typed<T: ?Sized + 'static>(handler: Handler<T>) -> Arc<Self> {
        Arc::new(Self {
            callback: Callback::Typed(Box::new(handler)),
            active: AtomicBool::new(true),
        })
    }

    pub(crate) fn forward(forwarder: Forwarder) -> Arc<Self> {
        Arc::new(Self {
            callback: Callback::Forward(forwarder),
            active: AtomicBool::new(true),
        })
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Whether this subscription wraps exactly `handler`
    pub(crate) fn is_handler<T: ?Sized + 'static>(&self, handler: &Handler<T>) -> bool {
        match &self.callback {
            Callback::Typed(erased) => erased
                .downcast_ref::<Handler<T>>()
                .is_some_and(|own| Arc::ptr_eq(own, handler)),
            Callback::Forward(_) => false,
        }
    }

    pub(crate) fn invoke(&self, view: &View<'_>, event: &SharedEvent) -> HandlerResult {
        match &self.callback {
            Callback::Typed(erased) => view.deliver(erased.as_ref()),
            Callback::Forward(forward) => forward(event),
        }
    }
}

/// Ordered registrations for one key
#[derive(Default)]
pub(crate) struct HandlerList {
    entries: Vec<Arc<Subscription>>,
}

impl HandlerList {
    pub(crate) fn push(&mut self, subscription: Arc<Subscription>) {
        self.entries.push(subscription);
    }

    /// Remove the most recently added registration matching `pred`
    ///
    /// Scans from the end, since the common case is undoing the last
    /// subscription.
    pub(crate) fn remove_last(
        &mut self,
        pred: impl Fn(&Subscription) -> bool,
    ) -> Option<Arc<Subscription>> {
        let index = self.entries.iter().rposition(|entry| pred(entry))?;
        let removed = self.entries.remove(index);
        removed.deactivate();
        Some(removed)
    }

    /// Remove every registration, deactivating them
    pub(crate) fn clear(&mut self) {
        for entry in self.entries.drain(..) {
            entry.deactivate();
        }
    }

    pub(crate) fn snapshot(&self) -> Vec<Arc<Subscription>> {
        self.entries.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
