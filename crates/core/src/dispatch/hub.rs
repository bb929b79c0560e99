// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Asynchronous façade over the event hub

use super::queue::DispatchQueue;
use crate::error::Result;
use crate::events::{
    Event, EventHub, EventKey, Handler, HandlerResult, Publisher, SharedEvent, Subscription,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

struct QueueSlot {
    queue: Arc<DispatchQueue>,
    /// Forwarder registered on the event hub for this key
    bridge: Arc<Subscription>,
}

/// Delivers events to async subscribers through one queue per type
///
/// The first async subscription for a type creates its queue and registers
/// a bridge on the underlying `EventHub`, so a synchronous raise also feeds
/// async subscribers. When the last async subscriber leaves, the bridge is
/// removed and the queue drains and stops.
pub struct AsyncEventHub {
    hub: Arc<EventHub>,
    queues: Mutex<HashMap<EventKey, QueueSlot>>,
}

impl AsyncEventHub {
    pub fn new(hub: Arc<EventHub>) -> Self {
        Self {
            hub,
            queues: Mutex::new(HashMap::new()),
        }
    }

    pub fn hub(&self) -> &Arc<EventHub> {
        &self.hub
    }

    /// Subscribe a handler to be run on `T`'s worker thread
    pub fn subscribe<T: ?Sized + 'static>(&self, handler: Handler<T>) -> Result<()> {
        let key = EventKey::of::<T>();
        let mut queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(slot) = queues.get(&key) {
            slot.queue.add(Subscription::typed(handler));
            return Ok(());
        }

        let queue = Arc::new(DispatchQueue::spawn(key)?);
        queue.add(Subscription::typed(handler));

        let target = Arc::clone(&queue);
        let bridge = self.hub.subscribe_forward(
            key,
            Arc::new(move |event: &SharedEvent| -> HandlerResult {
                if target.enqueue(event.clone()).is_err() {
                    tracing::trace!(event = key.name(), "queue retired, forward dropped");
                }
                Ok(())
            }),
        );
        queues.insert(key, QueueSlot { queue, bridge });
        tracing::debug!(event = key.name(), "async queue created");
        Ok(())
    }

    /// Remove the most recent async subscription of `handler`
    ///
    /// Returns false if the handler was not subscribed. Removing the last
    /// handler for a type tears its queue down after it drains.
    pub fn unsubscribe<T: ?Sized + 'static>(&self, handler: &Handler<T>) -> bool {
        let key = EventKey::of::<T>();
        let retired = {
            let mut queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
            let Some(slot) = queues.get(&key) else {
                return false;
            };
            let Some(remaining) = slot.queue.remove(|s| s.is_handler(handler)) else {
                return false;
            };
            if remaining > 0 {
                return true;
            }
            queues.remove(&key)
        };

        // Outside the lock; the caller may be this queue's own worker
        if let Some(slot) = retired {
            self.retire(key, slot);
        }
        true
    }

    /// Queue an event for every async subscriber of its lineage
    ///
    /// Returns once the event is queued; synchronous subscribers on the
    /// underlying hub are not invoked.
    pub fn raise<E: Event>(&self, event: E) -> Result<()> {
        self.publish(SharedEvent::new(event))
    }

    pub fn queue_count(&self) -> usize {
        self.queues.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn has_queue<T: ?Sized + 'static>(&self) -> bool {
        self.queues
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(&EventKey::of::<T>())
    }

    pub fn handler_count<T: ?Sized + 'static>(&self) -> usize {
        self.queues
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&EventKey::of::<T>())
            .map_or(0, |slot| slot.queue.handler_count())
    }

    /// Drain and stop every queue
    pub fn shutdown(&self) {
        let slots: Vec<(EventKey, QueueSlot)> = self
            .queues
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain()
            .collect();
        for (key, slot) in slots {
            self.retire(key, slot);
        }
    }

    fn retire(&self, key: EventKey, slot: QueueSlot) {
        self.hub.unsubscribe_forward(key, &slot.bridge);
        slot.queue.shutdown();
        tracing::debug!(event = key.name(), "async queue retired");
    }
}

impl Publisher for AsyncEventHub {
    fn publish(&self, event: SharedEvent) -> Result<()> {
        let keys = event.lineage().keys();
        let targets: Vec<Arc<DispatchQueue>> = {
            let queues = self.queues.lock().unwrap_or_else(|e| e.into_inner());
            keys.iter()
                .filter_map(|key| queues.get(key).map(|slot| Arc::clone(&slot.queue)))
                .collect()
        };
        // A queue retired after the lookup simply misses the event
        for queue in targets {
            if queue.enqueue(event.clone()).is_err() {
                tracing::trace!(event = event.type_name(), "queue retired, raise dropped");
            }
        }
        Ok(())
    }
}

impl Drop for AsyncEventHub {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[path = "hub_tests.rs"]
mod tests;
