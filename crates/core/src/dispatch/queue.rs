// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-key dispatch queue with a dedicated worker thread

use crate::error::{EventError, Result};
use crate::events::{EventKey, Handler, HandlerList, SharedEvent, Subscription, View};
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;

enum QueueMessage {
    Deliver(SharedEvent),
    /// Sentinel queued behind pending events on shutdown
    Stop,
}

type QueueSender = mpsc::UnboundedSender<QueueMessage>;
type QueueReceiver = mpsc::UnboundedReceiver<QueueMessage>;

/// Untyped queue shared by `AsyncDispatchQueue<T>` and `AsyncEventHub`
pub(crate) struct DispatchQueue {
    key: EventKey,
    handlers: Arc<Mutex<HandlerList>>,
    sender: QueueSender,
    worker: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl DispatchQueue {
    pub(crate) fn spawn(key: EventKey) -> Result<Self> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handlers = Arc::new(Mutex::new(HandlerList::default()));

        // Worker logs go to the subscriber active where the queue was made
        let dispatch = tracing::dispatcher::get_default(|d| d.clone());
        let worker = thread::Builder::new()
            .name("event-dispatch".to_string())
            .spawn({
                let handlers = Arc::clone(&handlers);
                move || {
                    tracing::dispatcher::with_default(&dispatch, || {
                        consume(key, handlers, receiver)
                    })
                }
            })?;
        tracing::debug!(event = key.name(), "dispatch queue started");

        Ok(Self {
            key,
            handlers,
            sender,
            worker: Mutex::new(Some(worker)),
            closed: AtomicBool::new(false),
        })
    }

    /// Append an event viewable as the queue's key; never blocks
    pub(crate) fn enqueue(&self, event: SharedEvent) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(EventError::Closed("dispatch queue"));
        }
        if !event.lineage().contains(self.key) {
            return Err(EventError::Undeliverable {
                event: event.type_name(),
                expected: self.key.name(),
            });
        }
        self.sender
            .send(QueueMessage::Deliver(event))
            .map_err(|_| EventError::Closed("dispatch queue"))
    }

    /// Add a subscription, returning the new handler count
    pub(crate) fn add(&self, subscription: Arc<Subscription>) -> usize {
        let mut handlers = self.handlers.lock().unwrap_or_else(|e| e.into_inner());
        handlers.push(subscription);
        handlers.len()
    }

    /// Remove the most recent matching subscription, returning the
    /// remaining handler count if one was removed
    pub(crate) fn remove(&self, pred: impl Fn(&Subscription) -> bool) -> Option<usize> {
        let mut handlers = self.handlers.lock().unwrap_or_else(|e| e.into_inner());
        handlers.remove_last(pred).map(|_| handlers.len())
    }

    pub(crate) fn handler_count(&self) -> usize {
        self.handlers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Stop the worker after it drains everything already queued
    ///
    /// Joins the worker unless called from the worker itself, in which case
    /// the worker exits on its own once it reaches the sentinel.
    pub(crate) fn shutdown(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let _ = self.sender.send(QueueMessage::Stop);

        let worker = self
            .worker
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        let Some(worker) = worker else {
            return;
        };
        if worker.thread().id() == thread::current().id() {
            tracing::debug!(event = self.key.name(), "dispatch queue stopping from its own worker");
            return;
        }
        if worker.join().is_err() {
            tracing::error!(event = self.key.name(), "dispatch worker terminated abnormally");
        }
        tracing::debug!(event = self.key.name(), "dispatch queue stopped");
    }
}

impl Drop for DispatchQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn consume(key: EventKey, handlers: Arc<Mutex<HandlerList>>, mut receiver: QueueReceiver) {
    while let Some(QueueMessage::Deliver(event)) = receiver.blocking_recv() {
        let snapshot = handlers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .snapshot();

        let lineage = event.lineage();
        // Checked on enqueue
        let Some(view) = lineage.view(key) else {
            continue;
        };

        for subscription in snapshot.iter().filter(|s| s.is_active()) {
            deliver_isolated(key, subscription, view, &event);
        }
    }
}

/// Run one handler so that neither an error nor a panic stops the worker
fn deliver_isolated(key: EventKey, subscription: &Subscription, view: &View<'_>, event: &SharedEvent) {
    match panic::catch_unwind(AssertUnwindSafe(|| subscription.invoke(view, event))) {
        Ok(Ok(())) => {}
        Ok(Err(error)) => {
            tracing::warn!(event = key.name(), error = %error, "async handler failed");
        }
        Err(_) => {
            tracing::error!(event = key.name(), "async handler panicked");
        }
    }
}

/// Asynchronous, ordered delivery of one event type
///
/// Events are appended to an unbounded FIFO and delivered by a dedicated
/// worker thread to the handlers subscribed at delivery time, in
/// subscription order.
pub struct AsyncDispatchQueue<T: ?Sized> {
    inner: DispatchQueue,
    _marker: PhantomData<fn(&T)>,
}

impl<T: ?Sized + 'static> AsyncDispatchQueue<T> {
    /// Create the queue and start its worker
    pub fn spawn() -> Result<Self> {
        Ok(Self {
            inner: DispatchQueue::spawn(EventKey::of::<T>())?,
            _marker: PhantomData,
        })
    }

    /// Queue an event for delivery
    ///
    /// Fails with [`EventError::Undeliverable`] unless the event is a `T`,
    /// derives from one, or declares `T` as a capability.
    pub fn enqueue(&self, event: SharedEvent) -> Result<()> {
        self.inner.enqueue(event)
    }

    /// Subscribe a handler, returning the handler count
    pub fn subscribe(&self, handler: Handler<T>) -> usize {
        self.inner.add(Subscription::typed(handler))
    }

    pub fn unsubscribe(&self, handler: &Handler<T>) -> bool {
        self.inner.remove(|s| s.is_handler(handler)).is_some()
    }

    pub fn handler_count(&self) -> usize {
        self.inner.handler_count()
    }

    /// Drain pending events, then stop the worker
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
