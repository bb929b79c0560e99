// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Buffered delivery released by explicit flush points

use crate::config::{ConfigSource, DeliveryMode};
use crate::error::{EventError, Result};
use crate::events::{Event, Publisher, SharedEvent};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Routes events either straight to a publisher or into a FIFO buffer
///
/// An event's own [`Event::delivery_mode`] marker wins; unmarked events
/// follow the configured `default_event_behavior`, read at raise time.
/// Buffered events reach the target only when [`flush`](Self::flush) runs.
///
/// The immediate path never waits for a flush, so an immediate raise during
/// a flush is unordered relative to the flushed events.
pub struct DelayedEventHub {
    target: Arc<dyn Publisher>,
    config: Arc<dyn ConfigSource>,
    sender: Mutex<Option<mpsc::UnboundedSender<SharedEvent>>>,
    buffer: Mutex<mpsc::UnboundedReceiver<SharedEvent>>,
    pending: AtomicUsize,
}

impl DelayedEventHub {
    pub fn new(target: Arc<dyn Publisher>, config: Arc<dyn ConfigSource>) -> Self {
        let (sender, buffer) = mpsc::unbounded_channel();
        Self {
            target,
            config,
            sender: Mutex::new(Some(sender)),
            buffer: Mutex::new(buffer),
            pending: AtomicUsize::new(0),
        }
    }

    /// Route by the event's marker, else by the configured default
    pub fn raise<E: Event>(&self, event: E) -> Result<()> {
        self.publish(SharedEvent::new(event))
    }

    /// Deliver now, bypassing the buffer
    pub fn raise_immediate<E: Event>(&self, event: E) -> Result<()> {
        self.target.publish(SharedEvent::new(event))
    }

    /// Buffer until the next flush
    pub fn raise_delayed<E: Event>(&self, event: E) -> Result<()> {
        self.defer(SharedEvent::new(event))
    }

    /// Deliver everything buffered so far, in raise order
    ///
    /// Returns the number of events delivered. If any delivery fails the
    /// rest are still delivered and the first error is returned. Events
    /// buffered by handlers during the flush wait for the next one.
    /// Flushes are serialized; a handler must not flush the hub that is
    /// delivering to it.
    pub fn flush(&self) -> Result<usize> {
        let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        let mut drained = Vec::new();
        while let Ok(event) = buffer.try_recv() {
            drained.push(event);
        }
        if drained.is_empty() {
            return Ok(0);
        }
        self.pending.fetch_sub(drained.len(), Ordering::AcqRel);

        let count = drained.len();
        let mut first_error = None;
        for event in drained {
            if let Err(error) = self.target.publish(event) {
                tracing::warn!(error = %error, "delayed delivery failed");
                first_error.get_or_insert(error);
            }
        }
        tracing::debug!(delivered = count, "flushed delayed events");

        match first_error {
            Some(error) => Err(error),
            None => Ok(count),
        }
    }

    /// Close the buffer to new events, then flush what remains
    pub fn shutdown(&self) -> Result<usize> {
        let sender = self.sender.lock().unwrap_or_else(|e| e.into_inner()).take();
        if sender.is_some() {
            tracing::debug!("delayed hub closed");
        }
        drop(sender);
        self.flush()
    }

    /// Number of buffered events awaiting a flush
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    fn defer(&self, event: SharedEvent) -> Result<()> {
        let sender = self.sender.lock().unwrap_or_else(|e| e.into_inner());
        let sender = sender
            .as_ref()
            .ok_or(EventError::Closed("delayed event hub"))?;
        self.pending.fetch_add(1, Ordering::AcqRel);
        sender
            .send(event)
            .map_err(|_| EventError::Closed("delayed event hub"))?;
        tracing::trace!("event buffered");
        Ok(())
    }
}

impl Publisher for DelayedEventHub {
    fn publish(&self, event: SharedEvent) -> Result<()> {
        let mode = match event.delivery_mode() {
            Some(mode) => mode,
            None => self.config.events_config()?.default_event_behavior,
        };
        match mode {
            DeliveryMode::Immediate => self.target.publish(event),
            DeliveryMode::Delayed => self.defer(event),
        }
    }
}

#[cfg(test)]
#[path = "delayed_tests.rs"]
mod tests;
