// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time-driven republishing of scheduled events

use super::heap::{ScheduleHeap, ScheduledItem};
use super::scheduled::ScheduledEvent;
use crate::clock::Clock;
use crate::events::Publisher;
use chrono::{DateTime, Utc};
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};

/// Holds scheduled events in a min-heap and republishes them when due
///
/// Nothing fires on its own: `tick` must be called periodically, usually by
/// a [`Ticker`](super::Ticker).
pub struct ScheduledEventHub<C: Clock> {
    clock: C,
    target: Arc<dyn Publisher>,
    heap: Mutex<ScheduleHeap>,
}

impl<C: Clock> ScheduledEventHub<C> {
    pub fn new(clock: C, target: Arc<dyn Publisher>) -> Self {
        Self {
            clock,
            target,
            heap: Mutex::new(ScheduleHeap::new()),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Queue `scheduled` at its first occurrence after now
    ///
    /// Returns false, scheduling nothing, when the strategy has no future
    /// occurrence. An identity already queued is moved to its new
    /// occurrence rather than queued twice.
    pub fn schedule(&self, scheduled: Arc<ScheduledEvent>) -> bool {
        let now = self.clock.now();
        let next = scheduled.next_after(now).filter(|next| *next > now);

        let mut heap = self.lock();
        let replaced = heap.remove(&scheduled).is_some();
        let Some(next) = next else {
            tracing::debug!(
                event = scheduled.label(),
                replaced,
                "no future occurrence, discarded"
            );
            return false;
        };
        tracing::debug!(event = scheduled.label(), next = %next, replaced, "scheduled");
        heap.push(ScheduledItem::new(scheduled, next));
        true
    }

    /// Remove `scheduled`; returns false if it was not queued
    pub fn unschedule(&self, scheduled: &Arc<ScheduledEvent>) -> bool {
        let removed = self.lock().remove(scheduled).is_some();
        if removed {
            tracing::debug!(event = scheduled.label(), "unscheduled");
        }
        removed
    }

    /// Fire every item due at the current time, returning how many fired
    ///
    /// Each due item fires once, however many occurrences it missed, and
    /// moves to its first occurrence after now. Items with no further
    /// occurrence leave the heap. Publishing happens after the heap lock is
    /// released; a failed or panicking delivery is logged and does not stop
    /// the others.
    pub fn tick(&self) -> usize {
        let now = self.clock.now();
        let due = self.take_due(now);
        let fired = due.len();

        for scheduled in due {
            let event = scheduled.event().clone();
            match panic::catch_unwind(AssertUnwindSafe(|| self.target.publish(event))) {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    tracing::warn!(
                        event = scheduled.label(),
                        error = %error,
                        "scheduled delivery failed"
                    );
                }
                Err(_) => {
                    tracing::error!(event = scheduled.label(), "scheduled delivery panicked");
                }
            }
        }
        if fired > 0 {
            tracing::trace!(fired, "tick");
        }
        fired
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn is_scheduled(&self, scheduled: &Arc<ScheduledEvent>) -> bool {
        self.lock().contains(scheduled)
    }

    pub fn next_occurrence(&self) -> Option<DateTime<Utc>> {
        self.lock().next_occurrence()
    }

    /// Drop every scheduled item
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn take_due(&self, now: DateTime<Utc>) -> Vec<Arc<ScheduledEvent>> {
        let mut heap = self.lock();
        let mut due = Vec::new();
        while let Some(head) = heap.head_mut() {
            if head.occurrence > now {
                break;
            }
            due.push(Arc::clone(&head.scheduled));
            match head.scheduled.next_after(now).filter(|next| *next > now) {
                Some(next) => {
                    head.occurrence = next;
                    heap.reprioritize_head();
                }
                None => {
                    heap.pop();
                }
            }
        }
        due
    }

    fn lock(&self) -> MutexGuard<'_, ScheduleHeap> {
        self.heap.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "hub_tests.rs"]
mod tests;
