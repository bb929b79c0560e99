// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Composition root tying the hubs together for a host

use crate::clock::Clock;
use crate::config::ConfigSource;
use crate::delayed::DelayedEventHub;
use crate::dispatch::AsyncEventHub;
use crate::error::Result;
use crate::events::EventHub;
use crate::scheduling::{ScheduledEventHub, Ticker};
use std::sync::Arc;

/// The four hubs plus the scheduler's ticker
///
/// Scheduled and delayed events are delivered through the `EventHub`, so
/// they reach synchronous and async subscribers alike.
pub struct EventsModule<C: Clock> {
    events: Arc<EventHub>,
    async_events: Arc<AsyncEventHub>,
    scheduled: Arc<ScheduledEventHub<C>>,
    delayed: Arc<DelayedEventHub>,
    ticker: Ticker,
}

impl<C: Clock> EventsModule<C> {
    /// Build the hubs and start ticking every `execution_check`
    pub fn initialize(clock: C, config: Arc<dyn ConfigSource>) -> Result<Self> {
        let settings = config.events_config()?;

        let events = Arc::new(EventHub::new());
        let async_events = Arc::new(AsyncEventHub::new(events.clone()));
        let scheduled = Arc::new(ScheduledEventHub::new(clock, events.clone()));
        let delayed = Arc::new(DelayedEventHub::new(events.clone(), config));
        let ticker = Ticker::spawn(scheduled.clone(), settings.execution_check)?;

        tracing::info!(
            execution_check = ?settings.execution_check,
            default_event_behavior = %settings.default_event_behavior,
            "events module initialized"
        );
        Ok(Self {
            events,
            async_events,
            scheduled,
            delayed,
            ticker,
        })
    }

    pub fn events(&self) -> &Arc<EventHub> {
        &self.events
    }

    pub fn async_events(&self) -> &Arc<AsyncEventHub> {
        &self.async_events
    }

    pub fn scheduled(&self) -> &Arc<ScheduledEventHub<C>> {
        &self.scheduled
    }

    pub fn delayed(&self) -> &Arc<DelayedEventHub> {
        &self.delayed
    }

    /// Tear down: stop ticking, flush delayed events, drain async queues,
    /// then drop scheduled items and subscriptions
    ///
    /// Safe to call more than once. A failure while flushing is returned
    /// after the rest of the tear-down has run.
    pub fn uninitialize(&self) -> Result<()> {
        self.ticker.stop();
        let flushed = self.delayed.shutdown();
        self.async_events.shutdown();
        self.scheduled.clear();
        self.events.clear();
        tracing::info!("events module uninitialized");
        flushed.map(|_| ())
    }
}

impl<C: Clock> Drop for EventsModule<C> {
    fn drop(&mut self) {
        if let Err(error) = self.uninitialize() {
            tracing::warn!(error = %error, "tear-down flush failed");
        }
    }
}

#[cfg(test)]
#[path = "module_tests.rs"]
mod tests;
