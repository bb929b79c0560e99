// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! eventide-core: in-process event dispatch and scheduling
//!
//! This crate provides:
//! - A synchronous hub delivering events along their declared lineage
//! - Per-type async queues, each with its own worker thread
//! - A min-heap scheduler for one-shot, interval and cron occurrences
//! - A delayed hub that buffers events until flushed

pub mod clock;
pub mod config;
pub mod error;

pub mod delayed;
pub mod dispatch;
pub mod events;
pub mod module;
pub mod scheduling;

#[cfg(test)]
mod testing;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigSource, DeliveryMode, EventsConfig};
pub use error::{EventError, Result};

pub use delayed::DelayedEventHub;
pub use dispatch::{AsyncDispatchQueue, AsyncEventHub};
pub use events::{
    handler, Event, EventHub, EventKey, Handler, HandlerResult, Lineage, Publisher, SharedEvent,
};
pub use module::EventsModule;
pub use scheduling::{
    occurrence_fn, CronExpression, Every, Occurrence, Once, ScheduleHeap, ScheduledEvent,
    ScheduledEventHub, ScheduledItem, Ticker,
};
