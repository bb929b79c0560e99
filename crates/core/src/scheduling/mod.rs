// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduling: occurrence strategies, the schedule heap and its hub
//!
//! This module provides:
//! - **Occurrence**: when a scheduled event fires next (`Once`, `Every`,
//!   `CronExpression`, or a closure)
//! - **ScheduleHeap**: min-heap of scheduled items by next occurrence
//! - **ScheduledEventHub**: fires due items through a `Publisher`
//! - **Ticker**: thread that drives the hub periodically

mod cron;
mod heap;
mod hub;
mod occurrence;
mod scheduled;
mod ticker;

pub use cron::CronExpression;
pub use heap::{ScheduleHeap, ScheduledItem};
pub use hub::ScheduledEventHub;
pub use occurrence::{occurrence_fn, Every, FnOccurrence, Occurrence, Once};
pub use scheduled::{ScheduledEvent, ScheduledEventBuilder};
pub use ticker::Ticker;
