// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Occurrence strategies: when does a scheduled event fire next

use crate::error::{EventError, Result};
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Computes the next firing instant of a scheduled event
pub trait Occurrence: Send + Sync {
    /// First occurrence strictly after `now`, or `None` when exhausted
    fn next_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>>;
}

impl<O: Occurrence + ?Sized> Occurrence for Arc<O> {
    fn next_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        (**self).next_after(now)
    }
}

impl<O: Occurrence + ?Sized> Occurrence for Box<O> {
    fn next_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        (**self).next_after(now)
    }
}

/// Fires a single time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Once {
    at: DateTime<Utc>,
}

impl Once {
    pub fn at(at: DateTime<Utc>) -> Self {
        Self { at }
    }
}

impl Occurrence for Once {
    fn next_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        (self.at > now).then_some(self.at)
    }
}

/// Fires at `start`, `start + interval`, `start + 2 * interval`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Every {
    start: DateTime<Utc>,
    interval: TimeDelta,
}

impl Every {
    /// Intervals must be at least one millisecond
    pub fn new(start: DateTime<Utc>, interval: Duration) -> Result<Self> {
        let interval = TimeDelta::from_std(interval)
            .map_err(|_| EventError::InvalidInterval(format!("{:?} is out of range", interval)))?;
        if interval < TimeDelta::milliseconds(1) {
            return Err(EventError::InvalidInterval(format!(
                "{}ms is below the 1ms minimum",
                interval.num_milliseconds()
            )));
        }
        Ok(Self { start, interval })
    }

    pub fn interval(&self) -> TimeDelta {
        self.interval
    }
}

impl Occurrence for Every {
    fn next_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if now < self.start {
            return Some(self.start);
        }
        let step = self.interval.num_milliseconds();
        let elapsed = (now - self.start).num_milliseconds();
        let steps = elapsed / step + 1;
        let offset = TimeDelta::try_milliseconds(step.checked_mul(steps)?)?;
        self.start.checked_add_signed(offset)
    }
}

/// Closure-backed strategy, see [`occurrence_fn`]
pub struct FnOccurrence<F>(F);

impl<F> Occurrence for FnOccurrence<F>
where
    F: Fn(DateTime<Utc>) -> Option<DateTime<Utc>> + Send + Sync,
{
    fn next_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        (self.0)(now).filter(|next| *next > now)
    }
}

/// Use a closure as an occurrence strategy
///
/// Results that are not strictly after `now` are treated as exhausted.
pub fn occurrence_fn<F>(f: F) -> FnOccurrence<F>
where
    F: Fn(DateTime<Utc>) -> Option<DateTime<Utc>> + Send + Sync,
{
    FnOccurrence(f)
}

#[cfg(test)]
#[path = "occurrence_tests.rs"]
mod tests;
