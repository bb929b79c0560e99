// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An event bound to an occurrence strategy

use super::occurrence::Occurrence;
use crate::error::{EventError, Result};
use crate::events::{Event, SharedEvent};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// An event republished on every occurrence of its strategy
///
/// Identity for unscheduling is the `Arc` allocation returned by
/// [`ScheduledEvent::new`] or the builder.
pub struct ScheduledEvent {
    label: String,
    event: SharedEvent,
    occurrence: Box<dyn Occurrence>,
}

impl ScheduledEvent {
    pub fn new<E, O>(event: E, occurrence: O) -> Arc<Self>
    where
        E: Event,
        O: Occurrence + 'static,
    {
        let event = SharedEvent::new(event);
        Arc::new(Self {
            label: event.type_name().to_string(),
            event,
            occurrence: Box::new(occurrence),
        })
    }

    pub fn builder() -> ScheduledEventBuilder {
        ScheduledEventBuilder::default()
    }

    pub fn event(&self) -> &SharedEvent {
        &self.event
    }

    /// Name used in logs; the event's type name unless set on the builder
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn next_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.occurrence.next_after(now)
    }
}

impl std::fmt::Debug for ScheduledEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledEvent")
            .field("label", &self.label)
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ScheduledEvent`]
#[derive(Default)]
pub struct ScheduledEventBuilder {
    label: Option<String>,
    event: Option<SharedEvent>,
    occurrence: Option<Box<dyn Occurrence>>,
}

impl ScheduledEventBuilder {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn event<E: Event>(self, event: E) -> Self {
        self.shared_event(SharedEvent::new(event))
    }

    pub fn shared_event(mut self, event: SharedEvent) -> Self {
        self.event = Some(event);
        self
    }

    pub fn occurrence(mut self, occurrence: impl Occurrence + 'static) -> Self {
        self.occurrence = Some(Box::new(occurrence));
        self
    }

    /// Fails with `MissingArgument` when the event or occurrence is unset
    pub fn build(self) -> Result<Arc<ScheduledEvent>> {
        let event = self.event.ok_or(EventError::MissingArgument("event"))?;
        let occurrence = self
            .occurrence
            .ok_or(EventError::MissingArgument("occurrence"))?;
        Ok(Arc::new(ScheduledEvent {
            label: self
                .label
                .unwrap_or_else(|| event.type_name().to_string()),
            event,
            occurrence,
        }))
    }
}
