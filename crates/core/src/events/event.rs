// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event marker trait and declared type lineage
//!
//! Rust has no runtime class hierarchy, so an event declares what it can be
//! seen as. `Event::describe` pushes borrowed views of the event as each
//! ancestor type and each capability; the hubs walk those views in order:
//! exact type, ancestors (most-derived first), then capabilities.

use crate::config::DeliveryMode;
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Result returned by event handlers
pub type HandlerResult = anyhow::Result<()>;

/// A subscribed callback for events viewed as `T`
///
/// Identity for unsubscription is the `Arc` allocation, so keep a clone of
/// the handler you subscribe.
pub type Handler<T> = Arc<dyn Fn(&T) -> HandlerResult + Send + Sync>;

/// Wrap a closure as a `Handler<T>`
pub fn handler<T, F>(f: F) -> Handler<T>
where
    T: ?Sized + 'static,
    F: Fn(&T) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A value that can be raised through the hubs
pub trait Event: Any + Send + Sync {
    /// Declare the ancestors and capabilities this event is delivered as
    fn describe<'a>(&'a self, lineage: &mut Lineage<'a>) {
        let _ = lineage;
    }

    /// Explicit routing marker for the delayed hub
    fn delivery_mode(&self) -> Option<DeliveryMode> {
        None
    }
}

/// Subscription key: a concrete event type or a `dyn` capability
#[derive(Clone, Copy)]
pub struct EventKey {
    id: TypeId,
    name: &'static str,
}

impl EventKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for EventKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EventKey {}

impl Hash for EventKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

type Deliver<'a> = Box<dyn Fn(&(dyn Any + Send + Sync)) -> Option<HandlerResult> + 'a>;

/// An event borrowed as one key's type
pub struct View<'a> {
    key: EventKey,
    deliver: Deliver<'a>,
}

impl<'a> View<'a> {
    fn of<T: ?Sized + 'static>(value: &'a T) -> Self {
        Self {
            key: EventKey::of::<T>(),
            deliver: Box::new(move |erased| {
                erased
                    .downcast_ref::<Handler<T>>()
                    .map(|handler| handler(value))
            }),
        }
    }

    pub fn key(&self) -> EventKey {
        self.key
    }

    /// Invoke an erased `Handler<T>` with this view; handlers of another
    /// type are ignored
    pub(crate) fn deliver(&self, erased: &(dyn Any + Send + Sync)) -> HandlerResult {
        (self.deliver)(erased).unwrap_or(Ok(()))
    }
}

/// Ordered views of a raised event
pub struct Lineage<'a> {
    exact: View<'a>,
    ancestors: Vec<View<'a>>,
    capabilities: Vec<View<'a>>,
}

impl<'a> Lineage<'a> {
    pub(crate) fn of<E: Event>(event: &'a E) -> Self {
        let mut lineage = Self {
            exact: View::of(event),
            ancestors: Vec::new(),
            capabilities: Vec::new(),
        };
        event.describe(&mut lineage);
        lineage
    }

    /// Declare `base` as the parent of the event being described
    ///
    /// The parent's own lineage is pulled in as well, so a chain only has
    /// to name its direct parent at each level.
    pub fn ancestor<B: Event>(&mut self, base: &'a B) -> &mut Self {
        let key = EventKey::of::<B>();
        if !self.contains(key) {
            self.ancestors.push(View::of(base));
            base.describe(self);
        }
        self
    }

    /// Declare a capability, usually `capability::<dyn Trait>(self)`
    pub fn capability<C: ?Sized + 'static>(&mut self, view: &'a C) -> &mut Self {
        if !self.contains(EventKey::of::<C>()) {
            self.capabilities.push(View::of(view));
        }
        self
    }

    pub fn contains(&self, key: EventKey) -> bool {
        self.views().any(|view| view.key == key)
    }

    /// Keys in delivery order
    pub fn keys(&self) -> Vec<EventKey> {
        self.views().map(View::key).collect()
    }

    pub(crate) fn views(&self) -> impl Iterator<Item = &View<'a>> {
        std::iter::once(&self.exact)
            .chain(self.ancestors.iter())
            .chain(self.capabilities.iter())
    }

    pub(crate) fn view(&self, key: EventKey) -> Option<&View<'a>> {
        self.views().find(|view| view.key == key)
    }
}

trait Dispatchable: Send + Sync {
    fn lineage(&self) -> Lineage<'_>;
    fn delivery_mode(&self) -> Option<DeliveryMode>;
    fn as_any(&self) -> &dyn Any;
    fn type_name(&self) -> &'static str;
}

impl<E: Event> Dispatchable for E {
    fn lineage(&self) -> Lineage<'_> {
        Lineage::of(self)
    }

    fn delivery_mode(&self) -> Option<DeliveryMode> {
        Event::delivery_mode(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<E>()
    }
}

/// A raised event shared between the publisher, queues and buffers
#[derive(Clone)]
pub struct SharedEvent(Arc<dyn Dispatchable>);

impl SharedEvent {
    pub fn new<E: Event>(event: E) -> Self {
        Self(Arc::new(event))
    }

    pub fn from_arc<E: Event>(event: Arc<E>) -> Self {
        Self(event)
    }

    pub fn lineage(&self) -> Lineage<'_> {
        self.0.lineage()
    }

    pub fn delivery_mode(&self) -> Option<DeliveryMode> {
        self.0.delivery_mode()
    }

    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        self.0.as_any().downcast_ref::<E>()
    }

    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }
}

impl fmt::Debug for SharedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedEvent").field(&self.type_name()).finish()
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
