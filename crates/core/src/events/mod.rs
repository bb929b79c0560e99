// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronous hierarchical publish/subscribe
//!
//! This module provides:
//! - `Event` - Marker trait with declared ancestors and capabilities
//! - `EventHub` - Delivers raised events on the caller's thread
//! - `Publisher` - The seam every hub delivers through

mod event;
mod hub;
mod subscription;

pub use event::{handler, Event, EventKey, Handler, HandlerResult, Lineage, SharedEvent, View};
pub use hub::{EventHub, Publisher};

pub(crate) use subscription::{HandlerList, Subscription};
