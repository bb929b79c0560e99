// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Asynchronous delivery: per-type worker queues and their hub

mod hub;
mod queue;

pub use hub::AsyncEventHub;
pub use queue::AsyncDispatchQueue;
