// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the event core

use thiserror::Error;

/// Errors surfaced by hubs, queues and the scheduler
#[derive(Debug, Error)]
pub enum EventError {
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid cron expression '{expression}': {reason}")]
    InvalidCronExpression { expression: String, reason: String },
    #[error("invalid interval: {0}")]
    InvalidInterval(String),
    #[error("handler for {event} failed: {source}")]
    Handler {
        event: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("{event} cannot be delivered as {expected}")]
    Undeliverable {
        event: &'static str,
        expected: &'static str,
    },
    #[error("{0} is shut down")]
    Closed(&'static str),
    #[error("failed to spawn thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EventError>;
