// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Externally supplied configuration for the event core
//!
//! Loading and persisting configuration belongs to the host. This module only
//! defines the values the core reads and the `ConfigSource` seam it reads
//! them through.

use crate::error::{EventError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// How an event without an explicit marker is routed by the delayed hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Deliver through the target publisher right away
    #[default]
    Immediate,
    /// Buffer until the next flush
    Delayed,
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::Immediate => write!(f, "immediate"),
            DeliveryMode::Delayed => write!(f, "delayed"),
        }
    }
}

impl std::str::FromStr for DeliveryMode {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "immediate" => Ok(DeliveryMode::Immediate),
            "delayed" => Ok(DeliveryMode::Delayed),
            _ => Err(EventError::InvalidConfiguration(format!(
                "unknown default event behavior: {}",
                s
            ))),
        }
    }
}

/// Configuration values consumed by the hubs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Period of the scheduler tick
    #[serde(with = "humantime_serde")]
    pub execution_check: Duration,
    /// Period of the host's cache expiration sweep (not used by the core itself)
    #[serde(with = "humantime_serde")]
    pub expiration_check: Duration,
    pub default_event_behavior: DeliveryMode,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            execution_check: Duration::from_secs(1),
            expiration_check: Duration::from_secs(30),
            default_event_behavior: DeliveryMode::Immediate,
        }
    }
}

impl EventsConfig {
    /// Parse configuration from TOML text
    ///
    /// Missing keys fall back to defaults; durations use humantime syntax
    /// such as `"500ms"` or `"1m"`.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| EventError::InvalidConfiguration(e.to_string()))
    }

    pub fn with_execution_check(self, execution_check: Duration) -> Self {
        Self {
            execution_check,
            ..self
        }
    }

    pub fn with_default_event_behavior(self, default_event_behavior: DeliveryMode) -> Self {
        Self {
            default_event_behavior,
            ..self
        }
    }
}

/// Source of the current configuration, consulted at use time
pub trait ConfigSource: Send + Sync {
    fn events_config(&self) -> Result<EventsConfig>;
}

impl ConfigSource for EventsConfig {
    fn events_config(&self) -> Result<EventsConfig> {
        Ok(self.clone())
    }
}

impl<S: ConfigSource + ?Sized> ConfigSource for Arc<S> {
    fn events_config(&self) -> Result<EventsConfig> {
        (**self).events_config()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
