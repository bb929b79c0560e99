// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic driver thread for a scheduled hub

use super::hub::ScheduledEventHub;
use crate::clock::Clock;
use crate::error::{EventError, Result};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Calls [`ScheduledEventHub::tick`] once per period until stopped
pub struct Ticker {
    stop: Mutex<Option<Sender<()>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Ticker {
    pub fn spawn<C: Clock>(hub: Arc<ScheduledEventHub<C>>, period: Duration) -> Result<Self> {
        if period.is_zero() {
            return Err(EventError::InvalidInterval(
                "tick period must be positive".to_string(),
            ));
        }

        let (stop, stopped) = mpsc::channel::<()>();
        let dispatch = tracing::dispatcher::get_default(|d| d.clone());
        let worker = thread::Builder::new()
            .name("event-ticker".to_string())
            .spawn(move || {
                tracing::dispatcher::with_default(&dispatch, || loop {
                    match stopped.recv_timeout(period) {
                        Err(RecvTimeoutError::Timeout) => {
                            hub.tick();
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                })
            })?;
        tracing::debug!(period = ?period, "ticker started");

        Ok(Self {
            stop: Mutex::new(Some(stop)),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Stop ticking and wait for an in-flight tick to finish
    pub fn stop(&self) {
        let stop = self.stop.lock().unwrap_or_else(|e| e.into_inner()).take();
        let Some(stop) = stop else {
            return;
        };
        let _ = stop.send(());

        let worker = self
            .worker
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(worker) = worker {
            if worker.thread().id() != thread::current().id() && worker.join().is_err() {
                tracing::error!("ticker thread terminated abnormally");
            }
        }
        tracing::debug!("ticker stopped");
    }

    pub fn is_running(&self) -> bool {
        self.stop
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "ticker_tests.rs"]
mod tests;
