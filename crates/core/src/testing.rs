// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event types and recorders shared by unit tests

use crate::config::DeliveryMode;
use crate::events::{handler, Event, Handler, Lineage};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::fmt::MakeWriter;

/// Capability implemented by order events
pub trait Auditable: Send + Sync {
    fn audit_tag(&self) -> String;
}

/// Capability implemented by events that carry a priority
pub trait Prioritized: Send + Sync {
    fn priority(&self) -> u8;
}

/// Root of the test hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
}

impl Notice {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl Event for Notice {}

/// Derives from `Notice`, implements `Auditable`
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPlaced {
    pub notice: Notice,
    pub order_id: u32,
}

impl OrderPlaced {
    pub fn new(order_id: u32) -> Self {
        Self {
            notice: Notice::new(&format!("order {}", order_id)),
            order_id,
        }
    }
}

impl Auditable for OrderPlaced {
    fn audit_tag(&self) -> String {
        format!("order:{}", self.order_id)
    }
}

impl Event for OrderPlaced {
    fn describe<'a>(&'a self, lineage: &mut Lineage<'a>) {
        lineage
            .ancestor(&self.notice)
            .capability::<dyn Auditable>(self);
    }
}

/// Derives from `OrderPlaced`, adds `Prioritized`
#[derive(Debug, Clone, PartialEq)]
pub struct RushOrder {
    pub order: OrderPlaced,
    pub priority: u8,
}

impl RushOrder {
    pub fn new(order_id: u32, priority: u8) -> Self {
        Self {
            order: OrderPlaced::new(order_id),
            priority,
        }
    }
}

impl Prioritized for RushOrder {
    fn priority(&self) -> u8 {
        self.priority
    }
}

impl Event for RushOrder {
    fn describe<'a>(&'a self, lineage: &mut Lineage<'a>) {
        lineage
            .ancestor(&self.order)
            .capability::<dyn Prioritized>(self);
    }
}

/// Unrelated event with an explicit routing marker
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub seq: u32,
    pub mode: Option<DeliveryMode>,
}

impl Tick {
    pub fn new(seq: u32) -> Self {
        Self { seq, mode: None }
    }

    pub fn marked(seq: u32, mode: DeliveryMode) -> Self {
        Self {
            seq,
            mode: Some(mode),
        }
    }
}

impl Event for Tick {
    fn delivery_mode(&self) -> Option<DeliveryMode> {
        self.mode
    }
}

/// Thread-safe call log
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.calls.lock().unwrap().push(entry.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Poll until at least `count` calls were recorded, or five seconds pass
    pub fn wait_for(&self, count: usize) -> Vec<String> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let calls = self.calls();
            if calls.len() >= count || Instant::now() >= deadline {
                return calls;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    /// Handler that records `label` for every delivery
    pub fn handler<T: ?Sized + 'static>(&self, label: &str) -> Handler<T> {
        let recorder = self.clone();
        let label = label.to_string();
        handler(move |_: &T| {
            recorder.record(label.clone());
            Ok(())
        })
    }
}

/// A writer that captures log output for testing
#[derive(Clone, Default)]
pub struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with tracing output captured
pub fn with_tracing<R>(f: impl FnOnce() -> R) -> (String, R) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs.clone())
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (logs.contents(), result)
}
