//! Shared fixtures for the behavioral specs

#![allow(dead_code)]

pub use chrono::{DateTime, TimeDelta, TimeZone, Utc};
pub use eventide_core::{
    handler, Clock, DeliveryMode, Event, EventHub, EventsConfig, FakeClock, Handler, Lineage,
};
pub use std::sync::{Arc, Mutex};
pub use std::time::{Duration, Instant};

/// Capability carried by money-moving events
pub trait Billable: Send + Sync {
    fn cents(&self) -> u64;
}

/// Root of the account event hierarchy
#[derive(Debug, Clone)]
pub struct AccountEvent {
    pub account: String,
}

impl Event for AccountEvent {}

/// Derived from `AccountEvent`, implements `Billable`
#[derive(Debug, Clone)]
pub struct Deposit {
    pub base: AccountEvent,
    pub cents: u64,
}

impl Deposit {
    pub fn new(account: &str, cents: u64) -> Self {
        Self {
            base: AccountEvent {
                account: account.to_string(),
            },
            cents,
        }
    }
}

impl Billable for Deposit {
    fn cents(&self) -> u64 {
        self.cents
    }
}

impl Event for Deposit {
    fn describe<'a>(&'a self, lineage: &mut Lineage<'a>) {
        lineage
            .ancestor(&self.base)
            .capability::<dyn Billable>(self);
    }
}

/// Plain event with a sequence number and optional routing marker
#[derive(Debug, Clone)]
pub struct Ping {
    pub n: u32,
    pub mode: Option<DeliveryMode>,
}

impl Ping {
    pub fn new(n: u32) -> Self {
        Self { n, mode: None }
    }

    pub fn delayed(n: u32) -> Self {
        Self {
            n,
            mode: Some(DeliveryMode::Delayed),
        }
    }
}

impl Event for Ping {
    fn delivery_mode(&self) -> Option<DeliveryMode> {
        self.mode
    }
}

/// Thread-safe log of handler calls
#[derive(Clone, Default)]
pub struct Log {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Handler that logs `label` on every delivery
    pub fn labelled<T: ?Sized + 'static>(&self, label: &str) -> Handler<T> {
        let log = self.clone();
        let label = label.to_string();
        handler(move |_: &T| {
            log.push(label.clone());
            Ok(())
        })
    }

    /// Handler that logs each ping's number
    pub fn pings(&self) -> Handler<Ping> {
        let log = self.clone();
        handler(move |ping: &Ping| {
            log.push(ping.n.to_string());
            Ok(())
        })
    }

    /// Wait up to five seconds for `count` entries
    pub fn wait_for(&self, count: usize) -> Vec<String> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let entries = self.entries();
            if entries.len() >= count || Instant::now() >= deadline {
                return entries;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
    }
}

pub fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}
