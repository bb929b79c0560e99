//! Delayed hub specs

use crate::prelude::*;
use eventide_core::{DelayedEventHub, EventError};
use similar_asserts::assert_eq;

fn delayed_hub(log: &Log, default: DeliveryMode) -> DelayedEventHub {
    let events = Arc::new(EventHub::new());
    events.subscribe(log.pings());
    let config = EventsConfig::default().with_default_event_behavior(default);
    DelayedEventHub::new(events, Arc::new(config))
}

#[test]
fn two_flushes_deliver_once() {
    let log = Log::new();
    let hub = delayed_hub(&log, DeliveryMode::Immediate);

    hub.raise_delayed(Ping::new(1)).unwrap();
    hub.flush().unwrap();
    hub.flush().unwrap();

    assert_eq!(log.entries(), vec!["1"]);
}

#[test]
fn flush_preserves_raise_order() {
    let log = Log::new();
    let hub = delayed_hub(&log, DeliveryMode::Delayed);

    for n in [3, 1, 2] {
        hub.raise(Ping::new(n)).unwrap();
    }
    assert!(log.entries().is_empty());

    assert_eq!(hub.flush().unwrap(), 3);
    assert_eq!(log.entries(), vec!["3", "1", "2"]);
}

#[test]
fn marked_events_ignore_the_default() {
    let log = Log::new();
    let hub = delayed_hub(&log, DeliveryMode::Immediate);

    hub.raise(Ping::delayed(1)).unwrap();
    hub.raise(Ping::new(2)).unwrap();

    assert_eq!(log.entries(), vec!["2"]);
    assert_eq!(hub.pending(), 1);
}

#[test]
fn unknown_default_behavior_is_a_configuration_error() {
    let err = EventsConfig::from_toml(r#"default_event_behavior = "eventually""#).unwrap_err();
    assert!(matches!(err, EventError::InvalidConfiguration(_)));
}

#[test]
fn shutdown_delivers_leftovers_and_closes() {
    let log = Log::new();
    let hub = delayed_hub(&log, DeliveryMode::Delayed);
    hub.raise(Ping::new(1)).unwrap();

    assert_eq!(hub.shutdown().unwrap(), 1);

    assert_eq!(log.entries(), vec!["1"]);
    assert!(matches!(hub.raise(Ping::new(2)), Err(EventError::Closed(_))));
}
