//! Async dispatch ordering specs

use crate::prelude::*;
use eventide_core::AsyncEventHub;
use similar_asserts::assert_eq;

#[test]
fn async_hub_delivers_in_raise_order() {
    let hub = AsyncEventHub::new(Arc::new(EventHub::new()));
    let log = Log::new();
    hub.subscribe(log.pings()).unwrap();

    for n in 1..=3 {
        hub.raise(Ping::new(n)).unwrap();
    }

    assert_eq!(log.wait_for(3), vec!["1", "2", "3"]);
}

#[test]
fn concurrent_producers_each_keep_fifo_order() {
    let hub = Arc::new(AsyncEventHub::new(Arc::new(EventHub::new())));
    let log = Log::new();
    hub.subscribe(log.pings()).unwrap();

    let producers: Vec<_> = (0..3u32)
        .map(|p| {
            let hub = hub.clone();
            std::thread::spawn(move || {
                for n in 0..100 {
                    hub.raise(Ping::new(p * 1000 + n)).unwrap();
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }
    hub.shutdown();

    let seen: Vec<u32> = log.entries().iter().map(|e| e.parse().unwrap()).collect();
    assert_eq!(seen.len(), 300);
    for p in 0..3u32 {
        let own: Vec<u32> = seen.iter().copied().filter(|n| n / 1000 == p).collect();
        let expected: Vec<u32> = (0..100).map(|n| p * 1000 + n).collect();
        assert_eq!(own, expected);
    }
}

#[test]
fn sync_raise_also_feeds_async_subscribers() {
    let events = Arc::new(EventHub::new());
    let hub = AsyncEventHub::new(events.clone());
    let log = Log::new();
    hub.subscribe(log.labelled::<AccountEvent>("async account"))
        .unwrap();

    events.raise(Deposit::new("acme", 1)).unwrap();

    assert_eq!(log.wait_for(1), vec!["async account"]);
}

#[test]
fn last_unsubscribe_retires_the_queue() {
    let hub = AsyncEventHub::new(Arc::new(EventHub::new()));
    let log = Log::new();
    let h = log.pings();
    hub.subscribe(h.clone()).unwrap();
    assert!(hub.has_queue::<Ping>());

    assert!(hub.unsubscribe(&h));

    assert!(!hub.has_queue::<Ping>());
    assert!(!hub.hub().has_subscribers::<Ping>());
}
