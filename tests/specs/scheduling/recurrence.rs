//! Scheduled hub specs: recurrence, cancellation and release of one-shots

use crate::prelude::*;
use eventide_core::{
    CronExpression, Every, Once, ScheduledEvent, ScheduledEventHub, SharedEvent, Ticker,
};
use similar_asserts::assert_eq;

fn scheduled_hub(log: &Log) -> (FakeClock, Arc<ScheduledEventHub<FakeClock>>) {
    let clock = FakeClock::at(noon());
    let events = Arc::new(EventHub::new());
    events.subscribe(log.pings());
    (clock.clone(), Arc::new(ScheduledEventHub::new(clock, events)))
}

#[test]
fn minute_interval_fires_after_half_an_hour() {
    let log = Log::new();
    let (clock, hub) = scheduled_hub(&log);
    let every = Every::new(noon(), Duration::from_secs(60)).unwrap();
    hub.schedule(ScheduledEvent::new(Ping::new(1), every));

    let ticker = Ticker::spawn(hub.clone(), Duration::from_millis(5)).unwrap();
    clock.advance(Duration::from_secs(30 * 60));

    assert!(!log.wait_for(1).is_empty());
    ticker.stop();
    assert_eq!(hub.next_occurrence(), Some(noon() + TimeDelta::minutes(31)));
}

#[test]
fn unschedule_before_due_time_prevents_firing() {
    let log = Log::new();
    let (clock, hub) = scheduled_hub(&log);
    let every = Every::new(noon(), Duration::from_secs(60)).unwrap();
    let scheduled = ScheduledEvent::new(Ping::new(1), every);
    hub.schedule(scheduled.clone());

    assert!(hub.unschedule(&scheduled));
    clock.advance(Duration::from_secs(30 * 60));

    assert_eq!(hub.tick(), 0);
    assert!(log.entries().is_empty());
}

#[test]
fn past_one_shot_never_fires() {
    let log = Log::new();
    let (clock, hub) = scheduled_hub(&log);

    let accepted = hub.schedule(ScheduledEvent::new(
        Ping::new(1),
        Once::at(noon() - TimeDelta::seconds(1)),
    ));
    clock.advance(Duration::from_secs(3600));

    assert!(!accepted);
    assert_eq!(hub.tick(), 0);
    assert!(log.entries().is_empty());
}

#[test]
fn fired_one_shot_leaves_nothing_behind() {
    let log = Log::new();
    let (clock, hub) = scheduled_hub(&log);
    let ping = Arc::new(Ping::new(8));
    let ping_ref = Arc::downgrade(&ping);
    let scheduled = ScheduledEvent::builder()
        .shared_event(SharedEvent::from_arc(ping))
        .occurrence(Once::at(noon() + TimeDelta::seconds(10)))
        .build()
        .unwrap();
    hub.schedule(scheduled);

    clock.advance(Duration::from_secs(10));
    hub.tick();

    assert_eq!(log.entries(), vec!["8"]);
    assert!(hub.is_empty());
    assert!(ping_ref.upgrade().is_none());
}

#[test]
fn cron_schedule_follows_the_expression() {
    let log = Log::new();
    let (clock, hub) = scheduled_hub(&log);
    let cron: CronExpression = "0 9 * * mon-fri".parse().unwrap();
    hub.schedule(ScheduledEvent::new(Ping::new(1), cron));

    // 2026-06-01 is a Monday; next run is Tuesday 09:00
    let tuesday = Utc.with_ymd_and_hms(2026, 6, 2, 9, 0, 0).unwrap();
    assert_eq!(hub.next_occurrence(), Some(tuesday));

    clock.set(tuesday);
    assert_eq!(hub.tick(), 1);
    assert_eq!(
        hub.next_occurrence(),
        Some(Utc.with_ymd_and_hms(2026, 6, 3, 9, 0, 0).unwrap())
    );
}
