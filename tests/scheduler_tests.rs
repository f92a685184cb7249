//! Contract tests for the subscription scheduler, driven under paused
//! tokio time so interval behavior is deterministic.

use std::future::{ready, Ready};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use proverb_bot::services::subscription::{
    SchedulerError, SubscriptionScheduler, DEFAULT_INTERVAL,
};
use tokio::time::sleep;

fn count_ticks(counter: &Arc<AtomicUsize>) -> impl Fn() -> Ready<anyhow::Result<()>> {
    let counter = counter.clone();
    move || {
        counter.fetch_add(1, Ordering::SeqCst);
        ready(Ok(()))
    }
}

#[tokio::test(start_paused = true)]
async fn test_first_tick_fires_after_one_full_interval() {
    let mut scheduler = SubscriptionScheduler::new();
    scheduler.start().expect("first start should succeed");

    let ticks = Arc::new(AtomicUsize::new(0));
    scheduler.subscribe(DEFAULT_INTERVAL, count_ticks(&ticks));

    // nothing fires before the first interval elapses
    sleep(Duration::from_millis(9_900)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 0);

    sleep(Duration::from_millis(200)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 1);

    scheduler.stop();
}

#[tokio::test(start_paused = true)]
async fn test_ticks_repeat_every_interval() {
    let mut scheduler = SubscriptionScheduler::new();
    scheduler.start().expect("first start should succeed");

    let ticks = Arc::new(AtomicUsize::new(0));
    scheduler.subscribe(Duration::from_secs(10), count_ticks(&ticks));

    sleep(Duration::from_secs(35)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 3);

    scheduler.stop();
}

#[tokio::test(start_paused = true)]
async fn test_resubscribe_replaces_job_before_it_ever_fires() {
    let mut scheduler = SubscriptionScheduler::new();
    scheduler.start().expect("first start should succeed");

    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));

    scheduler.subscribe(Duration::from_secs(10), count_ticks(&first));
    sleep(Duration::from_secs(2)).await;
    scheduler.subscribe(Duration::from_secs(10), count_ticks(&second));

    // run well past several periods of the replaced job
    sleep(Duration::from_secs(39)).await;
    assert_eq!(first.load(Ordering::SeqCst), 0);
    // the replacement ticks at t=12s, 22s, 32s
    assert_eq!(second.load(Ordering::SeqCst), 3);

    scheduler.stop();
}

#[tokio::test(start_paused = true)]
async fn test_unsubscribe_with_no_job_is_a_noop() {
    let mut scheduler = SubscriptionScheduler::new();
    scheduler.start().expect("first start should succeed");

    assert!(!scheduler.is_subscribed());
    scheduler.unsubscribe();
    assert!(!scheduler.is_subscribed());

    scheduler.stop();
}

#[tokio::test(start_paused = true)]
async fn test_unsubscribe_cancels_future_ticks() {
    let mut scheduler = SubscriptionScheduler::new();
    scheduler.start().expect("first start should succeed");

    let ticks = Arc::new(AtomicUsize::new(0));
    scheduler.subscribe(Duration::from_secs(10), count_ticks(&ticks));

    sleep(Duration::from_secs(25)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 2);

    scheduler.unsubscribe();
    assert!(!scheduler.is_subscribed());

    sleep(Duration::from_secs(50)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 2);

    scheduler.stop();
}

#[tokio::test(start_paused = true)]
async fn test_stop_cancels_all_future_ticks() {
    let mut scheduler = SubscriptionScheduler::new();
    scheduler.start().expect("first start should succeed");

    let ticks = Arc::new(AtomicUsize::new(0));
    scheduler.subscribe(Duration::from_secs(10), count_ticks(&ticks));

    sleep(Duration::from_secs(25)).await;
    scheduler.stop();

    sleep(Duration::from_secs(50)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_subscribe_after_stop_never_fires() {
    let mut scheduler = SubscriptionScheduler::new();
    scheduler.start().expect("first start should succeed");
    scheduler.stop();

    let ticks = Arc::new(AtomicUsize::new(0));
    scheduler.subscribe(Duration::from_secs(10), count_ticks(&ticks));
    assert!(!scheduler.is_subscribed());

    sleep(Duration::from_secs(50)).await;
    assert_eq!(ticks.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_double_start_is_a_usage_error() {
    let mut scheduler = SubscriptionScheduler::new();
    scheduler.start().expect("first start should succeed");

    assert!(matches!(
        scheduler.start(),
        Err(SchedulerError::AlreadyStarted)
    ));

    // and restarting after a stop is the same usage error
    scheduler.stop();
    assert!(matches!(
        scheduler.start(),
        Err(SchedulerError::AlreadyStarted)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_failing_tick_does_not_cancel_the_job() {
    let mut scheduler = SubscriptionScheduler::new();
    scheduler.start().expect("first start should succeed");

    let attempts = Arc::new(AtomicUsize::new(0));
    let callback = {
        let attempts = attempts.clone();
        move || {
            let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n == 2 {
                    anyhow::bail!("tick exploded");
                }
                Ok(())
            }
        }
    };
    scheduler.subscribe(Duration::from_secs(10), callback);

    // three ticks, the middle one failing
    sleep(Duration::from_secs(35)).await;
    assert_eq!(attempts.load(Ordering::SeqCst), 3);

    scheduler.stop();
}

#[tokio::test(start_paused = true)]
async fn test_slow_tick_delays_but_never_overlaps() {
    let mut scheduler = SubscriptionScheduler::new();
    scheduler.start().expect("first start should succeed");

    let started = Arc::new(AtomicUsize::new(0));
    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_in_flight = Arc::new(AtomicUsize::new(0));

    let callback = {
        let started = started.clone();
        let in_flight = in_flight.clone();
        let max_in_flight = max_in_flight.clone();
        move || {
            let started = started.clone();
            let in_flight = in_flight.clone();
            let max_in_flight = max_in_flight.clone();
            async move {
                started.fetch_add(1, Ordering::SeqCst);
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_in_flight.fetch_max(now, Ordering::SeqCst);
                // tick takes longer than the period
                sleep(Duration::from_secs(15)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            }
        }
    };
    scheduler.subscribe(Duration::from_secs(10), callback);

    // with a 15s tick on a 10s period the delayed schedule runs the
    // callback at t=10s, 25s, and 40s
    sleep(Duration::from_secs(24)).await;
    assert_eq!(started.load(Ordering::SeqCst), 1);

    sleep(Duration::from_secs(17)).await;
    assert_eq!(started.load(Ordering::SeqCst), 3);
    assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);

    scheduler.stop();
}

#[tokio::test(start_paused = true)]
async fn test_in_flight_tick_completes_after_unsubscribe() {
    let mut scheduler = SubscriptionScheduler::new();
    scheduler.start().expect("first start should succeed");

    let started = Arc::new(AtomicUsize::new(0));
    let completed = Arc::new(AtomicUsize::new(0));

    let callback = {
        let started = started.clone();
        let completed = completed.clone();
        move || {
            let started = started.clone();
            let completed = completed.clone();
            async move {
                started.fetch_add(1, Ordering::SeqCst);
                sleep(Duration::from_secs(15)).await;
                completed.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }
    };
    scheduler.subscribe(Duration::from_secs(10), callback);

    // unsubscribe lands while the first tick is still executing
    sleep(Duration::from_secs(12)).await;
    assert_eq!(started.load(Ordering::SeqCst), 1);
    assert_eq!(completed.load(Ordering::SeqCst), 0);
    scheduler.unsubscribe();

    // the in-flight tick finishes; nothing fires after it
    sleep(Duration::from_secs(60)).await;
    assert_eq!(started.load(Ordering::SeqCst), 1);
    assert_eq!(completed.load(Ordering::SeqCst), 1);

    scheduler.stop();
}
