//! Recurring delivery scheduling.
//!
//! The scheduler runs at most one job per process: a caller-supplied
//! async callback invoked on a fixed interval from a background tokio
//! task. Subscribing again replaces the active job before it can fire
//! another tick; unsubscribing and stopping cancel future ticks without
//! interrupting one already executing.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Default delivery period for a subscription.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Scheduler misuse, fatal to the calling operation only.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("scheduler already started")]
    AlreadyStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Created,
    Running,
    Stopped,
}

/// Handle to the active recurring job. Dropping the sender (or sending
/// `true`) makes the ticking task exit before its next tick.
struct JobHandle {
    cancel: watch::Sender<bool>,
}

/// Runs one caller-supplied callback on a fixed interval.
///
/// Ticks of a job are strictly serialized: the callback is awaited
/// inline by the ticking task, so a slow tick delays (never overlaps or
/// skips) the following ones. Cancellation is observed between ticks;
/// an in-flight tick is allowed to complete, which means at most one
/// more tick can land after `unsubscribe` or `stop`.
pub struct SubscriptionScheduler {
    state: State,
    job: Option<JobHandle>,
}

impl SubscriptionScheduler {
    pub fn new() -> Self {
        Self {
            state: State::Created,
            job: None,
        }
    }

    /// Activates the scheduler. Must be called once, before any job can
    /// run; any second call is a usage error.
    pub fn start(&mut self) -> Result<(), SchedulerError> {
        if self.state != State::Created {
            return Err(SchedulerError::AlreadyStarted);
        }
        self.state = State::Running;
        info!("subscription scheduler started");
        Ok(())
    }

    /// Deactivates the scheduler and cancels the active job, if any.
    /// Safe to call at any point; afterwards no callback fires again,
    /// even if `subscribe` is called.
    pub fn stop(&mut self) {
        self.cancel_job();
        self.state = State::Stopped;
        info!("subscription scheduler stopped");
    }

    /// Registers `callback` to run every `interval`, first firing one
    /// full interval from now. An already-registered job is replaced and
    /// never fires again. Errors returned by the callback are logged and
    /// do not cancel the job.
    pub fn subscribe<F, Fut>(&mut self, interval: Duration, callback: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.cancel_job();
        if self.state != State::Running {
            warn!("subscribe ignored: scheduler is not running");
            return;
        }

        let (cancel, mut cancelled) = watch::channel(false);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // an interval's first tick completes immediately; consume it
            // so the job first fires one full period from now
            ticker.tick().await;
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.changed() => break,
                    _ = ticker.tick() => {
                        if let Err(err) = callback().await {
                            warn!("subscription tick failed: {err:#}");
                        }
                    }
                }
            }
        });
        self.job = Some(JobHandle { cancel });
        info!("subscription registered (every {:?})", interval);
    }

    /// Cancels the active job; a no-op when none is registered.
    pub fn unsubscribe(&mut self) {
        if self.cancel_job() {
            info!("subscription cancelled");
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.job.is_some()
    }

    fn cancel_job(&mut self) -> bool {
        match self.job.take() {
            Some(handle) => {
                let _ = handle.cancel.send(true);
                true
            }
            None => false,
        }
    }
}

impl Default for SubscriptionScheduler {
    fn default() -> Self {
        Self::new()
    }
}
