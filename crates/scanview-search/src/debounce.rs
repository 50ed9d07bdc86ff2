//! Debounce with explicit superseding.
//!
//! Each [`Debouncer::schedule`] bumps a generation counter, aborts the task
//! still waiting from the previous call, and spawns a new one that sleeps for
//! the configured delay. A job only runs if its generation is still the latest
//! when the delay elapses, so a burst of schedules inside one window runs the
//! last job exactly once.
//!
//! Jobs receive their [`SupersedeToken`] and should check it again right
//! before publishing anything.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, trace};

/// Identity of one scheduled run.
#[derive(Debug, Clone)]
pub struct SupersedeToken {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl SupersedeToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// False once a later schedule (or a cancel) has happened.
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.generation
    }
}

/// Delays jobs and keeps only the most recent one.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    name: &'static str,
    delay: Duration,
    latest: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(name: &'static str, delay: Duration) -> Self {
        Self {
            name,
            delay,
            latest: Arc::new(AtomicU64::new(0)),
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Generation of the most recent schedule (0 before the first).
    pub fn generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Schedule `job` to run after the delay, superseding any pending job.
    pub fn schedule<F>(&mut self, job: F) -> SupersedeToken
    where
        F: FnOnce(SupersedeToken) + Send + 'static,
    {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        if let Some(previous) = self.pending.take() {
            if !previous.is_finished() {
                debug!(
                    subsystem = "search",
                    component = "debounce",
                    debouncer = self.name,
                    generation,
                    "Pending recompute superseded"
                );
            }
            previous.abort();
        }

        let token = SupersedeToken {
            generation,
            latest: Arc::clone(&self.latest),
        };
        let task_token = token.clone();
        let delay = self.delay;
        let name = self.name;
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            if task_token.is_current() {
                job(task_token);
            } else {
                trace!(
                    subsystem = "search",
                    component = "debounce",
                    debouncer = name,
                    generation,
                    "Stale job skipped"
                );
            }
        }));
        token
    }

    /// Drop the pending job, if any, without running it.
    pub fn cancel(&mut self) {
        self.latest.fetch_add(1, Ordering::AcqRel);
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }

    /// Whether a scheduled job is still waiting or running.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
