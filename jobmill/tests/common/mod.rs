//! Shared helpers for the integration tests.

#![allow(dead_code)]

use jobmill::jobs::{downcast_job, Job, JobCallback, JobContext, JobId};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Upper bound for anything the tests wait on.
pub const TIMEOUT: Duration = Duration::from_secs(10);

/// Polls `condition` until it holds or `TIMEOUT` passes.
pub fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + TIMEOUT;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    condition()
}

// =============================================================================
// Synchronization
// =============================================================================

/// One-shot barrier that blocks jobs until the test opens it.
#[derive(Default)]
pub struct Gate {
    open: Mutex<bool>,
    cv: Condvar,
}

impl Gate {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn open(&self) {
        *self.open.lock() = true;
        self.cv.notify_all();
    }

    pub fn wait(&self) {
        let mut open = self.open.lock();
        let deadline = Instant::now() + TIMEOUT;
        while !*open {
            if self.cv.wait_until(&mut open, deadline).timed_out() {
                return;
            }
        }
    }
}

/// Counts events and lets the test wait for a given count.
#[derive(Default)]
pub struct Counter {
    count: Mutex<usize>,
    cv: Condvar,
}

impl Counter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn bump(&self) {
        *self.count.lock() += 1;
        self.cv.notify_all();
    }

    pub fn get(&self) -> usize {
        *self.count.lock()
    }

    pub fn wait_for(&self, target: usize) -> bool {
        let mut count = self.count.lock();
        let deadline = Instant::now() + TIMEOUT;
        while *count < target {
            if self.cv.wait_until(&mut count, deadline).timed_out() {
                return *count >= target;
            }
        }
        true
    }
}

// =============================================================================
// Callbacks
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Complete { id: JobId, success: bool },
    Abort { id: JobId },
    Progress { id: JobId, progress: u32, total: u32 },
}

/// Callback that records every notification.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
    cv: Condvar,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn push(&self, event: Event) {
        self.events.lock().push(event);
        self.cv.notify_all();
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn completions(&self) -> Vec<(JobId, bool)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Complete { id, success } => Some((id, success)),
                _ => None,
            })
            .collect()
    }

    pub fn aborts(&self) -> Vec<JobId> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Abort { id } => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Waits until at least `n` completion or abort events arrived.
    pub fn wait_for_outcomes(&self, n: usize) -> bool {
        let outcomes = |events: &Vec<Event>| {
            events
                .iter()
                .filter(|e| !matches!(e, Event::Progress { .. }))
                .count()
        };
        let mut events = self.events.lock();
        let deadline = Instant::now() + TIMEOUT;
        while outcomes(&*events) < n {
            if self.cv.wait_until(&mut events, deadline).timed_out() {
                return outcomes(&*events) >= n;
            }
        }
        true
    }
}

impl JobCallback for Recorder {
    fn on_job_complete(&self, id: JobId, success: bool, _job: &dyn Job) {
        self.push(Event::Complete { id, success });
    }

    fn on_job_abort(&self, id: JobId, _job: &dyn Job) {
        self.push(Event::Abort { id });
    }

    fn on_job_progress(&self, id: JobId, progress: u32, total: u32, _job: &dyn Job) {
        self.push(Event::Progress {
            id,
            progress,
            total,
        });
    }
}

// =============================================================================
// Jobs
// =============================================================================

/// Job identified by `key` that signals when it starts, then blocks on a gate.
pub struct GatedJob {
    pub key: u32,
    pub started: Arc<Counter>,
    pub gate: Arc<Gate>,
    pub runs: Arc<AtomicUsize>,
}

impl GatedJob {
    pub fn new(key: u32, started: &Arc<Counter>, gate: &Arc<Gate>) -> Self {
        Self {
            key,
            started: Arc::clone(started),
            gate: Arc::clone(gate),
            runs: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_runs(mut self, runs: &Arc<AtomicUsize>) -> Self {
        self.runs = Arc::clone(runs);
        self
    }
}

impl Job for GatedJob {
    fn do_work(&self, _ctx: &JobContext<'_>) -> bool {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.started.bump();
        self.gate.wait();
        true
    }

    fn job_type(&self) -> &str {
        "gated"
    }

    fn equals(&self, other: &dyn Job) -> bool {
        downcast_job::<GatedJob>(other).is_some_and(|o| o.key == self.key)
    }
}

/// Job that polls `should_cancel` until told to stop.
pub struct PollingJob {
    pub key: u32,
    pub started: Arc<Counter>,
    pub cancelled: Arc<AtomicBool>,
}

impl Job for PollingJob {
    fn do_work(&self, ctx: &JobContext<'_>) -> bool {
        self.started.bump();
        let deadline = Instant::now() + TIMEOUT;
        let mut step = 0;
        while Instant::now() < deadline {
            if ctx.should_cancel(step, 1000) {
                self.cancelled.store(true, Ordering::SeqCst);
                return false;
            }
            step = (step + 1) % 1000;
            std::thread::sleep(Duration::from_millis(1));
        }
        true
    }

    fn job_type(&self) -> &str {
        "polling"
    }

    fn equals(&self, other: &dyn Job) -> bool {
        downcast_job::<PollingJob>(other).is_some_and(|o| o.key == self.key)
    }
}

/// Job that appends its tag to a shared log.
pub struct LogJob {
    pub tag: u32,
    pub log: Arc<Mutex<Vec<u32>>>,
}

impl Job for LogJob {
    fn do_work(&self, _ctx: &JobContext<'_>) -> bool {
        self.log.lock().push(self.tag);
        true
    }

    fn job_type(&self) -> &str {
        "log"
    }
}

/// Sets a flag when dropped.
pub struct DropFlag(pub Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}
