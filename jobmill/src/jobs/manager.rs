//! The job manager: priority queues, worker pool and callback dispatch.
//!
//! All bookkeeping lives behind a single lock. The lock is never held while
//! a job runs or while a callback is invoked, so jobs and callbacks may call
//! back into the manager freely.
//!
//! # Scheduling
//!
//! - Jobs are queued per [`Priority`]; within a tier they are claimed FIFO.
//! - Workers scan from [`Priority::Dedicated`] down and claim the first job
//!   whose tier still has room. A tier has room while the total number of
//!   running jobs is below [`JobManager::max_workers`] for that tier.
//! - [`Priority::LowPausable`] is skipped entirely while paused.
//! - A worker that finds nothing to do waits for the configured idle timeout
//!   and then exits. New workers are spawned when queued work finds no idle
//!   worker to wake.
//!
//! # Deduplication
//!
//! A submission equal (per [`Job::equals`]) to a job still queued in the
//! same tier, or currently running, is merged into it: the new job is
//! dropped, its callback joins the existing work item and the existing id is
//! returned. Once a finished job has left the running set its callbacks may
//! still be in progress; an equal submission at that point starts a fresh
//! work item and runs again.

use super::callback::JobCallback;
use super::config::ManagerConfig;
use super::error::JobManagerError;
use super::job::{Job, JobId};
use super::lambda::LambdaJob;
use super::priority::Priority;
use super::telemetry::{NullTelemetrySink, TelemetryEvent, TelemetrySink};
use super::work_item::{ReleaseHook, WorkItem};
use super::worker::{self, JobWorker};
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// How long `cancel_jobs` sleeps between wake-ups while workers drain.
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(10);

// =============================================================================
// Job Manager
// =============================================================================

/// Priority-based, bounded-concurrency job scheduler.
///
/// `JobManager` is a cheap handle; clones share the same queues and worker
/// pool. Construct one at the application's composition root and pass it to
/// whatever needs to submit work. A new manager starts in the running state.
///
/// # Example
///
/// ```no_run
/// use jobmill::jobs::{JobManager, ManagerConfig, Priority};
///
/// let manager = JobManager::new(ManagerConfig::default());
/// let id = manager.submit(|| println!("hello from a worker"), None, Priority::Normal)?;
/// println!("queued job {}", id);
///
/// // On application shutdown:
/// manager.cancel_jobs();
/// # Ok::<(), jobmill::jobs::JobManagerError>(())
/// ```
#[derive(Clone)]
pub struct JobManager {
    shared: Arc<Shared>,
}

impl JobManager {
    /// Creates a running manager.
    pub fn new(config: ManagerConfig) -> Self {
        Self::with_telemetry(config, Arc::new(NullTelemetrySink))
    }

    /// Creates a running manager that reports to `telemetry`.
    pub fn with_telemetry(config: ManagerConfig, telemetry: Arc<dyn TelemetrySink>) -> Self {
        info!(
            max_workers = config.max_workers,
            dedicated_max_workers = config.dedicated_max_workers,
            idle_timeout_secs = config.idle_timeout.as_secs(),
            "Job manager started"
        );
        Self {
            shared: Arc::new(Shared::new(config, telemetry)),
        }
    }

    /// Returns the configuration the manager was built with.
    pub fn config(&self) -> &ManagerConfig {
        &self.shared.config
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    /// Queues `job` at `priority`.
    ///
    /// Ownership of the job moves to the manager whatever the outcome. If an
    /// equal job is already queued in the same tier or running, `job` is
    /// dropped, `callback` is attached to the existing work and its id is
    /// returned.
    ///
    /// # Errors
    ///
    /// [`JobManagerError::NotRunning`] if the manager has been shut down with
    /// [`cancel_jobs`](Self::cancel_jobs). The job is dropped.
    pub fn add_job<J: Job>(
        &self,
        job: J,
        callback: Option<Arc<dyn JobCallback>>,
        priority: Priority,
    ) -> Result<JobId, JobManagerError> {
        self.shared.add_job(Arc::new(job), callback, priority)
    }

    /// Queues an already boxed job. See [`add_job`](Self::add_job).
    pub fn add_boxed_job(
        &self,
        job: Box<dyn Job>,
        callback: Option<Arc<dyn JobCallback>>,
        priority: Priority,
    ) -> Result<JobId, JobManagerError> {
        self.shared.add_job(Arc::from(job), callback, priority)
    }

    /// Queues `job` at its own [`Job::priority`].
    pub fn submit_job<J: Job>(
        &self,
        job: J,
        callback: Option<Arc<dyn JobCallback>>,
    ) -> Result<JobId, JobManagerError> {
        let priority = job.priority();
        self.add_job(job, callback, priority)
    }

    /// Runs a closure on a worker thread.
    ///
    /// The job reports success unless the closure panics. Closure jobs are
    /// never merged with other submissions.
    pub fn submit<F>(
        &self,
        work: F,
        callback: Option<Arc<dyn JobCallback>>,
        priority: Priority,
    ) -> Result<JobId, JobManagerError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.add_job(
            LambdaJob::new(move || {
                work();
                true
            }),
            callback,
            priority,
        )
    }

    pub(crate) fn add_shared_job(
        &self,
        job: Arc<dyn Job>,
        callback: Option<Arc<dyn JobCallback>>,
        priority: Priority,
    ) -> Result<JobId, JobManagerError> {
        self.shared.add_job(job, callback, priority)
    }

    // -------------------------------------------------------------------------
    // Cancellation and lifecycle
    // -------------------------------------------------------------------------

    /// Cancels one job.
    ///
    /// A queued job is dropped without running and without any callback. A
    /// running job keeps running (its [`JobContext::should_cancel`] starts
    /// returning `true`) but its result is discarded silently. Unknown ids
    /// are ignored.
    ///
    /// [`JobContext::should_cancel`]: super::JobContext::should_cancel
    pub fn cancel_job(&self, id: JobId) {
        self.shared.cancel_job(id, None);
    }

    /// Cancels job `id` and runs `on_release` once the manager has dropped
    /// it.
    ///
    /// Returns `false` if the job was not running: it is gone already and
    /// `on_release` is dropped without being called.
    pub(crate) fn cancel_job_then(&self, id: JobId, on_release: ReleaseHook) -> bool {
        self.shared.cancel_job(id, Some(on_release))
    }

    /// Shuts the manager down.
    ///
    /// Stops accepting jobs, drops every queued job and notifies
    /// [`JobCallback::on_job_abort`] for every queued and running job. Then
    /// blocks until every worker thread has exited, which means waiting for
    /// running jobs to return from `do_work`.
    ///
    /// When called from a worker thread (for example from inside a callback)
    /// the wait for the pool to drain is skipped, since the calling worker
    /// could never exit.
    pub fn cancel_jobs(&self) {
        self.shared.cancel_jobs();
    }

    /// Starts accepting jobs again after [`cancel_jobs`](Self::cancel_jobs).
    ///
    /// # Errors
    ///
    /// [`JobManagerError::AlreadyRunning`] if the manager is running.
    pub fn restart(&self) -> Result<(), JobManagerError> {
        self.shared.restart()
    }

    /// Stops handing out [`Priority::LowPausable`] jobs. Running jobs are
    /// unaffected and the tier still accepts submissions.
    pub fn pause_jobs(&self) {
        self.shared.set_paused(true);
    }

    /// Resumes the pausable tier and wakes workers for any jobs it holds.
    pub fn unpause_jobs(&self) {
        self.shared.set_paused(false);
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Returns `true` while the manager accepts jobs.
    pub fn is_running(&self) -> bool {
        self.shared.lock().running
    }

    /// Returns `true` while the pausable tier is suspended.
    pub fn is_paused(&self) -> bool {
        self.shared.lock().paused
    }

    /// Returns `true` if a job of `priority` is running.
    ///
    /// Always `false` for [`Priority::LowPausable`] while paused.
    pub fn is_processing(&self, priority: Priority) -> bool {
        let state = self.shared.lock();
        if state.paused && priority == Priority::LowPausable {
            return false;
        }
        state.processing.iter().any(|item| item.priority == priority)
    }

    /// Returns `true` if a job whose [`Job::job_type`] is `job_type` is running.
    pub fn is_processing_type(&self, job_type: &str) -> bool {
        self.processing_count(job_type) > 0
    }

    /// Returns how many running jobs have the given type.
    ///
    /// Jobs of the pausable tier are not counted while paused.
    pub fn processing_count(&self, job_type: &str) -> usize {
        let state = self.shared.lock();
        state
            .processing
            .iter()
            .filter(|item| !(state.paused && item.priority == Priority::LowPausable))
            .filter(|item| item.job.job_type() == job_type)
            .count()
    }

    /// Returns how many callbacks are still waiting for job `id`.
    ///
    /// While callbacks are being delivered this counts the callback being
    /// invoked plus the ones after it. Returns 0 for unknown ids.
    pub fn pending_callback_count(&self, id: JobId) -> usize {
        self.shared.pending_callback_count(id)
    }

    /// Returns the worker cap for `priority`.
    pub fn max_workers(&self, priority: Priority) -> usize {
        self.shared.max_workers(priority)
    }

    /// Returns a snapshot of the manager's queues and pool.
    pub fn stats(&self) -> ManagerStats {
        let state = self.shared.lock();
        let mut queued = [0; Priority::COUNT];
        for (depth, queue) in queued.iter_mut().zip(state.queues.iter()) {
            *depth = queue.len();
        }
        ManagerStats {
            queued,
            processing: state.processing.len(),
            workers: state.workers.len(),
            running: state.running,
            paused: state.paused,
            jobs_accepted: state.jobs_accepted,
        }
    }
}

impl std::fmt::Debug for JobManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobManager")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Point-in-time view of a [`JobManager`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ManagerStats {
    /// Queued jobs per tier, indexed by [`Priority::index`].
    pub queued: [usize; Priority::COUNT],

    /// Jobs currently claimed by a worker.
    pub processing: usize,

    /// Live worker threads.
    pub workers: usize,

    /// Whether the manager accepts jobs.
    pub running: bool,

    /// Whether the pausable tier is suspended.
    pub paused: bool,

    /// Work items created since the manager was built.
    pub jobs_accepted: u64,
}

impl ManagerStats {
    /// Returns the number of queued jobs in `priority`.
    pub fn queued_at(&self, priority: Priority) -> usize {
        self.queued[priority.index()]
    }

    /// Returns the number of queued jobs across all tiers.
    pub fn total_queued(&self) -> usize {
        self.queued.iter().sum()
    }
}

// =============================================================================
// Shared State
// =============================================================================

pub(crate) struct Shared {
    state: Mutex<State>,
    /// Wakes idle workers when work arrives or the manager stops.
    job_event: Condvar,
    /// Signalled whenever a worker retires.
    workers_changed: Condvar,
    config: ManagerConfig,
    telemetry: Arc<dyn TelemetrySink>,
}

struct State {
    queues: [VecDeque<WorkItem>; Priority::COUNT],
    processing: Vec<WorkItem>,
    workers: Vec<usize>,
    next_worker_id: usize,
    /// Workers that have been spawned or signalled and are about to look for
    /// a job. They are not counted as idle when deciding whether to spawn.
    claims: usize,
    /// Workers busy delivering completion callbacks.
    delivering: usize,
    job_counter: u32,
    jobs_accepted: u64,
    pending_callbacks: HashMap<JobId, usize>,
    running: bool,
    paused: bool,
}

impl State {
    fn next_job_id(&mut self) -> JobId {
        loop {
            self.job_counter = self.job_counter.wrapping_add(1);
            if let Some(id) = JobId::new(self.job_counter) {
                return id;
            }
        }
    }

    fn idle_workers(&self) -> usize {
        self.workers
            .len()
            .saturating_sub(self.processing.len() + self.delivering + self.claims)
    }
}

impl Shared {
    fn new(config: ManagerConfig, telemetry: Arc<dyn TelemetrySink>) -> Self {
        Self {
            state: Mutex::new(State {
                queues: Default::default(),
                processing: Vec::new(),
                workers: Vec::new(),
                next_worker_id: 0,
                claims: 0,
                delivering: 0,
                job_counter: 0,
                jobs_accepted: 0,
                pending_callbacks: HashMap::new(),
                running: true,
                paused: false,
            }),
            job_event: Condvar::new(),
            workers_changed: Condvar::new(),
            config,
            telemetry,
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock()
    }

    pub(crate) fn max_workers(&self, priority: Priority) -> usize {
        match priority {
            Priority::Dedicated => self.config.dedicated_max_workers.max(1),
            tier => {
                let below_high = Priority::High.index() - tier.index();
                self.config.max_workers.saturating_sub(below_high).max(1)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    fn add_job(
        self: &Arc<Self>,
        job: Arc<dyn Job>,
        callback: Option<Arc<dyn JobCallback>>,
        priority: Priority,
    ) -> Result<JobId, JobManagerError> {
        let mut guard = self.lock();
        if !guard.running {
            drop(guard);
            self.telemetry.emit(TelemetryEvent::JobRejected {
                job_type: job.job_type().to_string(),
            });
            return Err(JobManagerError::NotRunning);
        }

        let state = &mut *guard;
        let existing = state.queues[priority.index()]
            .iter_mut()
            .chain(state.processing.iter_mut())
            .find(|item| item.matches(job.as_ref()));
        if let Some(item) = existing {
            item.add_callback(callback);
            let id = item.id;
            self.telemetry.emit(TelemetryEvent::JobDeduplicated {
                job_id: id,
                job_type: job.job_type().to_string(),
            });
            drop(guard);
            return Ok(id);
        }

        let id = state.next_job_id();
        state.jobs_accepted += 1;
        let job_type = job.job_type().to_string();
        let queue = &mut state.queues[priority.index()];
        queue.push_back(WorkItem::new(id, job, priority, callback));
        self.telemetry.emit(TelemetryEvent::JobQueued {
            job_id: id,
            job_type,
            priority,
            queue_depth: queue.len(),
        });

        self.start_workers(state, priority);
        Ok(id)
    }

    /// Makes sure someone will pick up a job just queued at `priority`.
    ///
    /// Wakes an idle worker if there is one, otherwise spawns a new worker
    /// unless the tier is already at its cap.
    fn start_workers(self: &Arc<Self>, state: &mut State, priority: Priority) {
        if priority == Priority::LowPausable && state.paused {
            return;
        }
        if state.processing.len() >= self.max_workers(priority) {
            return;
        }

        if state.idle_workers() > 0 {
            state.claims += 1;
            self.job_event.notify_one();
            return;
        }

        if let Err(e) = self.spawn_worker(state) {
            error!(error = %e, priority = %priority, "Job left queued, no worker available");
        }
    }

    fn spawn_worker(self: &Arc<Self>, state: &mut State) -> Result<(), JobManagerError> {
        let worker_id = state.next_worker_id;
        state.next_worker_id += 1;

        JobWorker::spawn(Arc::clone(self), worker_id).map_err(JobManagerError::WorkerSpawn)?;

        state.workers.push(worker_id);
        state.claims += 1;
        self.telemetry.emit(TelemetryEvent::WorkerSpawned {
            workers: state.workers.len(),
        });
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Worker side
    // -------------------------------------------------------------------------

    /// Claims the next eligible job, moving it to the running set.
    fn pop_job(&self, state: &mut State) -> Option<(JobId, Arc<dyn Job>)> {
        for priority in Priority::ALL.into_iter().rev() {
            if priority == Priority::LowPausable && state.paused {
                continue;
            }
            if state.queues[priority.index()].is_empty()
                || state.processing.len() >= self.max_workers(priority)
            {
                continue;
            }

            let item = state.queues[priority.index()].pop_front()?;
            let claimed = (item.id, Arc::clone(&item.job));
            self.telemetry.emit(TelemetryEvent::JobStarted {
                job_id: item.id,
                priority,
                wait_time: item.queued_at.elapsed(),
            });
            state.processing.push(item);
            return Some(claimed);
        }
        None
    }

    /// Blocks until a job is available for `worker_id`.
    ///
    /// Returns `None` when the worker should exit: the manager stopped, or
    /// nothing arrived within the idle timeout. The worker is removed from
    /// the pool before this returns `None`.
    pub(crate) fn get_next_job(&self, worker_id: usize) -> Option<(JobId, Arc<dyn Job>)> {
        let mut state = self.lock();
        while state.running {
            if let Some(job) = self.pop_job(&mut state) {
                return Some(job);
            }

            let result = self
                .job_event
                .wait_for(&mut state, self.config.idle_timeout);
            state.claims = state.claims.saturating_sub(1);
            if result.timed_out() {
                break;
            }
        }

        // A job may have arrived between the timeout and re-taking the lock.
        if state.running {
            if let Some(job) = self.pop_job(&mut state) {
                return Some(job);
            }
        }

        state.workers.retain(|w| *w != worker_id);
        self.telemetry.emit(TelemetryEvent::WorkerRetired {
            workers: state.workers.len(),
        });
        self.workers_changed.notify_all();
        None
    }

    /// Called by a freshly spawned worker before its first look for work.
    pub(crate) fn worker_started(&self) {
        let mut state = self.lock();
        state.claims = state.claims.saturating_sub(1);
    }

    /// Delivers the result of a finished job to its callbacks and drops it.
    pub(crate) fn on_job_complete(
        &self,
        id: JobId,
        success: bool,
        job: Arc<dyn Job>,
        duration: Duration,
    ) {
        let mut state = self.lock();
        let Some(pos) = state.processing.iter().position(|item| item.id == id) else {
            warn!(job_id = %id, "Finished job was not in the running set");
            return;
        };
        let mut item = state.processing.swap_remove(pos);
        let releases = std::mem::take(&mut item.on_release);

        self.telemetry.emit(TelemetryEvent::JobFinished {
            job_id: id,
            success,
            duration,
            callbacks: item.callbacks.len(),
        });

        if item.is_cancelled() {
            drop(state);
            debug!(job_id = %id, "Discarding result of cancelled job");
            run_release_hooks(id, releases);
            return;
        }

        let total = item.callbacks.len();
        state.pending_callbacks.insert(id, total);
        state.delivering += 1;
        drop(state);

        for (index, callback) in item.callbacks.iter().enumerate() {
            if index > 0 {
                self.lock().pending_callbacks.insert(id, total - index);
            }
            if let Err(panic) =
                worker::run_guarded(|| callback.on_job_complete(id, success, job.as_ref()))
            {
                error!(job_id = %id, job_type = %job.job_type(), panic = %panic, "Job completion callback panicked");
            }
        }

        let mut state = self.lock();
        state.pending_callbacks.remove(&id);
        state.delivering -= 1;
        drop(state);

        run_release_hooks(id, releases);
    }

    /// Forwards progress to the job's callbacks. Returns `true` if the job
    /// should stop because nobody is waiting for it.
    pub(crate) fn on_job_progress(&self, id: JobId, progress: u32, total: u32) -> bool {
        let state = self.lock();
        let Some(item) = state.processing.iter().find(|item| item.id == id) else {
            return true;
        };
        if item.is_cancelled() {
            return true;
        }
        let callbacks = item.callbacks.clone();
        let job = Arc::clone(&item.job);
        drop(state);

        for callback in callbacks {
            if let Err(panic) =
                worker::run_guarded(|| callback.on_job_progress(id, progress, total, job.as_ref()))
            {
                error!(job_id = %id, panic = %panic, "Job progress callback panicked");
            }
        }
        false
    }

    pub(crate) fn pending_callback_count(&self, id: JobId) -> usize {
        let state = self.lock();
        if let Some(count) = state.pending_callbacks.get(&id) {
            return *count;
        }
        state
            .processing
            .iter()
            .chain(state.queues.iter().flatten())
            .find(|item| item.id == id)
            .map_or(0, |item| item.callbacks.len())
    }

    // -------------------------------------------------------------------------
    // Cancellation and lifecycle
    // -------------------------------------------------------------------------

    fn cancel_job(&self, id: JobId, on_release: Option<ReleaseHook>) -> bool {
        let mut state = self.lock();

        let removed = state.queues.iter_mut().find_map(|queue| {
            let pos = queue.iter().position(|item| item.id == id)?;
            queue.remove(pos)
        });
        if let Some(item) = removed {
            drop(state);
            self.telemetry.emit(TelemetryEvent::JobCancelled {
                job_id: id,
                was_running: false,
            });
            drop(item);
            return false;
        }

        let Some(item) = state.processing.iter_mut().find(|item| item.id == id) else {
            return false;
        };
        let callbacks = item.take_callbacks();
        item.on_release.extend(on_release);
        drop(state);
        self.telemetry.emit(TelemetryEvent::JobCancelled {
            job_id: id,
            was_running: true,
        });
        drop(callbacks);
        true
    }

    fn cancel_jobs(&self) {
        let mut state = self.lock();
        state.running = false;

        let mut aborted: Vec<(JobId, Arc<dyn Job>, Vec<Arc<dyn JobCallback>>)> = Vec::new();
        for queue in state.queues.iter_mut() {
            aborted.extend(
                queue
                    .drain(..)
                    .map(|item| (item.id, item.job, item.callbacks)),
            );
        }
        for item in state.processing.iter_mut() {
            aborted.push((item.id, Arc::clone(&item.job), item.take_callbacks()));
        }
        let running_jobs = state.processing.len();
        drop(state);

        info!(
            aborted = aborted.len(),
            running = running_jobs,
            "Cancelling all jobs"
        );

        for (id, job, callbacks) in aborted {
            self.telemetry.emit(TelemetryEvent::JobAborted { job_id: id });
            for callback in callbacks {
                if let Err(panic) = worker::run_guarded(|| callback.on_job_abort(id, job.as_ref()))
                {
                    error!(job_id = %id, panic = %panic, "Job abort callback panicked");
                }
            }
        }

        if worker::is_worker_thread() {
            warn!("cancel_jobs called from a job worker, not waiting for the pool to drain");
            return;
        }

        let mut state = self.lock();
        while !state.workers.is_empty() {
            self.job_event.notify_all();
            self.workers_changed
                .wait_for(&mut state, SHUTDOWN_POLL_INTERVAL);
        }
        info!("Job manager stopped");
    }

    fn restart(&self) -> Result<(), JobManagerError> {
        let mut state = self.lock();
        if state.running {
            return Err(JobManagerError::AlreadyRunning);
        }
        state.running = true;
        if state.workers.is_empty() {
            state.claims = 0;
        }
        info!("Job manager restarted");
        Ok(())
    }

    fn set_paused(self: &Arc<Self>, paused: bool) {
        let mut state = self.lock();
        if state.paused == paused {
            return;
        }
        state.paused = paused;

        if paused {
            self.telemetry.emit(TelemetryEvent::Paused);
            return;
        }

        self.telemetry.emit(TelemetryEvent::Resumed);
        let waiting = state.queues[Priority::LowPausable.index()].len();
        for _ in 0..waiting {
            self.start_workers(&mut state, Priority::LowPausable);
        }
    }
}

fn run_release_hooks(id: JobId, hooks: Vec<ReleaseHook>) {
    for hook in hooks {
        if let Err(panic) = worker::run_guarded(hook) {
            error!(job_id = %id, panic = %panic, "Job release hook panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobContext;

    struct Noop;

    impl Job for Noop {
        fn do_work(&self, _ctx: &JobContext<'_>) -> bool {
            true
        }
    }

    #[test]
    fn test_max_workers_per_tier() {
        let manager = JobManager::new(ManagerConfig::default());
        assert_eq!(manager.max_workers(Priority::Dedicated), 10_000);
        assert_eq!(manager.max_workers(Priority::High), 5);
        assert_eq!(manager.max_workers(Priority::Normal), 4);
        assert_eq!(manager.max_workers(Priority::Low), 3);
        assert_eq!(manager.max_workers(Priority::LowPausable), 2);
    }

    #[test]
    fn test_max_workers_never_below_one() {
        let manager = JobManager::new(ManagerConfig::default().with_max_workers(1));
        for priority in Priority::ALL {
            assert!(manager.max_workers(priority) >= 1);
        }
        assert_eq!(manager.max_workers(Priority::LowPausable), 1);
    }

    #[test]
    fn test_job_ids_skip_zero_on_wrap() {
        let manager = JobManager::new(ManagerConfig::default());
        manager.shared.lock().job_counter = u32::MAX - 1;
        let mut state = manager.shared.lock();
        assert_eq!(state.next_job_id().get(), u32::MAX);
        assert_eq!(state.next_job_id().get(), 1);
    }

    #[test]
    fn test_new_manager_is_running_and_empty() {
        let manager = JobManager::new(ManagerConfig::default());
        let stats = manager.stats();
        assert!(stats.running);
        assert!(!stats.paused);
        assert_eq!(stats.total_queued(), 0);
        assert_eq!(stats.workers, 0);
    }

    #[test]
    fn test_restart_while_running_is_an_error() {
        let manager = JobManager::new(ManagerConfig::default());
        assert!(matches!(
            manager.restart(),
            Err(JobManagerError::AlreadyRunning)
        ));
    }

    #[test]
    fn test_paused_jobs_stay_queued() {
        let manager = JobManager::new(ManagerConfig::default());
        manager.pause_jobs();
        manager
            .add_job(Noop, None, Priority::LowPausable)
            .expect("running manager accepts jobs");

        std::thread::sleep(Duration::from_millis(50));
        let stats = manager.stats();
        assert_eq!(stats.queued_at(Priority::LowPausable), 1);
        assert_eq!(stats.processing, 0);
        assert!(!manager.is_processing(Priority::LowPausable));

        manager.cancel_jobs();
    }

    #[test]
    fn test_release_hook_dropped_for_unknown_job() {
        let manager = JobManager::new(ManagerConfig::default());
        let called = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = Arc::clone(&called);
        let hook: ReleaseHook = Box::new(move || flag.store(true, std::sync::atomic::Ordering::SeqCst));

        assert!(!manager.cancel_job_then(JobId::new(7).unwrap(), hook));
        assert!(!called.load(std::sync::atomic::Ordering::SeqCst));
        manager.cancel_jobs();
    }
}
