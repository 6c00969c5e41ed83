//! Bounded job queue layered on a [`JobManager`].
//!
//! A [`JobQueue`] holds its own backlog and feeds at most `jobs_at_once` of
//! it to the manager at a time. It deduplicates against both its backlog and
//! its in-flight jobs, so repeated requests for the same work collapse into
//! one.

use super::callback::JobCallback;
use super::job::{Job, JobId};
use super::manager::JobManager;
use super::priority::Priority;
use super::work_item::ReleaseHook;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

/// Throttled submission queue.
///
/// In FIFO mode jobs start in the order they were added; in LIFO mode the
/// most recently added job starts first. Dropping the queue cancels
/// everything it still owns.
pub struct JobQueue {
    shared: Arc<QueueShared>,
}

struct QueueShared {
    /// Handed to the manager as the callback for every submitted job.
    this: Weak<QueueShared>,
    manager: JobManager,
    state: Mutex<QueueState>,
    lifo: bool,
    jobs_at_once: usize,
    priority: Priority,
    listener: Option<Arc<dyn JobCallback>>,
}

#[derive(Default)]
struct QueueState {
    /// Next job to submit is at the back.
    pending: VecDeque<Arc<dyn Job>>,
    processing: Vec<(JobId, Arc<dyn Job>)>,
    /// Cancelled jobs the manager is still running. Each keeps its slot.
    draining: Vec<JobId>,
}

impl QueueState {
    fn occupied(&self) -> usize {
        self.processing.len() + self.draining.len()
    }
}

impl JobQueue {
    /// Creates a queue submitting to `manager` at `priority`.
    ///
    /// `jobs_at_once` is clamped to at least one.
    pub fn new(manager: JobManager, lifo: bool, jobs_at_once: usize, priority: Priority) -> Self {
        Self::build(manager, lifo, jobs_at_once, priority, None)
    }

    /// Like [`new`](Self::new), but every outcome is also reported to
    /// `listener` before the queue moves on to its next job.
    pub fn with_listener(
        manager: JobManager,
        lifo: bool,
        jobs_at_once: usize,
        priority: Priority,
        listener: Arc<dyn JobCallback>,
    ) -> Self {
        Self::build(manager, lifo, jobs_at_once, priority, Some(listener))
    }

    fn build(
        manager: JobManager,
        lifo: bool,
        jobs_at_once: usize,
        priority: Priority,
        listener: Option<Arc<dyn JobCallback>>,
    ) -> Self {
        Self {
            shared: Arc::new_cyclic(|this| QueueShared {
                this: this.clone(),
                manager,
                state: Mutex::new(QueueState::default()),
                lifo,
                jobs_at_once: jobs_at_once.max(1),
                priority,
                listener,
            }),
        }
    }

    /// Adds a job to the queue.
    ///
    /// Returns `false` (and drops `job`) if an equal job is already waiting
    /// or running.
    pub fn add_job<J: Job>(&self, job: J) -> bool {
        self.shared.add_job(Arc::new(job))
    }

    /// Adds an already boxed job. See [`add_job`](Self::add_job).
    pub fn add_boxed_job(&self, job: Box<dyn Job>) -> bool {
        self.shared.add_job(Arc::from(job))
    }

    /// Removes a job equal to `job` from the queue.
    ///
    /// A waiting job is dropped. A running job is cancelled at the manager;
    /// its slot goes to the next waiting job once the manager has let go of
    /// it, so a job that ignores [`JobContext::should_cancel`] still counts
    /// against `jobs_at_once` until `do_work` returns.
    ///
    /// Jobs are matched with [`Job::equals`]. A [`LambdaJob`] is only equal
    /// to itself and is owned by the queue once added, so it cannot be
    /// cancelled on its own; use [`cancel_jobs`](Self::cancel_jobs).
    ///
    /// [`JobContext::should_cancel`]: super::JobContext::should_cancel
    /// [`LambdaJob`]: super::LambdaJob
    pub fn cancel_job(&self, job: &dyn Job) {
        self.shared.cancel_job(job);
    }

    /// Drops every waiting job and cancels every running one.
    pub fn cancel_jobs(&self) {
        self.shared.cancel_jobs();
    }

    /// Returns `true` if the manager is running and this queue has jobs
    /// waiting or in flight.
    pub fn is_processing(&self) -> bool {
        if !self.shared.manager.is_running() {
            return false;
        }
        let state = self.shared.state.lock();
        !state.pending.is_empty() || !state.processing.is_empty()
    }

    /// Returns `true` if no job is waiting to be submitted.
    pub fn queue_empty(&self) -> bool {
        self.shared.state.lock().pending.is_empty()
    }

    /// Returns the number of jobs submitted to the manager and not yet
    /// finished, counting cancelled jobs that are still running.
    pub fn in_flight(&self) -> usize {
        self.shared.state.lock().occupied()
    }

    /// Returns the number of jobs waiting to be submitted.
    pub fn pending(&self) -> usize {
        self.shared.state.lock().pending.len()
    }

    /// Returns the priority jobs are submitted at.
    pub fn priority(&self) -> Priority {
        self.shared.priority
    }
}

impl Drop for JobQueue {
    fn drop(&mut self) {
        self.shared.cancel_jobs();
    }
}

impl std::fmt::Debug for JobQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("JobQueue")
            .field("lifo", &self.shared.lifo)
            .field("jobs_at_once", &self.shared.jobs_at_once)
            .field("priority", &self.shared.priority)
            .field("pending", &state.pending.len())
            .field("processing", &state.processing.len())
            .field("draining", &state.draining.len())
            .finish()
    }
}

impl QueueShared {
    fn add_job(&self, job: Arc<dyn Job>) -> bool {
        let mut state = self.state.lock();
        let duplicate = state
            .pending
            .iter()
            .chain(state.processing.iter().map(|(_, running)| running))
            .any(|queued| queued.equals(job.as_ref()));
        if duplicate {
            drop(state);
            debug!(job_type = %job.job_type(), "Job already queued, ignoring");
            return false;
        }

        if self.lifo {
            state.pending.push_back(job);
        } else {
            state.pending.push_front(job);
        }
        self.queue_next_job(&mut state);
        true
    }

    /// Tops the manager up to `jobs_at_once` in-flight jobs.
    fn queue_next_job(&self, state: &mut QueueState) {
        // Only fails while the queue itself is being dropped.
        let Some(this) = self.this.upgrade() else {
            return;
        };
        while state.occupied() < self.jobs_at_once {
            let Some(job) = state.pending.pop_back() else {
                return;
            };
            let callback: Arc<dyn JobCallback> = Arc::clone(&this) as Arc<dyn JobCallback>;
            match self
                .manager
                .add_shared_job(Arc::clone(&job), Some(callback), self.priority)
            {
                Ok(id) => state.processing.push((id, job)),
                Err(e) => {
                    warn!(job_type = %job.job_type(), error = %e, "Dropping queued job");
                }
            }
        }
    }

    fn cancel_job(&self, job: &dyn Job) {
        let mut state = self.state.lock();
        if let Some(pos) = state
            .processing
            .iter()
            .position(|(_, queued)| queued.equals(job))
        {
            let (id, _) = state.processing.remove(pos);
            if self.cancel_in_flight(&mut state, id) {
                debug!(job_id = %id, "Cancelled job still running, holding its slot");
            } else {
                self.queue_next_job(&mut state);
            }
            return;
        }

        if let Some(pos) = state.pending.iter().position(|queued| queued.equals(job)) {
            state.pending.remove(pos);
        }
    }

    fn cancel_jobs(&self) {
        let mut state = self.state.lock();
        state.pending.clear();
        let running: Vec<JobId> = state.processing.drain(..).map(|(id, _)| id).collect();
        for id in running {
            self.cancel_in_flight(&mut state, id);
        }
    }

    /// Cancels a submitted job at the manager. Returns `true` if it is still
    /// running, in which case it stays in `draining` until released.
    fn cancel_in_flight(&self, state: &mut QueueState, id: JobId) -> bool {
        let this = self.this.clone();
        let release: ReleaseHook = Box::new(move || {
            if let Some(queue) = this.upgrade() {
                queue.release(id);
            }
        });
        let running = self.manager.cancel_job_then(id, release);
        if running {
            state.draining.push(id);
        }
        running
    }

    /// Frees the slot of a cancelled job the manager has dropped.
    fn release(&self, id: JobId) {
        let mut state = self.state.lock();
        if let Some(pos) = state.draining.iter().position(|draining| *draining == id) {
            state.draining.remove(pos);
        }
        self.queue_next_job(&mut state);
    }

    /// Forgets job `id` and submits the next waiting job.
    fn finish(&self, id: JobId) {
        let mut state = self.state.lock();
        if let Some(pos) = state.processing.iter().position(|(queued, _)| *queued == id) {
            state.processing.remove(pos);
        }
        self.queue_next_job(&mut state);
    }
}

impl JobCallback for QueueShared {
    fn on_job_complete(&self, id: JobId, success: bool, job: &dyn Job) {
        if let Some(listener) = &self.listener {
            listener.on_job_complete(id, success, job);
        }
        self.finish(id);
    }

    fn on_job_abort(&self, id: JobId, job: &dyn Job) {
        if let Some(listener) = &self.listener {
            listener.on_job_abort(id, job);
        }
        self.finish(id);
    }

    fn on_job_progress(&self, id: JobId, progress: u32, total: u32, job: &dyn Job) {
        if let Some(listener) = &self.listener {
            listener.on_job_progress(id, progress, total, job);
        }
    }
}
