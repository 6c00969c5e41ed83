//! Notification interface for job submitters.

use super::job::{Job, JobId};

/// Receives the outcome of submitted jobs.
///
/// Notifications arrive on worker threads (or on the thread calling
/// [`JobManager::cancel_jobs`](super::JobManager::cancel_jobs) for aborts),
/// never while the manager's lock is held, so implementations may submit or
/// cancel further jobs from inside a notification.
///
/// One callback may be registered on any number of jobs; the `id` argument
/// tells them apart.
pub trait JobCallback: Send + Sync {
    /// The job finished running. `success` is the value returned by
    /// [`Job::do_work`], or `false` if it panicked.
    fn on_job_complete(&self, id: JobId, success: bool, job: &dyn Job);

    /// The job will never complete because the manager was shut down.
    fn on_job_abort(&self, id: JobId, job: &dyn Job) {
        let _ = (id, job);
    }

    /// The job reported progress through
    /// [`JobContext::should_cancel`](super::JobContext::should_cancel).
    fn on_job_progress(&self, id: JobId, progress: u32, total: u32, job: &dyn Job) {
        let _ = (id, progress, total, job);
    }
}
