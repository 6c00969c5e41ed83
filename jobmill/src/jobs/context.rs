//! Execution context handed to a running job.

use super::job::JobId;
use super::manager::Shared;

/// Borrowed view of the manager, valid only while [`Job::do_work`] runs.
///
/// [`Job::do_work`]: super::Job::do_work
pub struct JobContext<'a> {
    shared: &'a Shared,
    id: JobId,
}

impl<'a> JobContext<'a> {
    pub(crate) fn new(shared: &'a Shared, id: JobId) -> Self {
        Self { shared, id }
    }

    /// Returns the id of the running job.
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Reports progress and asks whether the job should stop.
    ///
    /// Progress is forwarded to every callback still interested in the job.
    /// Returns `true` once nobody is waiting for the result any more (the
    /// job was cancelled, or it was submitted without a callback); the job
    /// should then return as soon as it can.
    pub fn should_cancel(&self, progress: u32, total: u32) -> bool {
        self.shared.on_job_progress(self.id, progress, total)
    }

    /// Returns how many callbacks are waiting for this job's result.
    pub fn pending_callback_count(&self) -> usize {
        self.shared.pending_callback_count(self.id)
    }

    /// Returns `true` if more than one submitter is waiting for this job.
    pub fn is_shared(&self) -> bool {
        self.pending_callback_count() > 1
    }
}

impl std::fmt::Debug for JobContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobContext").field("id", &self.id).finish()
    }
}
