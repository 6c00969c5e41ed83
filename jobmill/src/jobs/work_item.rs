//! Manager bookkeeping record for one accepted job.

use super::callback::JobCallback;
use super::job::{Job, JobId};
use super::priority::Priority;
use std::sync::Arc;
use std::time::Instant;

/// Runs once the manager has dropped a cancelled job that was still running.
pub(crate) type ReleaseHook = Box<dyn FnOnce() + Send>;

/// A job together with its id, tier and interested callbacks.
///
/// An empty callback list means nobody wants the result any more: the job is
/// either cancelled or was submitted without a callback.
pub(crate) struct WorkItem {
    pub(crate) id: JobId,
    pub(crate) job: Arc<dyn Job>,
    pub(crate) priority: Priority,
    pub(crate) callbacks: Vec<Arc<dyn JobCallback>>,
    pub(crate) on_release: Vec<ReleaseHook>,
    pub(crate) queued_at: Instant,
}

impl WorkItem {
    pub(crate) fn new(
        id: JobId,
        job: Arc<dyn Job>,
        priority: Priority,
        callback: Option<Arc<dyn JobCallback>>,
    ) -> Self {
        Self {
            id,
            job,
            priority,
            callbacks: callback.into_iter().collect(),
            on_release: Vec::new(),
            queued_at: Instant::now(),
        }
    }

    /// Attaches the callback of a merged duplicate submission.
    pub(crate) fn add_callback(&mut self, callback: Option<Arc<dyn JobCallback>>) {
        if let Some(callback) = callback {
            self.callbacks.push(callback);
        }
    }

    /// Detaches every callback so the job finishes silently.
    pub(crate) fn take_callbacks(&mut self) -> Vec<Arc<dyn JobCallback>> {
        std::mem::take(&mut self.callbacks)
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub(crate) fn matches(&self, job: &dyn Job) -> bool {
        self.job.equals(job)
    }
}

impl std::fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkItem")
            .field("id", &self.id)
            .field("type", &self.job.job_type())
            .field("priority", &self.priority)
            .field("callbacks", &self.callbacks.len())
            .field("on_release", &self.on_release.len())
            .finish()
    }
}
