//! Awaitable job submission.
//!
//! Bridges the callback interface to async code: [`JobManager::add_job_notified`]
//! returns a [`JobCompletion`] that resolves once the job finishes or is
//! aborted.

use super::callback::JobCallback;
use super::error::JobManagerError;
use super::job::{Job, JobId};
use super::manager::JobManager;
use super::priority::Priority;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::oneshot;

/// How a job submitted with [`JobManager::add_job_notified`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobOutcome {
    /// The job ran; `success` is what `do_work` returned.
    Completed { id: JobId, success: bool },

    /// The manager was shut down before the job could complete.
    Aborted { id: JobId },
}

impl JobOutcome {
    /// Returns the id of the job.
    pub fn id(&self) -> JobId {
        match self {
            Self::Completed { id, .. } | Self::Aborted { id } => *id,
        }
    }

    /// Returns `true` if the job ran and reported success.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { success: true, .. })
    }
}

/// Pending result of a job submitted with [`JobManager::add_job_notified`].
#[derive(Debug)]
pub struct JobCompletion {
    id: JobId,
    rx: oneshot::Receiver<JobOutcome>,
}

impl JobCompletion {
    /// Returns the id the manager assigned (or the id of the job this
    /// submission was merged into).
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Waits for the job to finish.
    ///
    /// Returns `None` if the job was cancelled with
    /// [`JobManager::cancel_job`], since cancelled jobs produce no
    /// notification.
    pub async fn wait(self) -> Option<JobOutcome> {
        self.rx.await.ok()
    }
}

struct CompletionCallback {
    tx: Mutex<Option<oneshot::Sender<JobOutcome>>>,
}

impl CompletionCallback {
    fn send(&self, outcome: JobOutcome) {
        if let Some(tx) = self.tx.lock().take() {
            // The receiver may have been dropped; nobody is waiting then.
            let _ = tx.send(outcome);
        }
    }
}

impl JobCallback for CompletionCallback {
    fn on_job_complete(&self, id: JobId, success: bool, _job: &dyn Job) {
        self.send(JobOutcome::Completed { id, success });
    }

    fn on_job_abort(&self, id: JobId, _job: &dyn Job) {
        self.send(JobOutcome::Aborted { id });
    }
}

impl JobManager {
    /// Queues `job` and returns a future-friendly handle to its outcome.
    ///
    /// # Errors
    ///
    /// [`JobManagerError::NotRunning`] if the manager has been shut down.
    pub fn add_job_notified<J: Job>(
        &self,
        job: J,
        priority: Priority,
    ) -> Result<JobCompletion, JobManagerError> {
        let (tx, rx) = oneshot::channel();
        let callback = Arc::new(CompletionCallback {
            tx: Mutex::new(Some(tx)),
        });
        let id = self.add_job(job, Some(callback), priority)?;
        Ok(JobCompletion { id, rx })
    }
}
