//! Closure-backed jobs.

use super::context::JobContext;
use super::job::{same_job, Job};
use parking_lot::Mutex;

/// Type tag reported by every [`LambdaJob`].
pub const LAMBDA_JOB_TYPE: &str = "lambda";

/// A job that runs a closure once.
///
/// Lambda jobs are only equal to themselves, so two submissions of the same
/// closure are never merged.
pub struct LambdaJob<F> {
    work: Mutex<Option<F>>,
}

impl<F> LambdaJob<F>
where
    F: FnOnce() -> bool + Send + 'static,
{
    /// Wraps `work`. The closure's return value becomes the job's success flag.
    pub fn new(work: F) -> Self {
        Self {
            work: Mutex::new(Some(work)),
        }
    }
}

impl<F> Job for LambdaJob<F>
where
    F: FnOnce() -> bool + Send + 'static,
{
    fn do_work(&self, _ctx: &JobContext<'_>) -> bool {
        match self.work.lock().take() {
            Some(work) => work(),
            None => false,
        }
    }

    fn job_type(&self) -> &str {
        LAMBDA_JOB_TYPE
    }

    fn equals(&self, other: &dyn Job) -> bool {
        same_job(self, other)
    }
}

impl<F> std::fmt::Debug for LambdaJob<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LambdaJob")
            .field("pending", &self.work.lock().is_some())
            .finish()
    }
}
