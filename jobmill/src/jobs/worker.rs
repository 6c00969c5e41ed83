//! Worker threads.
//!
//! Each worker is a detached OS thread that repeatedly asks the manager for
//! the next job, runs it and reports the result. A worker exits once the
//! manager stops or no job arrives within the idle timeout; the manager
//! forgets the worker before it exits.

use super::context::JobContext;
use super::manager::Shared;
use std::any::Any;
use std::cell::Cell;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{error, trace};

thread_local! {
    static IS_WORKER: Cell<bool> = const { Cell::new(false) };
}

/// Returns `true` when called on a job worker thread.
pub(crate) fn is_worker_thread() -> bool {
    IS_WORKER.with(Cell::get)
}

/// Runs `f`, turning a panic into its message.
pub(crate) fn run_guarded<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

pub(crate) struct JobWorker {
    id: usize,
    shared: Arc<Shared>,
}

impl JobWorker {
    /// Starts a worker thread named `job-worker-{id}`.
    pub(crate) fn spawn(shared: Arc<Shared>, id: usize) -> io::Result<()> {
        let worker = Self { id, shared };
        thread::Builder::new()
            .name(format!("job-worker-{}", id))
            .spawn(move || worker.run())?;
        Ok(())
    }

    fn run(self) {
        IS_WORKER.with(|flag| flag.set(true));
        trace!(worker = self.id, "Job worker started");
        self.shared.worker_started();

        while let Some((job_id, job)) = self.shared.get_next_job(self.id) {
            let started = Instant::now();
            let ctx = JobContext::new(&self.shared, job_id);

            let success = match run_guarded(|| job.do_work(&ctx)) {
                Ok(success) => success,
                Err(panic) => {
                    error!(
                        job_id = %job_id,
                        job_type = %job.job_type(),
                        panic = %panic,
                        "Job panicked, reporting failure"
                    );
                    false
                }
            };

            self.shared
                .on_job_complete(job_id, success, job, started.elapsed());
        }

        trace!(worker = self.id, "Job worker exiting");
    }
}
