//! Priority job scheduling on a pool of worker threads.
//!
//! # Overview
//!
//! - [`JobManager`] owns five priority queues and a worker pool that grows
//!   on demand and shrinks when idle.
//! - [`Job`] is the unit of work. Jobs run on worker threads and may poll
//!   [`JobContext::should_cancel`] to report progress and stop early.
//! - [`JobCallback`] receives completion, abort and progress notifications.
//! - [`JobQueue`] throttles a stream of jobs to a fixed number in flight.
//! - [`LambdaJob`] wraps a closure as a job.
//!
//! # Example
//!
//! ```no_run
//! use jobmill::jobs::{Job, JobContext, JobManager, ManagerConfig, Priority};
//!
//! struct Thumbnail {
//!     path: String,
//! }
//!
//! impl Job for Thumbnail {
//!     fn do_work(&self, ctx: &JobContext<'_>) -> bool {
//!         for step in 0..10 {
//!             if ctx.should_cancel(step, 10) {
//!                 return false;
//!             }
//!         }
//!         true
//!     }
//!
//!     fn job_type(&self) -> &str {
//!         "thumbnail"
//!     }
//!
//!     fn equals(&self, other: &dyn Job) -> bool {
//!         jobmill::jobs::downcast_job::<Thumbnail>(other).is_some_and(|o| o.path == self.path)
//!     }
//! }
//!
//! let manager = JobManager::new(ManagerConfig::default());
//! manager.add_job(Thumbnail { path: "a.jpg".into() }, None, Priority::Low)?;
//! # Ok::<(), jobmill::jobs::JobManagerError>(())
//! ```

mod callback;
mod completion;
mod config;
mod context;
mod error;
mod job;
mod lambda;
mod manager;
mod priority;
mod queue;
mod telemetry;
mod work_item;
mod worker;

pub use callback::JobCallback;
pub use completion::{JobCompletion, JobOutcome};
pub use config::{
    ManagerConfig, DEFAULT_DEDICATED_MAX_WORKERS, DEFAULT_IDLE_TIMEOUT_SECS, DEFAULT_MAX_WORKERS,
};
pub use context::JobContext;
pub use error::JobManagerError;
pub use job::{downcast_job, same_job, AsAny, Job, JobId};
pub use lambda::{LambdaJob, LAMBDA_JOB_TYPE};
pub use manager::{JobManager, ManagerStats};
pub use priority::{ParsePriorityError, Priority};
pub use queue::JobQueue;
pub use telemetry::{
    MultiplexTelemetrySink, NullTelemetrySink, TelemetryEvent, TelemetrySink,
    TracingTelemetrySink,
};
