//! Job trait and identifiers.
//!
//! A job is an opaque unit of deferred work. The manager never looks inside
//! it beyond the few capabilities declared here: running it, asking whether
//! it is the same work as another job, and reading its type tag.
//!
//! # Example
//!
//! ```
//! use jobmill::jobs::{downcast_job, Job, JobContext};
//!
//! struct Thumbnail {
//!     path: String,
//! }
//!
//! impl Job for Thumbnail {
//!     fn do_work(&self, _ctx: &JobContext<'_>) -> bool {
//!         // ... extract the thumbnail ...
//!         true
//!     }
//!
//!     fn job_type(&self) -> &str {
//!         "thumbnail"
//!     }
//!
//!     fn equals(&self, other: &dyn Job) -> bool {
//!         downcast_job::<Thumbnail>(other).is_some_and(|o| o.path == self.path)
//!     }
//! }
//! ```

use super::context::JobContext;
use super::priority::Priority;
use std::any::Any;
use std::fmt;
use std::num::NonZeroU32;

/// Identifier of an accepted job.
///
/// Ids are issued by a single [`JobManager`](super::JobManager), are never
/// zero, and stay unique until the 32-bit counter wraps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(NonZeroU32);

impl JobId {
    /// Creates an id from a raw value, returning `None` for zero.
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    /// Returns the raw numeric value.
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Access to the concrete type behind a `dyn Job`.
///
/// Implemented for every `'static` type; job authors never implement it.
pub trait AsAny: Any {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A unit of asynchronous work.
///
/// Jobs run on a worker thread while callbacks may inspect them from other
/// threads, so `do_work` takes `&self`. Results a callback needs should be
/// kept behind a `Mutex` or atomics inside the job.
///
/// # Lifecycle
///
/// 1. The caller builds the job and hands it to
///    [`JobManager::add_job`](super::JobManager::add_job). Ownership moves
///    to the manager on every outcome, including rejection.
/// 2. A worker claims it and calls [`do_work`](Job::do_work).
/// 3. Every registered callback sees the finished job.
/// 4. The manager drops it.
pub trait Job: AsAny + Send + Sync {
    /// Performs the work. Returns `true` on success.
    ///
    /// Long-running jobs should periodically call
    /// [`JobContext::should_cancel`] and return early when it says so.
    fn do_work(&self, ctx: &JobContext<'_>) -> bool;

    /// Short tag describing what kind of work this is.
    ///
    /// Used by [`JobManager::is_processing_type`](super::JobManager::is_processing_type).
    fn job_type(&self) -> &str {
        "job"
    }

    /// Returns `true` if `other` describes the same logical work.
    ///
    /// Equal jobs are merged: the later submission is dropped and its
    /// callback attached to the earlier one. The default never merges.
    fn equals(&self, other: &dyn Job) -> bool {
        let _ = other;
        false
    }

    /// Preferred tier when submitted via
    /// [`JobManager::submit_job`](super::JobManager::submit_job).
    fn priority(&self) -> Priority {
        Priority::Low
    }
}

/// Returns `job` as a `T` if that is its concrete type.
pub fn downcast_job<T: Job>(job: &dyn Job) -> Option<&T> {
    job.as_any().downcast_ref::<T>()
}

/// Returns `true` if both references point at the same job object.
pub fn same_job(a: &dyn Job, b: &dyn Job) -> bool {
    std::ptr::addr_eq(a as *const dyn Job, b as *const dyn Job)
}

impl fmt::Debug for dyn Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("type", &self.job_type())
            .finish_non_exhaustive()
    }
}
