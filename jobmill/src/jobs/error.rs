//! Job manager errors.

use thiserror::Error;

/// Errors returned by [`JobManager`](super::JobManager) operations.
#[derive(Debug, Error)]
pub enum JobManagerError {
    /// The manager is shut down; the submitted job was dropped.
    #[error("job manager is not running")]
    NotRunning,

    /// `restart` was called on a manager that is already running.
    #[error("job manager is already running; cancel_jobs must be called before restart")]
    AlreadyRunning,

    /// The OS refused to create a worker thread.
    #[error("failed to spawn job worker thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),
}
