//! Telemetry for job scheduling observability.
//!
//! The manager emits structured events through a sink and does not care how
//! they are consumed. Logging, metrics and test recorders are all just sinks.
//!
//! # Example
//!
//! ```
//! use jobmill::jobs::{TelemetryEvent, TelemetrySink};
//!
//! struct LoggingSink;
//!
//! impl TelemetrySink for LoggingSink {
//!     fn emit(&self, event: TelemetryEvent) {
//!         tracing::info!(event = event.event_type(), "Scheduler event");
//!     }
//! }
//! ```

use super::job::JobId;
use super::priority::Priority;
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Telemetry Events
// =============================================================================

/// Events emitted by the job manager.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelemetryEvent {
    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------
    /// A new work item was queued.
    JobQueued {
        job_id: JobId,
        job_type: String,
        priority: Priority,
        queue_depth: usize,
    },

    /// A submission matched existing work and was merged into it.
    JobDeduplicated { job_id: JobId, job_type: String },

    /// A submission arrived while the manager was stopped.
    JobRejected { job_type: String },

    // -------------------------------------------------------------------------
    // Execution
    // -------------------------------------------------------------------------
    /// A worker claimed a job.
    JobStarted {
        job_id: JobId,
        priority: Priority,
        wait_time: Duration,
    },

    /// A job's `do_work` returned.
    JobFinished {
        job_id: JobId,
        success: bool,
        duration: Duration,
        callbacks: usize,
    },

    /// A job was cancelled individually.
    JobCancelled { job_id: JobId, was_running: bool },

    /// A job was aborted by a manager-wide shutdown.
    JobAborted { job_id: JobId },

    // -------------------------------------------------------------------------
    // Worker Pool
    // -------------------------------------------------------------------------
    /// A worker thread was started.
    WorkerSpawned { workers: usize },

    /// An idle worker thread exited.
    WorkerRetired { workers: usize },

    // -------------------------------------------------------------------------
    // Pausable Tier
    // -------------------------------------------------------------------------
    /// The pausable tier was suspended.
    Paused,

    /// The pausable tier was resumed.
    Resumed,
}

impl TelemetryEvent {
    /// Returns the job ID associated with this event, if any.
    pub fn job_id(&self) -> Option<JobId> {
        match self {
            Self::JobQueued { job_id, .. }
            | Self::JobDeduplicated { job_id, .. }
            | Self::JobStarted { job_id, .. }
            | Self::JobFinished { job_id, .. }
            | Self::JobCancelled { job_id, .. }
            | Self::JobAborted { job_id } => Some(*job_id),
            Self::JobRejected { .. }
            | Self::WorkerSpawned { .. }
            | Self::WorkerRetired { .. }
            | Self::Paused
            | Self::Resumed => None,
        }
    }

    /// Returns a short name for this event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::JobQueued { .. } => "job_queued",
            Self::JobDeduplicated { .. } => "job_deduplicated",
            Self::JobRejected { .. } => "job_rejected",
            Self::JobStarted { .. } => "job_started",
            Self::JobFinished { .. } => "job_finished",
            Self::JobCancelled { .. } => "job_cancelled",
            Self::JobAborted { .. } => "job_aborted",
            Self::WorkerSpawned { .. } => "worker_spawned",
            Self::WorkerRetired { .. } => "worker_retired",
            Self::Paused => "paused",
            Self::Resumed => "resumed",
        }
    }
}

// =============================================================================
// Telemetry Sink Trait
// =============================================================================

/// Sink for telemetry events.
///
/// Events are emitted from submitting threads and worker threads alike,
/// sometimes while the manager lock is held. Implementations must be fast
/// and must not call back into the manager.
pub trait TelemetrySink: Send + Sync {
    /// Called when a telemetry event occurs.
    fn emit(&self, event: TelemetryEvent);
}

/// No-op sink for when telemetry is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTelemetrySink;

impl TelemetrySink for NullTelemetrySink {
    fn emit(&self, _event: TelemetryEvent) {}
}

/// Sink that logs events using the `tracing` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetrySink;

impl TelemetrySink for TracingTelemetrySink {
    fn emit(&self, event: TelemetryEvent) {
        match &event {
            TelemetryEvent::JobQueued {
                job_id,
                job_type,
                priority,
                queue_depth,
            } => {
                tracing::trace!(
                    job_id = %job_id,
                    job_type = %job_type,
                    priority = %priority,
                    queue_depth = queue_depth,
                    "Job queued"
                );
            }
            TelemetryEvent::JobDeduplicated { job_id, job_type } => {
                tracing::debug!(job_id = %job_id, job_type = %job_type, "Job merged into existing work");
            }
            TelemetryEvent::JobRejected { job_type } => {
                tracing::debug!(job_type = %job_type, "Job rejected, manager not running");
            }
            TelemetryEvent::JobStarted {
                job_id,
                priority,
                wait_time,
            } => {
                tracing::trace!(
                    job_id = %job_id,
                    priority = %priority,
                    wait_time_ms = wait_time.as_millis(),
                    "Job started"
                );
            }
            TelemetryEvent::JobFinished {
                job_id,
                success,
                duration,
                callbacks,
            } => {
                tracing::debug!(
                    job_id = %job_id,
                    success = success,
                    duration_ms = duration.as_millis(),
                    callbacks = callbacks,
                    "Job finished"
                );
            }
            TelemetryEvent::JobCancelled {
                job_id,
                was_running,
            } => {
                tracing::debug!(job_id = %job_id, was_running = was_running, "Job cancelled");
            }
            TelemetryEvent::JobAborted { job_id } => {
                tracing::debug!(job_id = %job_id, "Job aborted");
            }
            TelemetryEvent::WorkerSpawned { workers } => {
                tracing::trace!(workers = workers, "Worker spawned");
            }
            TelemetryEvent::WorkerRetired { workers } => {
                tracing::trace!(workers = workers, "Worker retired");
            }
            TelemetryEvent::Paused => tracing::debug!("Pausable jobs suspended"),
            TelemetryEvent::Resumed => tracing::debug!("Pausable jobs resumed"),
        }
    }
}

/// Sink that forwards events to multiple sinks.
pub struct MultiplexTelemetrySink {
    sinks: Vec<Arc<dyn TelemetrySink>>,
}

impl MultiplexTelemetrySink {
    /// Creates a new multiplex sink with the given sinks.
    pub fn new(sinks: Vec<Arc<dyn TelemetrySink>>) -> Self {
        Self { sinks }
    }

    /// Adds a sink to the multiplex.
    pub fn add_sink(&mut self, sink: Arc<dyn TelemetrySink>) {
        self.sinks.push(sink);
    }
}

impl TelemetrySink for MultiplexTelemetrySink {
    fn emit(&self, event: TelemetryEvent) {
        for sink in &self.sinks {
            sink.emit(event.clone());
        }
    }
}

impl std::fmt::Debug for MultiplexTelemetrySink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiplexTelemetrySink")
            .field("sink_count", &self.sinks.len())
            .finish()
    }
}
