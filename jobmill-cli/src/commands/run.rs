//! `jobmill run`: push a batch of sleep jobs through the scheduler.
//!
//! Jobs go straight to the manager, or through a [`JobQueue`] when
//! `--queue` is given. The command waits for every outcome and prints a
//! summary.

use clap::Args;
use jobmill::config::ConfigFile;
use jobmill::jobs::{
    Job, JobCallback, JobContext, JobId, JobManager, JobOutcome, JobQueue, ManagerConfig,
    MultiplexTelemetrySink, Priority, TelemetryEvent, TelemetrySink, TracingTelemetrySink,
};
use jobmill::logging;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::error::CliError;

/// Step the sleep job checks for cancellation at.
const SLEEP_SLICE: Duration = Duration::from_millis(10);

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Number of jobs to submit
    #[arg(long, default_value_t = 20)]
    jobs: u32,

    /// Priority: low_pausable, low, normal, high or dedicated
    #[arg(long, default_value = "low")]
    priority: String,

    /// How long each job sleeps, in milliseconds
    #[arg(long, default_value_t = 100)]
    work_ms: u64,

    /// Feed jobs through a queue with this many in flight
    #[arg(long)]
    queue: Option<usize>,

    /// Override the shared worker pool size from the config file
    #[arg(long)]
    max_workers: Option<usize>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

/// Synthetic job that sleeps in slices and honours cancellation.
struct SleepJob {
    index: u32,
    duration: Duration,
}

impl Job for SleepJob {
    fn do_work(&self, ctx: &JobContext<'_>) -> bool {
        let slices = (self.duration.as_millis() / SLEEP_SLICE.as_millis()).max(1) as u32;
        for slice in 0..slices {
            if ctx.should_cancel(slice, slices) {
                debug!(job = self.index, "Sleep job cancelled");
                return false;
            }
            std::thread::sleep(SLEEP_SLICE.min(self.duration));
        }
        true
    }

    fn job_type(&self) -> &str {
        "sleep"
    }
}

/// Tracks the largest worker pool seen.
#[derive(Default)]
struct PeakWorkers(AtomicUsize);

impl TelemetrySink for PeakWorkers {
    fn emit(&self, event: TelemetryEvent) {
        if let TelemetryEvent::WorkerSpawned { workers } = event {
            self.0.fetch_max(workers, Ordering::Relaxed);
        }
    }
}

/// Queue listener that forwards outcomes to the waiting command.
struct OutcomeForwarder(mpsc::UnboundedSender<JobOutcome>);

impl JobCallback for OutcomeForwarder {
    fn on_job_complete(&self, id: JobId, success: bool, _job: &dyn Job) {
        let _ = self.0.send(JobOutcome::Completed { id, success });
    }

    fn on_job_abort(&self, id: JobId, _job: &dyn Job) {
        let _ = self.0.send(JobOutcome::Aborted { id });
    }
}

#[derive(Debug, Default)]
struct Summary {
    succeeded: usize,
    failed: usize,
    aborted: usize,
    cancelled: usize,
}

impl Summary {
    fn record(&mut self, outcome: Option<JobOutcome>) {
        match outcome {
            Some(JobOutcome::Completed { success: true, .. }) => self.succeeded += 1,
            Some(JobOutcome::Completed { success: false, .. }) => self.failed += 1,
            Some(JobOutcome::Aborted { .. }) => self.aborted += 1,
            None => self.cancelled += 1,
        }
    }
}

/// Run the workload.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let priority: Priority = args
        .priority
        .parse()
        .map_err(|e| CliError::InvalidArgument(format!("{}", e)))?;
    if args.queue == Some(0) {
        return Err(CliError::InvalidArgument(
            "--queue must be at least 1".to_string(),
        ));
    }

    let config = ConfigFile::load()?;
    let level = if args.debug { "debug" } else { "info" };
    let _logging_guard =
        logging::init_from_settings(&config.logging, level).map_err(CliError::LoggingInit)?;

    let mut manager_config = ManagerConfig::from(&config.manager);
    if let Some(max_workers) = args.max_workers {
        if max_workers == 0 {
            return Err(CliError::InvalidArgument(
                "--max-workers must be at least 1".to_string(),
            ));
        }
        manager_config = manager_config.with_max_workers(max_workers);
    }

    let peak = Arc::new(PeakWorkers::default());
    let telemetry = MultiplexTelemetrySink::new(vec![
        Arc::new(TracingTelemetrySink) as Arc<dyn TelemetrySink>,
        Arc::clone(&peak) as Arc<dyn TelemetrySink>,
    ]);
    let manager = JobManager::with_telemetry(manager_config, Arc::new(telemetry));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    info!(
        jobs = args.jobs,
        priority = %priority,
        work_ms = args.work_ms,
        queue = ?args.queue,
        "Starting workload"
    );

    let started = Instant::now();
    let duration = Duration::from_millis(args.work_ms);
    let summary = match args.queue {
        Some(jobs_at_once) => {
            runtime.block_on(run_queued(&manager, &args, priority, duration, jobs_at_once))
        }
        None => runtime.block_on(run_direct(&manager, &args, priority, duration)),
    };
    let summary = summary?;
    let elapsed = started.elapsed();

    manager.cancel_jobs();

    println!();
    println!("Workload finished");
    println!("  Jobs:         {}", args.jobs);
    println!("  Priority:     {}", priority);
    println!("  Succeeded:    {}", summary.succeeded);
    println!("  Failed:       {}", summary.failed);
    if summary.aborted > 0 || summary.cancelled > 0 {
        println!("  Aborted:      {}", summary.aborted);
        println!("  Cancelled:    {}", summary.cancelled);
    }
    println!("  Elapsed:      {:.2?}", elapsed);
    println!("  Peak workers: {}", peak.0.load(Ordering::Relaxed));
    Ok(())
}

async fn run_direct(
    manager: &JobManager,
    args: &RunArgs,
    priority: Priority,
    duration: Duration,
) -> Result<Summary, CliError> {
    let mut completions = Vec::with_capacity(args.jobs as usize);
    for index in 0..args.jobs {
        completions.push(manager.add_job_notified(SleepJob { index, duration }, priority)?);
    }

    let mut summary = Summary::default();
    for completion in completions {
        summary.record(completion.wait().await);
    }
    Ok(summary)
}

async fn run_queued(
    manager: &JobManager,
    args: &RunArgs,
    priority: Priority,
    duration: Duration,
    jobs_at_once: usize,
) -> Result<Summary, CliError> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let queue = JobQueue::with_listener(
        manager.clone(),
        false,
        jobs_at_once,
        priority,
        Arc::new(OutcomeForwarder(tx)),
    );

    let mut accepted = 0;
    for index in 0..args.jobs {
        if queue.add_job(SleepJob { index, duration }) {
            accepted += 1;
        }
    }

    let mut summary = Summary::default();
    for _ in 0..accepted {
        summary.record(rx.recv().await);
    }
    Ok(summary)
}
