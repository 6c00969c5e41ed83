//! jobmill - priority job scheduling on a self-managing thread pool.
//!
//! Submit units of work with a [`Priority`](jobs::Priority), get notified
//! through a [`JobCallback`](jobs::JobCallback) when they finish, and let the
//! [`JobManager`](jobs::JobManager) size its worker pool to the load.
//!
//! ```no_run
//! use jobmill::jobs::{JobManager, ManagerConfig, Priority};
//!
//! let manager = JobManager::new(ManagerConfig::default());
//! manager.submit(|| println!("background work"), None, Priority::Low)?;
//! manager.cancel_jobs();
//! # Ok::<(), jobmill::jobs::JobManagerError>(())
//! ```

pub mod config;
pub mod jobs;
pub mod logging;

/// Version of the jobmill library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
