//! CLI command implementations.
//!
//! - [`config`] - Configuration management (path, show, init)
//! - [`run`] - Synthetic workload through the job manager

pub mod config;
pub mod run;
