//! Configuration file support for `~/.jobmill/config.ini`.
//!
//! # Example
//!
//! ```no_run
//! use jobmill::config::ConfigFile;
//! use jobmill::jobs::{JobManager, ManagerConfig};
//!
//! let config = ConfigFile::load()?;
//! let manager = JobManager::new(ManagerConfig::from(&config.manager));
//! # Ok::<(), jobmill::config::ConfigFileError>(())
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{DEFAULT_LOG_DIRECTORY, DEFAULT_LOG_FILE};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, LoggingSettings, ManagerSettings};
