//! Configuration file loading for deepcast
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DEEPCAST_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./deepcast.toml` or `./.deepcast.toml`
//! 4. Global: `$XDG_CONFIG_HOME/deepcast/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigIssue, ConfigIssueCode, DEFAULT_BRAVE_ENDPOINT, FileConfig, FileLoggingConfig,
    FileLoopConfig, FileModelsConfig, FilePhaseConfig, FileStorageConfig, FileToolsConfig,
    Severity,
};
pub use loader::ConfigLoader;
