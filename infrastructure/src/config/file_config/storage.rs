//! Storage and logging configuration from TOML (`[storage]`, `[logging]`)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ```toml
/// [storage]
/// database = "deepcast.db"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// SQLite database file
    pub database: PathBuf,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("deepcast.db"),
        }
    }
}

/// ```toml
/// [logging]
/// conversation_log = "logs/conversation.jsonl"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of planning runs; disabled when unset
    pub conversation_log: Option<PathBuf>,
}
