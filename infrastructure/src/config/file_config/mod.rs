//! File-based configuration (`deepcast.toml`)
//!
//! Each TOML section has its own module; [`FileConfig`] is the root that
//! figment extracts into. Conversions to application config structs live
//! next to the section they read from.

mod models;
mod phase;
mod run_loop;
mod storage;
mod tools;
mod validation;

pub use models::FileModelsConfig;
pub use phase::FilePhaseConfig;
pub use run_loop::FileLoopConfig;
pub use storage::{FileLoggingConfig, FileStorageConfig};
pub use tools::{DEFAULT_BRAVE_ENDPOINT, FileToolsConfig};
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};

use deepcast_application::{LoopParams, ModelTiers, ResearchParams};
use serde::{Deserialize, Serialize};

/// Root configuration structure
///
/// # Example
///
/// ```toml
/// [models]
/// planning = "gpt-4.1-mini"
/// final = "gpt-4.1"
///
/// [loop]
/// max_iterations = 25
///
/// [phase]
/// completion_threshold = 80.0
/// min_verified_items = 5
///
/// [storage]
/// database = "deepcast.db"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub models: FileModelsConfig,
    #[serde(rename = "loop")]
    pub run_loop: FileLoopConfig,
    pub phase: FilePhaseConfig,
    pub storage: FileStorageConfig,
    pub logging: FileLoggingConfig,
    pub tools: FileToolsConfig,
}

impl FileConfig {
    /// Collect all configuration issues; an empty list means the config is usable.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.models.validate();
        issues.extend(self.run_loop.validate());
        issues.extend(self.phase.validate());
        if self.storage.database.as_os_str().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyPath {
                    field: "storage.database".to_string(),
                },
                "storage.database cannot be empty",
            ));
        }
        issues
    }

    /// True when [`validate`](Self::validate) reports any [`Severity::Error`].
    pub fn has_errors(&self) -> bool {
        self.validate()
            .iter()
            .any(|issue| issue.severity == Severity::Error)
    }

    pub fn loop_params(&self) -> LoopParams {
        self.run_loop.to_loop_params()
    }

    pub fn model_tiers(&self) -> ModelTiers {
        self.models.to_model_tiers()
    }

    pub fn research_params(&self) -> ResearchParams {
        self.phase.to_research_params()
    }
}
