//! Planning loop configuration from TOML (`[loop]` section)

use super::validation::{ConfigIssue, ConfigIssueCode};
use deepcast_application::LoopParams;
use deepcast_application::config::loop_params::DEFAULT_MAX_ITERATIONS;
use serde::{Deserialize, Serialize};

/// ```toml
/// [loop]
/// max_iterations = 25
/// timeout_seconds = 0   # 0 = no deadline
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoopConfig {
    pub max_iterations: usize,
    pub timeout_seconds: u64,
}

impl Default for FileLoopConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            timeout_seconds: 0,
        }
    }
}

impl FileLoopConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.max_iterations == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "loop.max_iterations".to_string(),
                },
                "loop.max_iterations must be greater than 0",
            ));
        }
        issues
    }

    pub fn to_loop_params(&self) -> LoopParams {
        LoopParams::default()
            .with_max_iterations(self.max_iterations)
            .with_timeout_seconds(self.timeout_seconds)
    }
}
