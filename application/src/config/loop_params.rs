//! Planning loop control parameters.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MAX_ITERATIONS: usize = 25;

/// Bounds for one planning loop run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopParams {
    /// Maximum number of planning calls.
    pub max_iterations: usize,
    /// Wall-clock limit for the whole run; `None` means no deadline.
    pub timeout: Option<Duration>,
}

impl Default for LoopParams {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            timeout: None,
        }
    }
}

impl LoopParams {
    // ==================== Builder Methods ====================

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// `0` disables the deadline.
    pub fn with_timeout_seconds(self, seconds: u64) -> Self {
        let timeout = (seconds > 0).then(|| Duration::from_secs(seconds));
        self.with_timeout(timeout)
    }
}
