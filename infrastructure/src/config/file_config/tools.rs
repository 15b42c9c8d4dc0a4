//! Tools configuration from TOML (`[tools]` section)
//!
//! ```toml
//! [tools]
//! brave_endpoint = "https://api.search.brave.com/res/v1/web/search"
//! http_timeout_seconds = 20
//! ```
//!
//! API keys are never read from files; see
//! [`ConfigLoader`](crate::config::ConfigLoader) for the environment variables.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BRAVE_ENDPOINT: &str = "https://api.search.brave.com/res/v1/web/search";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    pub brave_endpoint: String,
    pub http_timeout_seconds: u64,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            brave_endpoint: DEFAULT_BRAVE_ENDPOINT.to_string(),
            http_timeout_seconds: 20,
        }
    }
}

impl FileToolsConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds.max(1))
    }
}
