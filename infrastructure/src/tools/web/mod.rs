//! **Web Tools**: `search_brave` and `scrape_website`
//!
//! | Tool | Description | Key Dependency |
//! |------|-------------|----------------|
//! | `search_brave` | Organic results from the Brave Search API | `reqwest` |
//! | `scrape_website` | Fetch a URL, extract readable text from HTML | `reqwest` + `scraper` |
//!
//! `scrape_website` is gated behind the `web-tools` Cargo feature:
//!
//! ```toml
//! # infrastructure/Cargo.toml
//! [features]
//! web-tools = ["dep:scraper"]
//!
//! # cli/Cargo.toml (enabled by default for end users)
//! [features]
//! default = ["web-tools"]
//! web-tools = ["deepcast-infrastructure/web-tools"]
//! ```
//!
//! # Failure classes
//!
//! Non-success HTTP statuses and unparseable bodies are tool-level errors:
//! the model sees them and may try something else. Failing to reach the
//! Brave API at all is a transport error and aborts the run. Unreachable
//! scrape targets stay tool-level, since the URL came from the model.

#[cfg(feature = "web-tools")]
mod scrape;
mod search;

#[cfg(feature = "web-tools")]
pub use scrape::{SCRAPE_WEBSITE, ScrapeWebsiteTool, html_to_text};
pub use search::{BraveSearchTool, SEARCH_BRAVE, SearchResult};

use std::time::Duration;

/// User agent sent by all web tools.
pub const USER_AGENT: &str = concat!("deepcast/", env!("CARGO_PKG_VERSION"), " (research agent)");

/// Shared HTTP client with a per-request timeout.
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}
