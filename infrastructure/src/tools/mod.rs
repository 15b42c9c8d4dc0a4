//! Tool implementations for research runs
//!
//! | Tool | Module | Notes |
//! |------|--------|-------|
//! | `suggest_searches` | [`suggest`] | Pure, always available |
//! | `search_brave` | [`web`] | Registered only when a Brave API key is set |
//! | `scrape_website` | [`web`] | Requires the `web-tools` feature |
//!
//! [`research_tools`] assembles the registry a run uses;
//! [`StrictFunctionSchema`] exports it to the model.

pub mod suggest;
pub mod web;

mod registry;
mod schema;

pub use registry::ToolRegistry;
pub use schema::StrictFunctionSchema;
pub use suggest::{SUGGEST_SEARCHES, SuggestSearchesTool};
pub use web::{BraveSearchTool, SEARCH_BRAVE};
#[cfg(feature = "web-tools")]
pub use web::{SCRAPE_WEBSITE, ScrapeWebsiteTool};

use crate::config::FileToolsConfig;
use deepcast_domain::tool::ToolCatalogError;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ToolSetupError {
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Catalog(#[from] ToolCatalogError),
}

/// Build the registry of research tools.
///
/// `brave_api_key` usually comes from `BRAVE_API_KEY`; without it the
/// search tool is left out and the model only sees the others.
pub fn research_tools(
    config: &FileToolsConfig,
    brave_api_key: Option<&str>,
) -> Result<ToolRegistry, ToolSetupError> {
    let client = web::http_client(config.http_timeout())?;
    let mut registry = ToolRegistry::new().register(SuggestSearchesTool::new())?;

    match brave_api_key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => {
            registry = registry.register(BraveSearchTool::new(
                client.clone(),
                config.brave_endpoint.clone(),
                key,
            ))?;
        }
        None => warn!("BRAVE_API_KEY is not set; search_brave is disabled"),
    }

    #[cfg(feature = "web-tools")]
    {
        registry = registry.register(ScrapeWebsiteTool::new(client))?;
    }
    #[cfg(not(feature = "web-tools"))]
    drop(client);

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepcast_application::ports::tool_executor::ToolExecutorPort;

    #[test]
    fn test_research_tools_with_key() {
        let registry = research_tools(&FileToolsConfig::default(), Some("key")).unwrap();
        assert!(registry.has_tool(SUGGEST_SEARCHES));
        assert!(registry.has_tool(SEARCH_BRAVE));
        #[cfg(feature = "web-tools")]
        assert!(registry.has_tool(SCRAPE_WEBSITE));
    }

    #[test]
    fn test_research_tools_without_key() {
        let registry = research_tools(&FileToolsConfig::default(), Some("  ")).unwrap();
        assert!(!registry.has_tool(SEARCH_BRAVE));
        assert!(registry.has_tool(SUGGEST_SEARCHES));
    }
}
