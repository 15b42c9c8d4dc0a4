//! `search_brave` tool: web search via the Brave Search API.
//!
//! `GET {endpoint}?q=<query>&count=<max_results>` with the
//! `X-Subscription-Token` header. Results are read from `results`, or from
//! `web.results` when the top-level list is absent, and returned as a JSON
//! array of `{title, url, description}`.

use async_trait::async_trait;
use deepcast_application::ports::tool_executor::{Tool, ToolInvokeError};
use deepcast_domain::tool::{ParamType, ToolCall, ToolDescriptor, ToolError, ToolParameter};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Canonical tool name.
pub const SEARCH_BRAVE: &str = "search_brave";

const DEFAULT_MAX_RESULTS: i64 = 10;
/// Brave rejects larger `count` values.
const MAX_RESULTS_LIMIT: i64 = 20;

/// One organic search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
}

impl SearchResult {
    fn from_raw(item: &Value) -> Self {
        let text = |key: &str| item.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            title: text("title"),
            url: text("url"),
            description: text("description")
                .filter(|d| !d.is_empty())
                .or_else(|| text("snippet")),
        }
    }
}

/// Extract up to `max` results from a Brave response body.
fn parse_results(data: &Value, max: usize) -> Vec<SearchResult> {
    let top_level = data
        .get("results")
        .and_then(Value::as_array)
        .filter(|r| !r.is_empty());
    let raw = top_level
        .or_else(|| data.pointer("/web/results").and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or_default();

    raw.iter().take(max).map(SearchResult::from_raw).collect()
}

pub struct BraveSearchTool {
    descriptor: ToolDescriptor,
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl BraveSearchTool {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            descriptor: ToolDescriptor::new(
                SEARCH_BRAVE,
                "Search the web via Brave Search and return organic results with title, url and description.",
            )
            .with_parameter(ToolParameter::new("query", "The search query"))
            .with_parameter(
                ToolParameter::new("max_results", "Number of results to return (1-20)")
                    .with_type(ParamType::Integer),
            ),
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Tool for BraveSearchTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, call: &ToolCall) -> Result<String, ToolInvokeError> {
        let query = call.require_string("query").map_err(ToolError::invalid_argument)?;
        let count = match call.get_i64("max_results") {
            Some(n) if n > 0 => n.min(MAX_RESULTS_LIMIT),
            _ => DEFAULT_MAX_RESULTS,
        };

        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", &self.api_key)
            .query(&[("q", query.to_string()), ("count", count.to_string())])
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ToolInvokeError::Transport(format!("Brave Search unreachable: {}", e))
                } else if e.is_timeout() {
                    ToolError::timeout("search_brave request").into()
                } else {
                    ToolError::execution_failed(format!("Search request failed: {}", e)).into()
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::execution_failed(format!(
                "Search API returned error: {}",
                status
            ))
            .into());
        }

        let data: Value = response.json().await.map_err(|e| {
            ToolError::execution_failed(format!("Failed to parse search results: {}", e))
        })?;

        let results = parse_results(&data, count as usize);
        debug!("search_brave '{}' returned {} results", query, results.len());
        serde_json::to_string(&results)
            .map_err(|e| ToolError::execution_failed(e.to_string()).into())
    }
}
