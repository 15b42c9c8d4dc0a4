//! `scrape_website` tool: fetch a URL and return its readable text.

use async_trait::async_trait;
use deepcast_application::ports::tool_executor::{Tool, ToolInvokeError};
use deepcast_domain::tool::{ParamType, ToolCall, ToolDescriptor, ToolError, ToolParameter};
use regex::Regex;
use scraper::{ElementRef, Html, Node};
use std::sync::LazyLock;

/// Canonical tool name.
pub const SCRAPE_WEBSITE: &str = "scrape_website";

const DEFAULT_MAX_CHARS: usize = 5000;

/// Elements whose whole subtree is boilerplate.
const SKIP_TAGS: [&str; 7] = ["script", "style", "noscript", "header", "footer", "nav", "aside"];

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Extract readable text from HTML.
///
/// Boilerplate elements are dropped, text nodes are joined with spaces and
/// every whitespace run collapses to a single space.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut parts = Vec::new();
    collect_text(document.root_element(), &mut parts);
    WHITESPACE
        .replace_all(&parts.join(" "), " ")
        .trim()
        .to_string()
}

fn collect_text<'a>(element: ElementRef<'a>, parts: &mut Vec<&'a str>) {
    if SKIP_TAGS.contains(&element.value().name()) {
        return;
    }
    for child in element.children() {
        match child.value() {
            Node::Text(text) => parts.push(text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_text(child, parts);
                }
            }
            _ => {}
        }
    }
}

pub struct ScrapeWebsiteTool {
    descriptor: ToolDescriptor,
    client: reqwest::Client,
}

impl ScrapeWebsiteTool {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            descriptor: ToolDescriptor::new(
                SCRAPE_WEBSITE,
                "Download a web page and return its cleaned text content (scripts, styles and page chrome removed), truncated to max_chars characters.",
            )
            .with_parameter(ToolParameter::new("url", "The URL to fetch"))
            .with_parameter(
                ToolParameter::new("max_chars", "Maximum characters to return (default 5000)")
                    .with_type(ParamType::Integer),
            ),
            client,
        }
    }
}

#[async_trait]
impl Tool for ScrapeWebsiteTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, call: &ToolCall) -> Result<String, ToolInvokeError> {
        let url = call.require_string("url").map_err(ToolError::invalid_argument)?;
        let max_chars = match call.get_i64("max_chars") {
            Some(n) if n > 0 => n as usize,
            _ => DEFAULT_MAX_CHARS,
        };

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ToolError::timeout(format!("fetching {}", url))
            } else {
                ToolError::execution_failed(format!("Failed to fetch URL: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::execution_failed(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ))
            .into());
        }

        let body = response.text().await.map_err(|e| {
            ToolError::execution_failed(format!("Failed to read response body: {}", e))
        })?;

        Ok(html_to_text(&body).chars().take(max_chars).collect())
    }
}
