//! Structured model responses.
//!
//! A planning step answers with a mix of free text and tool call requests.
//! The provider assigns each tool call its id and the arguments arrive as
//! a JSON object.

use crate::tool::entities::ToolCall;

/// A single block of content within a model response.
///
/// # Examples
///
/// ```
/// use deepcast_domain::session::response::ContentBlock;
/// use deepcast_domain::tool::ToolCall;
///
/// let text = ContentBlock::Text("Let me search for that.".to_string());
/// assert!(text.as_text().is_some());
///
/// let call = ContentBlock::ToolCall(ToolCall::new("call_1", "search_brave"));
/// assert!(call.as_tool_call().is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    /// Free text from the model.
    Text(String),
    /// A request to invoke a tool.
    ToolCall(ToolCall),
}

impl ContentBlock {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tool_call(&self) -> Option<&ToolCall> {
        match self {
            ContentBlock::ToolCall(call) => Some(call),
            _ => None,
        }
    }
}

/// A structured response from the generation provider.
///
/// # Examples
///
/// ```
/// use deepcast_domain::session::response::{ContentBlock, GenerationResponse};
/// use deepcast_domain::tool::ToolCall;
///
/// let response = GenerationResponse::from_text("Done.");
/// assert!(!response.has_tool_calls());
///
/// let response = GenerationResponse::new(vec![
///     ContentBlock::Text("Searching...".to_string()),
///     ContentBlock::ToolCall(ToolCall::new("call_1", "search_brave").with_arg("query", "rust")),
/// ]);
/// assert_eq!(response.tool_calls().len(), 1);
/// assert_eq!(response.text_content(), "Searching...");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationResponse {
    /// Content blocks in the order the provider returned them.
    pub content: Vec<ContentBlock>,
    /// Model identifier (if returned by the API).
    pub model: Option<String>,
}

impl GenerationResponse {
    pub fn new(content: Vec<ContentBlock>) -> Self {
        Self {
            content,
            model: None,
        }
    }

    /// Create a text-only response.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(vec![ContentBlock::Text(text.into())])
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Concatenate all `Text` content blocks into a single string.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Tool calls in the order they were requested.
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content
            .iter()
            .filter_map(|b| b.as_tool_call().cloned())
            .collect()
    }

    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolCall(_)))
    }
}
