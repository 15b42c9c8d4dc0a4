//! Tool Executor port
//!
//! Defines the [`Tool`] capability and the executor that routes calls to
//! registered tools by name.

use async_trait::async_trait;
use deepcast_domain::tool::{ToolCall, ToolCatalog, ToolDescriptor, ToolError};
use thiserror::Error;

/// Why a tool invocation produced no output.
///
/// The two variants are handled very differently by the planning loop:
/// a `Tool` error is written into the transcript and the loop continues,
/// a `Transport` error aborts the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolInvokeError {
    #[error("{0}")]
    Tool(ToolError),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<ToolError> for ToolInvokeError {
    fn from(err: ToolError) -> Self {
        ToolInvokeError::Tool(err)
    }
}

/// A single capability the model may call.
#[async_trait]
pub trait Tool: Send + Sync {
    fn descriptor(&self) -> &ToolDescriptor;

    /// Run the tool; arguments have already been validated against
    /// [`descriptor`](Tool::descriptor).
    async fn invoke(&self, call: &ToolCall) -> Result<String, ToolInvokeError>;
}

/// Port for tool execution
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Descriptors of all available tools
    fn catalog(&self) -> &ToolCatalog;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.catalog().contains(name)
    }

    /// Get names of all available tools
    fn available_tools(&self) -> Vec<&str> {
        self.catalog().names().collect()
    }

    /// Dispatch a call to the named tool.
    async fn execute(&self, call: &ToolCall) -> Result<String, ToolInvokeError>;
}
