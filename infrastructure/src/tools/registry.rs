//! Tool Registry
//!
//! The [`ToolRegistry`] owns the concrete [`Tool`]s available to a run and
//! implements [`ToolExecutorPort`] by routing each call to the tool with
//! the matching name.
//!
//! # Usage
//!
//! ```ignore
//! use deepcast_infrastructure::tools::{SuggestSearchesTool, ToolRegistry};
//!
//! let registry = ToolRegistry::new().register(SuggestSearchesTool::new())?;
//! assert!(registry.has_tool("suggest_searches"));
//! let output = registry.execute(&call).await?;
//! ```
//!
//! Names are unique: registering a second tool with an existing name is a
//! [`ToolCatalogError::Duplicate`].

use async_trait::async_trait;
use deepcast_application::ports::tool_executor::{Tool, ToolExecutorPort, ToolInvokeError};
use deepcast_domain::tool::{ToolCall, ToolCatalog, ToolCatalogError, ToolError};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Name-keyed registry of tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    catalog: ToolCatalog,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    pub fn register<T: Tool + 'static>(self, tool: T) -> Result<Self, ToolCatalogError> {
        self.register_arc(Arc::new(tool))
    }

    /// Register a tool (Arc version)
    pub fn register_arc(mut self, tool: Arc<dyn Tool>) -> Result<Self, ToolCatalogError> {
        let descriptor = tool.descriptor().clone();
        let name = descriptor.name.clone();
        self.catalog.register(descriptor)?;
        debug!(tool = %name, "Registered tool");
        self.tools.insert(name, tool);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[async_trait]
impl ToolExecutorPort for ToolRegistry {
    fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    async fn execute(&self, call: &ToolCall) -> Result<String, ToolInvokeError> {
        let Some(tool) = self.tools.get(&call.tool_name) else {
            return Err(ToolError::unknown_tool(&call.tool_name).into());
        };

        let start = Instant::now();
        let result = tool.invoke(call).await;
        debug!(
            tool = %call.tool_name,
            call_id = %call.call_id,
            ok = result.is_ok(),
            "Tool finished in {}ms",
            start.elapsed().as_millis()
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepcast_domain::tool::{ToolDescriptor, ToolParameter};

    struct EchoTool {
        descriptor: ToolDescriptor,
    }

    impl EchoTool {
        fn new(name: &str) -> Self {
            Self {
                descriptor: ToolDescriptor::new(name, "Echo the text argument")
                    .with_parameter(ToolParameter::new("text", "Text to echo")),
            }
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn descriptor(&self) -> &ToolDescriptor {
            &self.descriptor
        }

        async fn invoke(&self, call: &ToolCall) -> Result<String, ToolInvokeError> {
            Ok(call.get_string("text").unwrap_or_default().to_string())
        }
    }

    #[tokio::test]
    async fn test_execute_routes_by_name() {
        let registry = ToolRegistry::new()
            .register(EchoTool::new("echo"))
            .unwrap()
            .register(EchoTool::new("shout"))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.available_tools(), vec!["echo", "shout"]);

        let call = ToolCall::new("c1", "shout").with_arg("text", "hi");
        assert_eq!(registry.execute(&call).await.unwrap(), "hi");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_tool_error() {
        let registry = ToolRegistry::new();
        let err = registry
            .execute(&ToolCall::new("c1", "missing"))
            .await
            .unwrap_err();
        match err {
            ToolInvokeError::Tool(e) => {
                assert_eq!(e.code, "NOT_FOUND");
                assert!(e.message.contains("missing"));
            }
            other => panic!("expected tool error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = ToolRegistry::new()
            .register(EchoTool::new("echo"))
            .unwrap()
            .register(EchoTool::new("echo"));
        assert!(matches!(result, Err(ToolCatalogError::Duplicate(name)) if name == "echo"));
    }
}
