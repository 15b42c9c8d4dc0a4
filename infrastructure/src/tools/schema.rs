//! Strict function-tool schema converter.
//!
//! Produces the Responses API function tool format:
//!
//! ```json
//! {
//!   "type": "function",
//!   "name": "search_brave",
//!   "description": "...",
//!   "parameters": { "type": "object", "properties": {...},
//!                   "required": [...], "additionalProperties": false },
//!   "strict": true
//! }
//! ```

use deepcast_application::ports::tool_schema::ToolSchemaPort;
use deepcast_domain::tool::ToolDescriptor;
use serde_json::json;

/// [`ToolSchemaPort`] implementation for strict function calling.
pub struct StrictFunctionSchema;

impl ToolSchemaPort for StrictFunctionSchema {
    fn tool_to_schema(&self, tool: &ToolDescriptor) -> serde_json::Value {
        json!({
            "type": "function",
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.strict_parameters_schema(),
            "strict": true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepcast_domain::tool::{ParamType, ToolCatalog, ToolParameter};

    #[test]
    fn test_tool_to_schema() {
        let tool = ToolDescriptor::new("search_brave", "Search the web")
            .with_parameter(ToolParameter::new("query", "Search query"))
            .with_parameter(
                ToolParameter::new("max_results", "Result count").with_type(ParamType::Integer),
            );

        let schema = StrictFunctionSchema.tool_to_schema(&tool);

        assert_eq!(schema["type"], "function");
        assert_eq!(schema["name"], "search_brave");
        assert_eq!(schema["strict"], true);
        assert_eq!(schema["parameters"]["additionalProperties"], false);
        assert_eq!(schema["parameters"]["properties"]["max_results"]["type"], "integer");
        assert_eq!(
            schema["parameters"]["required"],
            json!(["query", "max_results"])
        );
    }

    #[test]
    fn test_all_tools_schema_sorted() {
        let mut catalog = ToolCatalog::new();
        catalog
            .register(ToolDescriptor::new("scrape_website", "Scrape"))
            .unwrap();
        catalog
            .register(ToolDescriptor::new("search_brave", "Search"))
            .unwrap();

        let tools = StrictFunctionSchema.all_tools_schema(&catalog);
        let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
        assert_eq!(names, vec!["scrape_website", "search_brave"]);
        assert_eq!(tools[0]["parameters"]["required"], json!([]));
    }
}
