//! Tool schema conversion port.
//!
//! Separates "which tools exist" (domain [`ToolCatalog`]) from "how to
//! serialize them for the model API" (infrastructure).

use deepcast_domain::tool::{ToolCatalog, ToolDescriptor};

/// Port for converting tool descriptors to the model-facing format.
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single descriptor.
    fn tool_to_schema(&self, tool: &ToolDescriptor) -> serde_json::Value;

    /// Convert every tool in the catalog (sorted by name).
    fn all_tools_schema(&self, catalog: &ToolCatalog) -> Vec<serde_json::Value> {
        catalog.all().map(|t| self.tool_to_schema(t)).collect()
    }
}
