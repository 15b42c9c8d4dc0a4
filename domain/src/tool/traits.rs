//! Tool domain traits
//!
//! Contains pure domain logic traits for tool validation.
//! The async execution ports are defined in the application layer.

use super::entities::{ToolCall, ToolDescriptor};
use super::value_objects::ToolError;

/// Validator for tool calls
///
/// This is a pure domain trait that validates tool calls
/// against their descriptors without any I/O operations.
pub trait ToolValidator {
    /// Validate a tool call against its descriptor
    fn validate(&self, call: &ToolCall, descriptor: &ToolDescriptor) -> Result<(), ToolError>;
}

/// Default implementation of ToolValidator
///
/// Enforces the strict schema: every declared parameter present, no
/// undeclared arguments, and each value of the declared JSON type.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, descriptor: &ToolDescriptor) -> Result<(), ToolError> {
        for param in &descriptor.parameters {
            let Some(value) = call.arguments.get(&param.name) else {
                return Err(ToolError::invalid_argument(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    param.name, descriptor.name
                )));
            };

            if !param.param_type.accepts(value) {
                return Err(ToolError::invalid_argument(format!(
                    "Parameter '{}' for tool '{}' must be of type {}",
                    param.name, descriptor.name, param.param_type
                )));
            }

            if let (Some(items), Some(values)) = (param.items, value.as_array())
                && values.iter().any(|v| !items.accepts(v))
            {
                return Err(ToolError::invalid_argument(format!(
                    "Parameter '{}' for tool '{}' must contain only {} items",
                    param.name, descriptor.name, items
                )));
            }
        }

        for arg_name in call.arguments.keys() {
            if descriptor.parameter(arg_name).is_none() {
                return Err(ToolError::invalid_argument(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, descriptor.name
                )));
            }
        }

        Ok(())
    }
}
