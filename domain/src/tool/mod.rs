//! Tool domain module
//!
//! Defines how the planning model sees the capabilities it may invoke.
//!
//! ```text
//! ┌────────────────┐    ┌──────────────┐    ┌────────────────────┐
//! │ ToolCatalog    │───▶│ ToolCall     │───▶│ output text        │
//! │ (descriptors)  │    │ (call_id)    │    │ or ToolError text  │
//! └────────────────┘    └──────────────┘    └────────────────────┘
//! ```
//!
//! # Strict schemas
//!
//! Descriptors are exported to the model in strict form: the parameter
//! object is closed (`additionalProperties: false`) and every declared
//! property is listed in `required`. [`DefaultToolValidator`] enforces the
//! same contract on the arguments the model sends back, so a malformed
//! call becomes a recoverable tool error rather than a crash.
//!
//! # Key Types
//!
//! - [`ToolDescriptor`]: name, description, typed parameters
//! - [`ToolCatalog`]: name-keyed registry, sorted iteration
//! - [`ToolCall`]: an invocation request correlated by call id
//! - [`ToolError`]: tool-level failure, fed back to the model
//!
//! The async execution side (`Tool`, `ToolExecutorPort`) lives in the
//! application layer.

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{ParamType, ToolCall, ToolCatalog, ToolCatalogError, ToolDescriptor, ToolParameter};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::ToolError;
