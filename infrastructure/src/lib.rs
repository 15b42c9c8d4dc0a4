//! Infrastructure layer for deepcast
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod openai;
pub mod persistence;
pub mod tools;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigLoader, FileConfig, Severity};
pub use logging::JsonlConversationLogger;
pub use openai::{OpenAiError, OpenAiGateway};
pub use persistence::SqliteBriefRepository;
pub use tools::{StrictFunctionSchema, ToolRegistry, ToolSetupError, research_tools};
