//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod brief_repository;
pub mod conversation_logger;
pub mod generation;
pub mod progress;
pub mod tool_executor;
pub mod tool_schema;
