//! OpenAI Responses API adapter
//!
//! Implements [`GenerationGateway`](deepcast_application::GenerationGateway)
//! over HTTP, with SSE streaming for text deltas.

pub mod error;
pub mod gateway;
pub mod protocol;

pub use error::OpenAiError;
pub use gateway::OpenAiGateway;
