//! Generation responses and streaming events.
//!
//! - [`response::GenerationResponse`]: free text plus requested tool calls
//! - [`stream::StreamEvent`]: one event of a single-pass response stream

pub mod response;
pub mod stream;

pub use response::{ContentBlock, GenerationResponse};
pub use stream::StreamEvent;
