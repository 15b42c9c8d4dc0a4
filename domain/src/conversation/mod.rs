//! Conversation transcript for the tool-calling loop.
//!
//! A [`ConversationState`] is owned by exactly one planning run. It is
//! append-only and enforces request/result correlation by [`CallId`].

pub mod message;
pub mod outcome;
pub mod state;

pub use message::{CallId, Message};
pub use outcome::{AbortReason, LoopOutcome, LoopPhase};
pub use state::{ConversationError, ConversationState};
