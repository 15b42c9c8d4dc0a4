//! Domain layer for deepcast
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tool-calling conversation
//!
//! A planning model is shown a [`ToolCatalog`] and a [`ConversationState`].
//! It answers with free text and [`ToolCall`]s; results are appended to the
//! transcript under the same [`CallId`] until the model stops asking.
//!
//! ## Research briefs
//!
//! A [`ResearchBrief`] advances through [`BriefPhase`]s only when its
//! [`QualityMetrics`] clear the configured [`PhaseThresholds`].
//!
//! ## Response parsing
//!
//! [`parse_response`] recovers JSON from free-form model output.

pub mod conversation;
pub mod core;
pub mod parsing;
pub mod prompt;
pub mod research;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use conversation::{
    AbortReason, CallId, ConversationError, ConversationState, LoopOutcome, LoopPhase, Message,
};
pub use core::{error::ValidationError, string::truncate};
pub use parsing::{ExpectedKind, ParseError, parse_response};
pub use prompt::{FactCheckPromptTemplate, ResearchPromptTemplate};
pub use research::{
    AgentEvent, BriefId, BriefPhase, ClaimVerification, CycleConfig, CyclePlan, CycleType,
    ExtractedClaim, GateDecision, NewBrief, NewClaim, NewResearchItem, PhaseThresholds,
    PhaseTransition, QualityMetrics, ResearchBrief, ResearchProgress, SourceExcerpt, Tone,
    VerificationDepth,
};
pub use session::{ContentBlock, GenerationResponse, StreamEvent};
pub use tool::{
    DefaultToolValidator, ParamType, ToolCall, ToolCatalog, ToolCatalogError, ToolDescriptor,
    ToolError, ToolParameter, ToolValidator,
};
