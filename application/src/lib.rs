//! Application layer for deepcast
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{LoopParams, ModelTiers, ResearchParams};
pub use ports::{
    brief_repository::{BriefRepository, PersistenceError},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    generation::{
        GatewayError, GenerationGateway, GenerationRequest, ModelTier, StreamHandle, ToolChoice,
    },
    progress::{LoopProgressNotifier, NoLoopProgress},
    tool_executor::{Tool, ToolExecutorPort, ToolInvokeError},
    tool_schema::ToolSchemaPort,
};
pub use use_cases::check_claims::{CheckClaimsError, ClaimCheckReport, ClaimChecker};
pub use use_cases::final_synthesis::FinalSynthesizer;
pub use use_cases::manage_brief::{
    BriefManager, BriefStatus, CreateBriefInput, CycleStart, ManageBriefError,
};
pub use use_cases::phase_controller::{AdvanceResult, PhaseController, PhaseControllerError};
pub use use_cases::planning_loop::{PlanningEnd, PlanningLoop, PlanningRun};
pub use use_cases::run_research::{RunResearchError, RunResearchInput, RunResearchUseCase};
