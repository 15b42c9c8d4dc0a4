//! Research brief lifecycle.
//!
//! A brief moves through [`BriefPhase`]s. Moving out of `InProgress`
//! requires the aggregated [`QualityMetrics`] to clear the
//! [`PhaseThresholds`]; every committed change is a [`PhaseTransition`]
//! recorded alongside an [`AgentEvent`].
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`brief`] | ids, phases, tone, input validation |
//! | [`claims`] | fact-check claims and verdicts |
//! | [`progress`] | raw persisted counts |
//! | [`quality`] | pure aggregation functions |
//! | [`phase_gate`] | transition decision and next actions |
//! | [`cycle`] | research cycle configs and plans |
//! | [`events`] | audit events |

pub mod brief;
pub mod claims;
pub mod cycle;
pub mod events;
pub mod phase_gate;
pub mod progress;
pub mod quality;

pub use brief::{BriefId, BriefPhase, NewBrief, ResearchBrief, Tone};
pub use claims::{ClaimVerification, ExtractedClaim, SourceExcerpt, VerificationDepth};
pub use cycle::{CycleConfig, CyclePlan, CycleType};
pub use events::{AgentEvent, PhaseTransition};
pub use phase_gate::{GateDecision, PhaseThresholds, evaluate, next_actions};
pub use progress::{NewClaim, NewResearchItem, QueryRecord, ResearchProgress};
pub use quality::{
    ContentReliability, CoverageBalance, QualityMetrics, QueryCoverage, QueryPerformance,
    ResearchQuality,
};
