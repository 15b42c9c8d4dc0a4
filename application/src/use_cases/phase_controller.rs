//! Phase controller use case.
//!
//! Moves a research brief between lifecycle phases. Each call reads the
//! current counts, recomputes [`QualityMetrics`], asks the phase gate for a
//! decision and, when it says advance, commits the new status together with
//! its audit event.
//!
//! The commit is conditional on the stored status still matching the phase
//! that was read, so two concurrent advancers cannot both transition.

use crate::ports::brief_repository::{BriefRepository, PersistenceError};
use deepcast_domain::research::{
    BriefId, BriefPhase, GateDecision, PhaseThresholds, PhaseTransition, QualityMetrics,
    ResearchBrief, evaluate, next_actions,
};
use deepcast_domain::ValidationError;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Agent name recorded on lifecycle audit events.
pub const ORCHESTRATOR_AGENT: &str = "podcast_orchestrator";

#[derive(Error, Debug)]
pub enum PhaseControllerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Research brief not found")]
    BriefNotFound(BriefId),

    #[error("Brief {brief_id} is already {phase} and cannot change phase")]
    Terminal { brief_id: BriefId, phase: BriefPhase },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Result of [`PhaseController::advance`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AdvanceResult {
    Advanced {
        brief_id: BriefId,
        old_phase: BriefPhase,
        new_phase: BriefPhase,
        requirements_met: Vec<String>,
        next_actions: Vec<String>,
        metrics: QualityMetrics,
    },
    NotReady {
        brief_id: BriefId,
        current_phase: BriefPhase,
        ready_to_advance: bool,
        /// Shortfall against each threshold; empty for terminal phases
        requirements_met: Vec<String>,
        metrics: QualityMetrics,
    },
}

impl AdvanceResult {
    pub fn phase_changed(&self) -> bool {
        matches!(self, AdvanceResult::Advanced { .. })
    }

    /// Phase the brief is in after the call.
    pub fn phase(&self) -> BriefPhase {
        match self {
            AdvanceResult::Advanced { new_phase, .. } => *new_phase,
            AdvanceResult::NotReady { current_phase, .. } => *current_phase,
        }
    }
}

/// Use case for quality-gated phase transitions.
pub struct PhaseController {
    repository: Arc<dyn BriefRepository>,
    thresholds: PhaseThresholds,
}

impl PhaseController {
    pub fn new(repository: Arc<dyn BriefRepository>, thresholds: PhaseThresholds) -> Self {
        Self {
            repository,
            thresholds,
        }
    }

    /// Attempt to move `brief_id` to its next phase.
    ///
    /// `force` skips the quality thresholds for InProgress → Completed but
    /// never moves a brief out of a terminal phase.
    pub fn advance(&self, brief_id: i64, force: bool) -> Result<AdvanceResult, PhaseControllerError> {
        let brief = self.load(brief_id)?;
        let metrics = QualityMetrics::from_progress(&self.repository.progress(brief.id)?);

        match evaluate(brief.status, &metrics, force, &self.thresholds) {
            GateDecision::Advance {
                next,
                requirements_met,
            } => {
                let transition =
                    PhaseTransition::new(brief.id, brief.status, next, metrics.clone());
                let event = transition.to_event(ORCHESTRATOR_AGENT);
                self.repository.commit_transition(&transition, &event)?;

                info!(
                    brief_id = brief.id.get(),
                    force, "Advanced brief from {} to {}", brief.status, next
                );
                Ok(AdvanceResult::Advanced {
                    brief_id: brief.id,
                    old_phase: brief.status,
                    new_phase: next,
                    requirements_met,
                    next_actions: next_actions(next).into_iter().map(String::from).collect(),
                    metrics,
                })
            }
            GateDecision::Hold { shortfall } => {
                debug!(brief_id = brief.id.get(), "Brief not ready to advance");
                Ok(AdvanceResult::NotReady {
                    brief_id: brief.id,
                    current_phase: brief.status,
                    ready_to_advance: false,
                    requirements_met: shortfall,
                    metrics,
                })
            }
            GateDecision::Terminal => {
                debug!(brief_id = brief.id.get(), "Brief is {}; nothing to advance", brief.status);
                Ok(AdvanceResult::NotReady {
                    brief_id: brief.id,
                    current_phase: brief.status,
                    ready_to_advance: false,
                    requirements_met: Vec::new(),
                    metrics,
                })
            }
        }
    }

    /// Mark a non-terminal brief as failed.
    pub fn fail(&self, brief_id: i64, reason: &str) -> Result<PhaseTransition, PhaseControllerError> {
        let brief = self.load(brief_id)?;
        if brief.status.is_terminal() {
            return Err(PhaseControllerError::Terminal {
                brief_id: brief.id,
                phase: brief.status,
            });
        }

        let metrics = QualityMetrics::from_progress(&self.repository.progress(brief.id)?);
        let transition = PhaseTransition::new(brief.id, brief.status, BriefPhase::Failed, metrics)
            .with_reason(reason.trim());
        let event = transition.to_event(ORCHESTRATOR_AGENT);
        self.repository.commit_transition(&transition, &event)?;

        info!(brief_id = brief.id.get(), "Marked brief failed: {}", reason);
        Ok(transition)
    }

    fn load(&self, brief_id: i64) -> Result<ResearchBrief, PhaseControllerError> {
        let id = BriefId::new(brief_id)?;
        self.repository
            .get_brief(id)?
            .ok_or(PhaseControllerError::BriefNotFound(id))
    }
}
