//! Brief management use case.
//!
//! Creating briefs, reporting their status, planning research cycles and
//! recording research counts. Phase changes are delegated to
//! [`PhaseController`].

use crate::config::ResearchParams;
use crate::ports::brief_repository::{BriefRepository, PersistenceError};
use crate::use_cases::phase_controller::{
    AdvanceResult, ORCHESTRATOR_AGENT, PhaseController, PhaseControllerError,
};
use deepcast_domain::ValidationError;
use deepcast_domain::research::events::{BRIEF_CREATED, RESEARCH_CYCLE_STARTED};
use deepcast_domain::research::quality::{query_coverage, query_performance};
use deepcast_domain::research::{
    AgentEvent, BriefId, BriefPhase, CyclePlan, CycleType, NewBrief, NewClaim, NewResearchItem,
    QualityMetrics, QueryCoverage, QueryPerformance, ResearchBrief, ResearchProgress,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Number of audit events included in a status report.
pub const RECENT_EVENTS: usize = 5;

#[derive(Error, Debug)]
pub enum ManageBriefError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Research brief not found")]
    BriefNotFound(BriefId),

    #[error(transparent)]
    Phase(#[from] PhaseControllerError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Raw caller input for [`BriefManager::create`].
#[derive(Debug, Clone)]
pub struct CreateBriefInput {
    pub topic: String,
    pub angle: Option<String>,
    pub tone: String,
    pub target_length_min: i64,
    pub additional_instructions: Option<String>,
}

/// Snapshot returned by [`BriefManager::status`].
#[derive(Debug, Clone, Serialize)]
pub struct BriefStatus {
    pub brief: ResearchBrief,
    pub progress: ResearchProgress,
    pub metrics: QualityMetrics,
    pub coverage: QueryCoverage,
    pub performance: QueryPerformance,
    /// Newest first
    pub recent_events: Vec<AgentEvent>,
}

/// Result of [`BriefManager::start_cycle`].
#[derive(Debug, Clone, Serialize)]
pub struct CycleStart {
    pub plan: CyclePlan,
    /// Set when starting the cycle moved the brief out of Pending
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase_change: Option<AdvanceResult>,
}

/// Use case for brief lifecycle operations other than gating.
pub struct BriefManager {
    repository: Arc<dyn BriefRepository>,
    params: ResearchParams,
}

impl BriefManager {
    pub fn new(repository: Arc<dyn BriefRepository>, params: ResearchParams) -> Self {
        Self { repository, params }
    }

    pub fn phase_controller(&self) -> PhaseController {
        PhaseController::new(self.repository.clone(), self.params.thresholds)
    }

    /// Validate input, persist a Pending brief and log `brief_created`.
    pub fn create(&self, input: CreateBriefInput) -> Result<ResearchBrief, ManageBriefError> {
        let new_brief = NewBrief::validate(
            &input.topic,
            input.angle.as_deref(),
            &input.tone,
            input.target_length_min,
            input.additional_instructions.as_deref(),
        )?;

        let brief = self.repository.create_brief(&new_brief)?;
        self.repository.append_event(
            &AgentEvent::new(
                brief.id,
                ORCHESTRATOR_AGENT,
                BRIEF_CREATED,
                format!("Created research brief for topic: {}", brief.topic),
            )
            .with_payload(json!({
                "topic": brief.topic,
                "angle": brief.angle,
                "tone": brief.tone.as_str(),
                "target_length_min": brief.target_length_min,
            })),
        )?;

        info!(brief_id = brief.id.get(), "Created research brief: {}", brief.topic);
        Ok(brief)
    }

    pub fn status(&self, brief_id: i64) -> Result<BriefStatus, ManageBriefError> {
        let brief = self.load(brief_id)?;
        let progress = self.repository.progress(brief.id)?;
        let queries = self.repository.queries(brief.id)?;
        let recent_events = self.repository.recent_events(brief.id, RECENT_EVENTS)?;

        Ok(BriefStatus {
            metrics: QualityMetrics::from_progress(&progress),
            coverage: query_coverage(queries.iter().map(|q| q.category.as_deref())),
            performance: query_performance(&queries),
            brief,
            progress,
            recent_events,
        })
    }

    /// Plan a research cycle and log `research_cycle_started`.
    ///
    /// Starting the first cycle moves a Pending brief to InProgress.
    pub fn start_cycle(
        &self,
        brief_id: i64,
        cycle_type: &str,
    ) -> Result<CycleStart, ManageBriefError> {
        let cycle_type: CycleType = cycle_type.parse()?;
        let brief = self.load(brief_id)?;
        if brief.status.is_terminal() {
            return Err(PhaseControllerError::Terminal {
                brief_id: brief.id,
                phase: brief.status,
            }
            .into());
        }

        // The cycle event is only logged once the brief has left Pending
        let phase_change = if brief.status == BriefPhase::Pending {
            Some(self.phase_controller().advance(brief_id, false)?)
        } else {
            None
        };

        self.repository.append_event(
            &AgentEvent::new(
                brief.id,
                ORCHESTRATOR_AGENT,
                RESEARCH_CYCLE_STARTED,
                format!("Starting {} research cycle", cycle_type),
            )
            .with_payload(json!({ "cycle_type": cycle_type.as_str() })),
        )?;

        let plan = CyclePlan::new(brief.id, cycle_type, self.params.cycle(cycle_type));
        info!(
            brief_id = brief.id.get(),
            "Planned {} cycle ({} steps, ~{} min)",
            cycle_type,
            plan.steps.len(),
            plan.estimated_duration_min
        );

        Ok(CycleStart { plan, phase_change })
    }

    pub fn record_query(
        &self,
        brief_id: i64,
        query_text: &str,
        category: Option<&str>,
    ) -> Result<i64, ManageBriefError> {
        let brief = self.load(brief_id)?;
        let query_text = query_text.trim();
        if query_text.is_empty() {
            return Err(ValidationError::Missing { field: "query_text" }.into());
        }
        Ok(self.repository.add_query(brief.id, query_text, category)?)
    }

    pub fn complete_query(&self, query_id: i64, results_count: u32) -> Result<(), ManageBriefError> {
        Ok(self.repository.complete_query(query_id, results_count)?)
    }

    pub fn record_item(
        &self,
        brief_id: i64,
        item: &NewResearchItem,
    ) -> Result<i64, ManageBriefError> {
        let brief = self.load(brief_id)?;
        Ok(self.repository.add_item(brief.id, item)?)
    }

    pub fn record_claim(&self, brief_id: i64, claim: &NewClaim) -> Result<i64, ManageBriefError> {
        let brief = self.load(brief_id)?;
        if claim.text.trim().is_empty() {
            return Err(ValidationError::Missing { field: "claim" }.into());
        }
        Ok(self.repository.add_claim(brief.id, claim)?)
    }

    fn load(&self, brief_id: i64) -> Result<ResearchBrief, ManageBriefError> {
        let id = BriefId::new(brief_id)?;
        self.repository
            .get_brief(id)?
            .ok_or(ManageBriefError::BriefNotFound(id))
    }
}
