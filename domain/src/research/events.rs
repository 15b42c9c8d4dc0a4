//! Audit events and phase transitions.

use super::brief::{BriefId, BriefPhase};
use super::quality::QualityMetrics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const BRIEF_CREATED: &str = "brief_created";
pub const RESEARCH_CYCLE_STARTED: &str = "research_cycle_started";
pub const PHASE_ADVANCED: &str = "phase_advanced";
pub const PHASE_FAILED: &str = "phase_failed";
pub const CLAIMS_EXTRACTED: &str = "claims_extracted";
pub const CLAIMS_VERIFIED: &str = "claims_verified";

/// One row of the append-only audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEvent {
    pub brief_id: BriefId,
    pub agent_name: String,
    pub event_type: String,
    pub payload: Value,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl AgentEvent {
    pub fn new(
        brief_id: BriefId,
        agent_name: impl Into<String>,
        event_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            brief_id,
            agent_name: agent_name.into(),
            event_type: event_type.into(),
            payload: json!({}),
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}

/// A committed change of brief phase. Never mutated once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub brief_id: BriefId,
    pub old_phase: BriefPhase,
    pub new_phase: BriefPhase,
    pub metrics: QualityMetrics,
    pub at: DateTime<Utc>,
    /// Set for externally driven failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PhaseTransition {
    pub fn new(
        brief_id: BriefId,
        old_phase: BriefPhase,
        new_phase: BriefPhase,
        metrics: QualityMetrics,
    ) -> Self {
        Self {
            brief_id,
            old_phase,
            new_phase,
            metrics,
            at: Utc::now(),
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Audit event recorded in the same transaction as the status change.
    pub fn to_event(&self, agent_name: &str) -> AgentEvent {
        let (event_type, message) = match (&self.reason, self.new_phase) {
            (Some(reason), BriefPhase::Failed) => (
                PHASE_FAILED,
                format!("Marked failed from {}: {}", self.old_phase, reason),
            ),
            _ => (
                PHASE_ADVANCED,
                format!("Advanced from {} to {}", self.old_phase, self.new_phase),
            ),
        };

        let mut payload = json!({
            "old_status": self.old_phase.as_str(),
            "new_status": self.new_phase.as_str(),
            "progress_metrics": self.metrics,
        });
        if let Some(reason) = &self.reason {
            payload["reason"] = json!(reason);
        }

        AgentEvent {
            brief_id: self.brief_id,
            agent_name: agent_name.to_string(),
            event_type: event_type.to_string(),
            payload,
            message,
            created_at: self.at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::progress::ResearchProgress;

    fn metrics() -> QualityMetrics {
        QualityMetrics::from_progress(&ResearchProgress {
            total_queries: 10,
            completed_queries: 9,
            verified_items: 6,
            ..Default::default()
        })
    }

    #[test]
    fn test_transition_event_carries_snapshot() {
        let id = BriefId::new(3).unwrap();
        let transition =
            PhaseTransition::new(id, BriefPhase::InProgress, BriefPhase::Completed, metrics());
        let event = transition.to_event("orchestrator");

        assert_eq!(event.event_type, PHASE_ADVANCED);
        assert_eq!(event.message, "Advanced from in_progress to completed");
        assert_eq!(event.payload["old_status"], "in_progress");
        assert_eq!(event.payload["new_status"], "completed");
        assert_eq!(event.payload["progress_metrics"]["verified_items"], 6);
        assert_eq!(event.created_at, transition.at);
    }

    #[test]
    fn test_failure_event() {
        let id = BriefId::new(3).unwrap();
        let event = PhaseTransition::new(id, BriefPhase::Pending, BriefPhase::Failed, metrics())
            .with_reason("source API quota exhausted")
            .to_event("orchestrator");

        assert_eq!(event.event_type, PHASE_FAILED);
        assert!(event.message.contains("quota"));
        assert_eq!(event.payload["reason"], "source API quota exhausted");
    }
}
