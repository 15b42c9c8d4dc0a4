//! Persistence port for research briefs.
//!
//! The repository owns brief status. Status only changes through
//! [`BriefRepository::commit_transition`], which is conditional on the
//! stored status still being the observed old phase and writes the audit
//! event in the same transaction.

use deepcast_domain::research::{
    AgentEvent, BriefId, BriefPhase, NewBrief, NewClaim, NewResearchItem, PhaseTransition,
    QueryRecord, ResearchBrief, ResearchProgress, SourceExcerpt,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Research brief {0} not found")]
    BriefNotFound(BriefId),

    #[error("Research query {0} not found")]
    QueryNotFound(i64),

    /// Another writer moved the brief first; nothing was written.
    #[error("Brief {brief_id} is {actual}, expected {expected}")]
    Conflict {
        brief_id: BriefId,
        expected: BriefPhase,
        actual: BriefPhase,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Port for brief, research count and audit log storage.
///
/// Implementations must be safe to share between concurrent runs.
pub trait BriefRepository: Send + Sync {
    fn create_brief(&self, brief: &NewBrief) -> Result<ResearchBrief, PersistenceError>;

    fn get_brief(&self, id: BriefId) -> Result<Option<ResearchBrief>, PersistenceError>;

    /// Current raw counts and scores.
    fn progress(&self, id: BriefId) -> Result<ResearchProgress, PersistenceError>;

    /// Every query recorded for the brief, oldest first.
    fn queries(&self, id: BriefId) -> Result<Vec<QueryRecord>, PersistenceError>;

    /// Record a planned query. Returns its id.
    fn add_query(
        &self,
        id: BriefId,
        query_text: &str,
        category: Option<&str>,
    ) -> Result<i64, PersistenceError>;

    /// Mark a query completed with its result count.
    ///
    /// Idempotent; completion is never reverted, a repeat call only
    /// updates the count.
    fn complete_query(&self, query_id: i64, results_count: u32) -> Result<(), PersistenceError>;

    fn add_item(&self, id: BriefId, item: &NewResearchItem) -> Result<i64, PersistenceError>;

    /// Up to `limit` research items, oldest first.
    fn source_excerpts(&self, id: BriefId, limit: usize)
    -> Result<Vec<SourceExcerpt>, PersistenceError>;

    fn add_claim(&self, id: BriefId, claim: &NewClaim) -> Result<i64, PersistenceError>;

    fn append_event(&self, event: &AgentEvent) -> Result<(), PersistenceError>;

    /// Newest first.
    fn recent_events(&self, id: BriefId, limit: usize)
    -> Result<Vec<AgentEvent>, PersistenceError>;

    /// Atomically set the new status and append `event`.
    ///
    /// Fails with [`PersistenceError::Conflict`] (and writes nothing) if the
    /// stored status is no longer `transition.old_phase`.
    fn commit_transition(
        &self,
        transition: &PhaseTransition,
        event: &AgentEvent,
    ) -> Result<(), PersistenceError>;
}
