//! SQLite-backed [`BriefRepository`].
//!
//! One connection behind a `Mutex`; every method is a short synchronous
//! critical section. Phase transitions run in a transaction with a
//! conditional `UPDATE ... WHERE status = <observed>` so concurrent
//! writers cannot both move the same brief.

use super::schema::{ADDED_COLUMNS, COMPLETED, PENDING, SCHEMA, VERIFIED};
use chrono::{DateTime, Utc};
use deepcast_application::ports::brief_repository::{BriefRepository, PersistenceError};
use deepcast_domain::research::{
    AgentEvent, BriefId, BriefPhase, NewBrief, NewClaim, NewResearchItem, PhaseTransition,
    QueryRecord, ResearchBrief, ResearchProgress, SourceExcerpt, Tone,
};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info};

fn storage(err: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::Storage(err.to_string())
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn parse_time(raw: &str) -> Result<DateTime<Utc>, PersistenceError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| storage(format!("invalid timestamp '{}': {}", raw, e)))
}

fn verification(verified: bool) -> &'static str {
    if verified { VERIFIED } else { PENDING }
}

/// Columns of `research_briefs` as stored.
struct BriefRow {
    id: i64,
    topic: String,
    angle: Option<String>,
    tone: String,
    target_length_min: i64,
    additional_instructions: Option<String>,
    status: String,
    created_at: String,
    updated_at: String,
}

impl BriefRow {
    const COLUMNS: &'static str = "id, topic, angle, tone, target_length_min, \
        additional_instructions, status, created_at, updated_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            topic: row.get(1)?,
            angle: row.get(2)?,
            tone: row.get(3)?,
            target_length_min: row.get(4)?,
            additional_instructions: row.get(5)?,
            status: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn into_brief(self) -> Result<ResearchBrief, PersistenceError> {
        Ok(ResearchBrief {
            id: BriefId::new(self.id).map_err(storage)?,
            topic: self.topic,
            angle: self.angle,
            tone: self.tone.parse::<Tone>().map_err(storage)?,
            target_length_min: self.target_length_min,
            additional_instructions: self.additional_instructions,
            status: self.status.parse::<BriefPhase>().map_err(storage)?,
            created_at: parse_time(&self.created_at)?,
            updated_at: parse_time(&self.updated_at)?,
        })
    }
}

pub struct SqliteBriefRepository {
    conn: Mutex<Connection>,
}

impl SqliteBriefRepository {
    /// Open (or create) the database file and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(storage)?;
        }
        let conn = Connection::open(path).map_err(storage)?;
        conn.busy_timeout(Duration::from_secs(5)).map_err(storage)?;
        info!("Opened brief database {}", path.display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        Self::with_connection(Connection::open_in_memory().map_err(storage)?)
    }

    fn with_connection(conn: Connection) -> Result<Self, PersistenceError> {
        conn.execute_batch(SCHEMA).map_err(storage)?;
        Self::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Add columns missing from databases created by older versions.
    fn migrate(conn: &Connection) -> Result<(), PersistenceError> {
        for (table, column, statement) in ADDED_COLUMNS {
            let exists: bool = conn
                .query_row(
                    "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
                    params![table, column],
                    |row| Ok(row.get::<_, i64>(0)? > 0),
                )
                .map_err(storage)?;
            if !exists {
                info!("Migrating database: adding {}.{}", table, column);
                conn.execute(statement, []).map_err(storage)?;
            }
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, PersistenceError> {
        self.conn
            .lock()
            .map_err(|_| storage("database connection mutex poisoned"))
    }

    fn status_of(conn: &Connection, id: BriefId) -> Result<Option<BriefPhase>, PersistenceError> {
        let status: Option<String> = conn
            .query_row(
                "SELECT status FROM research_briefs WHERE id = ?1",
                params![id.get()],
                |row| row.get(0),
            )
            .optional()
            .map_err(storage)?;
        status
            .map(|s| s.parse::<BriefPhase>().map_err(storage))
            .transpose()
    }

    fn require_brief(conn: &Connection, id: BriefId) -> Result<(), PersistenceError> {
        match Self::status_of(conn, id)? {
            Some(_) => Ok(()),
            None => Err(PersistenceError::BriefNotFound(id)),
        }
    }

    /// `(total, matching)` over `table` rows of one brief.
    fn count_where(
        conn: &Connection,
        table: &str,
        predicate: &str,
        id: BriefId,
    ) -> Result<(u32, u32), PersistenceError> {
        let sql = format!(
            "SELECT COUNT(*), COALESCE(SUM({}), 0) FROM {} WHERE brief_id = ?1",
            predicate, table
        );
        conn.query_row(&sql, params![id.get()], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(storage)
    }

    fn scores(
        conn: &Connection,
        column: &str,
        table: &str,
        id: BriefId,
    ) -> Result<Vec<f64>, PersistenceError> {
        let sql = format!("SELECT {} FROM {} WHERE brief_id = ?1 ORDER BY id", column, table);
        let mut stmt = conn.prepare(&sql).map_err(storage)?;
        let rows = stmt
            .query_map(params![id.get()], |row| row.get::<_, f64>(0))
            .map_err(storage)?;
        rows.collect::<rusqlite::Result<Vec<f64>>>().map_err(storage)
    }

    fn insert_event(conn: &Connection, event: &AgentEvent) -> Result<(), PersistenceError> {
        conn.execute(
            "INSERT INTO agent_events (brief_id, agent_name, event_type, payload, message, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                event.brief_id.get(),
                event.agent_name,
                event.event_type,
                event.payload.to_string(),
                event.message,
                event
                    .created_at
                    .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            ],
        )
        .map_err(storage)?;
        Ok(())
    }
}

impl BriefRepository for SqliteBriefRepository {
    fn create_brief(&self, brief: &NewBrief) -> Result<ResearchBrief, PersistenceError> {
        let conn = self.lock()?;
        let ts = now();
        conn.execute(
            "INSERT INTO research_briefs
             (topic, angle, tone, target_length_min, additional_instructions, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                brief.topic,
                brief.angle,
                brief.tone.as_str(),
                brief.target_length_min,
                brief.additional_instructions,
                BriefPhase::Pending.as_str(),
                ts,
            ],
        )
        .map_err(storage)?;

        let id = conn.last_insert_rowid();
        debug!(brief_id = id, "Inserted research brief");
        let created = parse_time(&ts)?;
        Ok(ResearchBrief {
            id: BriefId::new(id).map_err(storage)?,
            topic: brief.topic.clone(),
            angle: brief.angle.clone(),
            tone: brief.tone,
            target_length_min: brief.target_length_min,
            additional_instructions: brief.additional_instructions.clone(),
            status: BriefPhase::Pending,
            created_at: created,
            updated_at: created,
        })
    }

    fn get_brief(&self, id: BriefId) -> Result<Option<ResearchBrief>, PersistenceError> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM research_briefs WHERE id = ?1", BriefRow::COLUMNS);
        conn.query_row(&sql, params![id.get()], BriefRow::from_row)
            .optional()
            .map_err(storage)?
            .map(BriefRow::into_brief)
            .transpose()
    }

    fn progress(&self, id: BriefId) -> Result<ResearchProgress, PersistenceError> {
        let conn = self.lock()?;
        Self::require_brief(&conn, id)?;

        let completed = format!("status = '{}'", COMPLETED);
        let verified = format!("verification_status = '{}'", VERIFIED);
        let (total_queries, completed_queries) =
            Self::count_where(&conn, "research_queries", &completed, id)?;
        let (total_items, verified_items) =
            Self::count_where(&conn, "research_items", &verified, id)?;
        let (total_claims, verified_claims) = Self::count_where(&conn, "claims", &verified, id)?;

        Ok(ResearchProgress {
            total_queries,
            completed_queries,
            total_items,
            verified_items,
            total_claims,
            verified_claims,
            claim_scores: Self::scores(&conn, "veracity_score", "claims", id)?,
            item_credibility: Self::scores(&conn, "credibility_score", "research_items", id)?,
        })
    }

    fn queries(&self, id: BriefId) -> Result<Vec<QueryRecord>, PersistenceError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT query_text, category, status, results_count
                 FROM research_queries WHERE brief_id = ?1 ORDER BY id",
            )
            .map_err(storage)?;
        let rows = stmt
            .query_map(params![id.get()], |row| {
                Ok(QueryRecord {
                    query_text: row.get(0)?,
                    category: row.get(1)?,
                    completed: row.get::<_, String>(2)? == COMPLETED,
                    results_count: row.get(3)?,
                })
            })
            .map_err(storage)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(storage)
    }

    fn add_query(
        &self,
        id: BriefId,
        query_text: &str,
        category: Option<&str>,
    ) -> Result<i64, PersistenceError> {
        let conn = self.lock()?;
        Self::require_brief(&conn, id)?;
        conn.execute(
            "INSERT INTO research_queries (brief_id, query_text, category, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id.get(), query_text, category, PENDING, now()],
        )
        .map_err(storage)?;
        Ok(conn.last_insert_rowid())
    }

    fn complete_query(&self, query_id: i64, results_count: u32) -> Result<(), PersistenceError> {
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE research_queries
                 SET status = ?1, results_count = ?2, completed_at = COALESCE(completed_at, ?3)
                 WHERE id = ?4",
                params![COMPLETED, results_count, now(), query_id],
            )
            .map_err(storage)?;
        if changed == 0 {
            return Err(PersistenceError::QueryNotFound(query_id));
        }
        Ok(())
    }

    fn add_item(&self, id: BriefId, item: &NewResearchItem) -> Result<i64, PersistenceError> {
        let conn = self.lock()?;
        Self::require_brief(&conn, id)?;
        conn.execute(
            "INSERT INTO research_items
             (brief_id, title, url, description, content, credibility_score, verification_status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id.get(),
                item.title,
                item.url,
                item.description,
                item.content,
                item.credibility_score,
                verification(item.verified),
                now(),
            ],
        )
        .map_err(storage)?;
        Ok(conn.last_insert_rowid())
    }

    fn source_excerpts(
        &self,
        id: BriefId,
        limit: usize,
    ) -> Result<Vec<SourceExcerpt>, PersistenceError> {
        let conn = self.lock()?;
        Self::require_brief(&conn, id)?;
        let mut stmt = conn
            .prepare(
                "SELECT title, url, description, content
                 FROM research_items WHERE brief_id = ?1 ORDER BY id LIMIT ?2",
            )
            .map_err(storage)?;
        let rows = stmt
            .query_map(params![id.get(), limit as i64], |row| {
                Ok(SourceExcerpt {
                    title: row.get(0)?,
                    url: row.get(1)?,
                    description: row.get(2)?,
                    content: row.get(3)?,
                })
            })
            .map_err(storage)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(storage)
    }

    fn add_claim(&self, id: BriefId, claim: &NewClaim) -> Result<i64, PersistenceError> {
        let conn = self.lock()?;
        Self::require_brief(&conn, id)?;
        conn.execute(
            "INSERT INTO claims
             (brief_id, claim_text, category, veracity_score, verification_status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id.get(),
                claim.text,
                claim.category,
                claim.veracity_score,
                verification(claim.verified),
                now(),
            ],
        )
        .map_err(storage)?;
        Ok(conn.last_insert_rowid())
    }

    fn append_event(&self, event: &AgentEvent) -> Result<(), PersistenceError> {
        let conn = self.lock()?;
        Self::require_brief(&conn, event.brief_id)?;
        Self::insert_event(&conn, event)
    }

    fn recent_events(
        &self,
        id: BriefId,
        limit: usize,
    ) -> Result<Vec<AgentEvent>, PersistenceError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT agent_name, event_type, payload, message, created_at
                 FROM agent_events WHERE brief_id = ?1 ORDER BY id DESC LIMIT ?2",
            )
            .map_err(storage)?;
        let rows = stmt
            .query_map(params![id.get(), limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .map_err(storage)?;

        let mut events = Vec::new();
        for row in rows {
            let (agent_name, event_type, payload, message, created_at) = row.map_err(storage)?;
            events.push(AgentEvent {
                brief_id: id,
                agent_name,
                event_type,
                payload: serde_json::from_str(&payload).map_err(storage)?,
                message,
                created_at: parse_time(&created_at)?,
            });
        }
        Ok(events)
    }

    fn commit_transition(
        &self,
        transition: &PhaseTransition,
        event: &AgentEvent,
    ) -> Result<(), PersistenceError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(storage)?;

        let changed = tx
            .execute(
                "UPDATE research_briefs SET status = ?1, updated_at = ?2
                 WHERE id = ?3 AND status = ?4",
                params![
                    transition.new_phase.as_str(),
                    transition
                        .at
                        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                    transition.brief_id.get(),
                    transition.old_phase.as_str(),
                ],
            )
            .map_err(storage)?;

        if changed == 0 {
            // Dropping `tx` rolls back
            return Err(match Self::status_of(&tx, transition.brief_id)? {
                None => PersistenceError::BriefNotFound(transition.brief_id),
                Some(actual) => PersistenceError::Conflict {
                    brief_id: transition.brief_id,
                    expected: transition.old_phase,
                    actual,
                },
            });
        }

        Self::insert_event(&tx, event)?;
        tx.commit().map_err(storage)?;

        info!(
            brief_id = transition.brief_id.get(),
            "Brief moved {} -> {}", transition.old_phase, transition.new_phase
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepcast_domain::research::QualityMetrics;
    use serde_json::json;

    fn new_brief(topic: &str) -> NewBrief {
        NewBrief::validate(topic, Some("early computing"), "casual", 45, None).unwrap()
    }

    fn transition(id: BriefId, old: BriefPhase, new: BriefPhase) -> PhaseTransition {
        PhaseTransition::new(
            id,
            old,
            new,
            QualityMetrics::from_progress(&ResearchProgress::default()),
        )
    }

    #[test]
    fn test_create_and_get_brief() {
        let repo = SqliteBriefRepository::open_in_memory().unwrap();
        let created = repo.create_brief(&new_brief("Ada Lovelace")).unwrap();
        assert_eq!(created.id.get(), 1);

        let loaded = repo.get_brief(created.id).unwrap().unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.tone, Tone::Casual);
        assert_eq!(loaded.status, BriefPhase::Pending);

        assert!(repo.get_brief(BriefId::new(99).unwrap()).unwrap().is_none());
    }

    #[test]
    fn test_progress_counts() {
        let repo = SqliteBriefRepository::open_in_memory().unwrap();
        let id = repo.create_brief(&new_brief("Ada")).unwrap().id;

        let q1 = repo.add_query(id, "Who is Ada", Some("core_facts")).unwrap();
        repo.add_query(id, "Ada quotes", None).unwrap();
        repo.complete_query(q1, 4).unwrap();
        repo.complete_query(q1, 6).unwrap();

        repo.add_item(id, &NewResearchItem::new("Bio", "https://a.example").verified())
            .unwrap();
        repo.add_item(
            id,
            &NewResearchItem::new("Blog", "https://b.example").with_credibility(0.2),
        )
        .unwrap();
        repo.add_claim(id, &NewClaim::new("Wrote the first program", 0.9).verified())
            .unwrap();

        let progress = repo.progress(id).unwrap();
        assert_eq!(progress.total_queries, 2);
        assert_eq!(progress.completed_queries, 1);
        assert_eq!(progress.total_items, 2);
        assert_eq!(progress.verified_items, 1);
        assert_eq!(progress.item_credibility, vec![0.5, 0.2]);
        assert_eq!(progress.total_claims, 1);
        assert_eq!(progress.verified_claims, 1);
        assert_eq!(progress.claim_scores, vec![0.9]);

        let queries = repo.queries(id).unwrap();
        assert_eq!(
            queries.iter().map(|q| q.category.as_deref()).collect::<Vec<_>>(),
            vec![Some("core_facts"), None]
        );
        assert!(queries[0].completed);
        assert_eq!(queries[0].results_count, 6);
        assert!(!queries[1].completed);
        assert_eq!(queries[1].results_count, 0);
    }

    #[test]
    fn test_missing_rows_are_reported() {
        let repo = SqliteBriefRepository::open_in_memory().unwrap();
        let missing = BriefId::new(7).unwrap();
        assert!(matches!(
            repo.add_query(missing, "q", None),
            Err(PersistenceError::BriefNotFound(id)) if id == missing
        ));
        assert!(matches!(
            repo.progress(missing),
            Err(PersistenceError::BriefNotFound(_))
        ));
        assert!(matches!(
            repo.complete_query(42, 1),
            Err(PersistenceError::QueryNotFound(42))
        ));
    }

    #[test]
    fn test_source_excerpts_in_insert_order() {
        let repo = SqliteBriefRepository::open_in_memory().unwrap();
        let id = repo.create_brief(&new_brief("Ada")).unwrap().id;
        for n in 0..3 {
            repo.add_item(
                id,
                &NewResearchItem::new(format!("Source {n}"), format!("https://{n}.example"))
                    .with_content(format!("Body {n}")),
            )
            .unwrap();
        }

        let excerpts = repo.source_excerpts(id, 2).unwrap();
        assert_eq!(excerpts.len(), 2);
        assert_eq!(excerpts[0].title, "Source 0");
        assert_eq!(excerpts[1].url, "https://1.example");
        assert_eq!(excerpts[1].content.as_deref(), Some("Body 1"));
        assert_eq!(excerpts[1].description, None);
    }

    #[test]
    fn test_older_database_gains_results_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(&SCHEMA.replace("    results_count INTEGER NOT NULL DEFAULT 0,\n", ""))
                .unwrap();
        }

        let repo = SqliteBriefRepository::open(&path).unwrap();
        let id = repo.create_brief(&new_brief("Ada")).unwrap().id;
        let q = repo.add_query(id, "Who is Ada", None).unwrap();
        repo.complete_query(q, 3).unwrap();
        assert_eq!(repo.queries(id).unwrap()[0].results_count, 3);
    }

    #[test]
    fn test_recent_events_newest_first() {
        let repo = SqliteBriefRepository::open_in_memory().unwrap();
        let id = repo.create_brief(&new_brief("Ada")).unwrap().id;
        for n in 0..4 {
            repo.append_event(
                &AgentEvent::new(id, "podcast_orchestrator", "note", format!("event {n}"))
                    .with_payload(json!({"n": n})),
            )
            .unwrap();
        }

        let events = repo.recent_events(id, 2).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message, "event 3");
        assert_eq!(events[0].payload["n"], 3);
        assert_eq!(events[1].message, "event 2");
    }

    #[test]
    fn test_commit_transition_writes_status_and_event() {
        let repo = SqliteBriefRepository::open_in_memory().unwrap();
        let id = repo.create_brief(&new_brief("Ada")).unwrap().id;

        let t = transition(id, BriefPhase::Pending, BriefPhase::InProgress);
        repo.commit_transition(&t, &t.to_event("podcast_orchestrator"))
            .unwrap();

        assert_eq!(
            repo.get_brief(id).unwrap().unwrap().status,
            BriefPhase::InProgress
        );
        let events = repo.recent_events(id, 5).unwrap();
        assert_eq!(events[0].event_type, "phase_advanced");
        assert_eq!(events[0].payload["new_status"], "in_progress");
    }

    #[test]
    fn test_stale_transition_conflicts_and_writes_nothing() {
        let repo = SqliteBriefRepository::open_in_memory().unwrap();
        let id = repo.create_brief(&new_brief("Ada")).unwrap().id;

        let first = transition(id, BriefPhase::Pending, BriefPhase::Failed).with_reason("cancelled");
        repo.commit_transition(&first, &first.to_event("a")).unwrap();

        let stale = transition(id, BriefPhase::Pending, BriefPhase::InProgress);
        let err = repo
            .commit_transition(&stale, &stale.to_event("b"))
            .unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::Conflict {
                expected: BriefPhase::Pending,
                actual: BriefPhase::Failed,
                ..
            }
        ));

        let events = repo.recent_events(id, 10).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "phase_failed");
        assert_eq!(repo.get_brief(id).unwrap().unwrap().status, BriefPhase::Failed);
    }

    #[test]
    fn test_file_database_is_shared_between_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("briefs.db");

        let writer = SqliteBriefRepository::open(&path).unwrap();
        let id = writer.create_brief(&new_brief("Grace Hopper")).unwrap().id;
        writer.add_query(id, "Who is Grace Hopper", None).unwrap();
        drop(writer);

        let reader = SqliteBriefRepository::open(&path).unwrap();
        assert_eq!(reader.progress(id).unwrap().total_queries, 1);
        assert_eq!(reader.get_brief(id).unwrap().unwrap().topic, "Grace Hopper");
    }
}
