//! SQLite schema for briefs, research rows and the audit log.

pub const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS research_briefs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    topic TEXT NOT NULL,
    angle TEXT,
    tone TEXT NOT NULL,
    target_length_min INTEGER NOT NULL,
    additional_instructions TEXT,
    status TEXT NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'in_progress', 'completed', 'failed')),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS research_queries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    brief_id INTEGER NOT NULL REFERENCES research_briefs(id),
    query_text TEXT NOT NULL,
    category TEXT,
    status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'completed')),
    results_count INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    completed_at TEXT
);

CREATE TABLE IF NOT EXISTS research_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    brief_id INTEGER NOT NULL REFERENCES research_briefs(id),
    title TEXT NOT NULL,
    url TEXT NOT NULL,
    description TEXT,
    content TEXT,
    credibility_score REAL NOT NULL DEFAULT 0.5,
    verification_status TEXT NOT NULL DEFAULT 'pending',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS claims (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    brief_id INTEGER NOT NULL REFERENCES research_briefs(id),
    claim_text TEXT NOT NULL,
    category TEXT,
    veracity_score REAL NOT NULL,
    verification_status TEXT NOT NULL DEFAULT 'pending',
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS agent_events (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    brief_id INTEGER NOT NULL REFERENCES research_briefs(id),
    agent_name TEXT NOT NULL,
    event_type TEXT NOT NULL,
    payload TEXT NOT NULL,
    message TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_research_queries_brief ON research_queries(brief_id);
CREATE INDEX IF NOT EXISTS idx_research_items_brief ON research_items(brief_id);
CREATE INDEX IF NOT EXISTS idx_claims_brief ON claims(brief_id);
CREATE INDEX IF NOT EXISTS idx_agent_events_brief ON agent_events(brief_id, id DESC);
";

/// Columns added after the first release, with the statement adding each
/// to an older database.
pub const ADDED_COLUMNS: [(&str, &str, &str); 1] = [(
    "research_queries",
    "results_count",
    "ALTER TABLE research_queries ADD COLUMN results_count INTEGER NOT NULL DEFAULT 0",
)];

/// Value of `verification_status` for verified items and claims.
pub const VERIFIED: &str = "verified";
pub const PENDING: &str = "pending";
pub const COMPLETED: &str = "completed";
