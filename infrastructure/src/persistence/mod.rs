//! Persistence adapters.
//!
//! [`SqliteBriefRepository`] implements the
//! [`BriefRepository`](deepcast_application::BriefRepository) port on a
//! bundled SQLite database.

mod schema;
mod sqlite;

pub use sqlite::SqliteBriefRepository;
