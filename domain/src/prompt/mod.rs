//! Prompt domain
//!
//! Instructions given to the planning and final model tiers.

mod fact_check;
mod research;

pub use fact_check::FactCheckPromptTemplate;
pub use research::ResearchPromptTemplate;
