//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod check_claims;
pub mod final_synthesis;
pub mod manage_brief;
pub mod phase_controller;
pub mod planning_loop;
pub mod run_research;
pub(crate) mod shared;
