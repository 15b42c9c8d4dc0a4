//! Application-level configuration.
//!
//! Plain structs built once per run (from the loaded file config) and
//! passed by reference into use cases:
//!
//! - [`LoopParams`]: planning loop control (iteration bound, deadline)
//! - [`ModelTiers`]: model identifier per [`ModelTier`](crate::ports::generation::ModelTier)
//! - [`ResearchParams`]: phase gate thresholds and research cycle sizes

pub mod loop_params;
pub mod model_tiers;
pub mod research_params;

pub use loop_params::LoopParams;
pub use model_tiers::ModelTiers;
pub use research_params::ResearchParams;
