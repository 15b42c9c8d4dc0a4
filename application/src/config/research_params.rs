//! Research lifecycle parameters.

use deepcast_domain::research::{CycleConfig, CycleType, PhaseThresholds};
use std::collections::HashMap;

/// Phase gate thresholds plus per-type research cycle sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchParams {
    pub thresholds: PhaseThresholds,
    cycles: HashMap<CycleType, CycleConfig>,
}

impl Default for ResearchParams {
    fn default() -> Self {
        Self {
            thresholds: PhaseThresholds::default(),
            cycles: CycleType::ALL
                .into_iter()
                .map(|t| (t, CycleConfig::default_for(t)))
                .collect(),
        }
    }
}

impl ResearchParams {
    pub fn with_thresholds(mut self, thresholds: PhaseThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_cycle(mut self, cycle_type: CycleType, config: CycleConfig) -> Self {
        self.cycles.insert(cycle_type, config);
        self
    }

    pub fn cycle(&self, cycle_type: CycleType) -> CycleConfig {
        self.cycles
            .get(&cycle_type)
            .cloned()
            .unwrap_or_else(|| CycleConfig::default_for(cycle_type))
    }
}
