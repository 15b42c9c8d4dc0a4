//! Phase gate configuration from TOML (`[phase]` section)

use super::validation::{ConfigIssue, ConfigIssueCode};
use deepcast_application::ResearchParams;
use deepcast_domain::research::{CycleConfig, CycleType, PhaseThresholds};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Phase gate thresholds and research cycle sizes
///
/// # Example
///
/// ```toml
/// [phase]
/// completion_threshold = 80.0
/// min_verified_items = 5
///
/// [phase.cycles.quick]
/// queries = 3
/// items_per_query = 2
/// depth = "surface"
/// ```
///
/// Cycle types that are not listed keep their built-in sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePhaseConfig {
    pub completion_threshold: f64,
    pub min_verified_items: u32,
    pub cycles: BTreeMap<CycleType, CycleConfig>,
}

impl Default for FilePhaseConfig {
    fn default() -> Self {
        let thresholds = PhaseThresholds::default();
        Self {
            completion_threshold: thresholds.completion_threshold,
            min_verified_items: thresholds.min_verified_items,
            cycles: BTreeMap::new(),
        }
    }
}

impl FilePhaseConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if !(0.0..=100.0).contains(&self.completion_threshold) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "phase.completion_threshold".to_string(),
                },
                format!(
                    "phase.completion_threshold must be within 0..=100 (got {})",
                    self.completion_threshold
                ),
            ));
        }
        for (cycle_type, config) in &self.cycles {
            if config.queries == 0 || config.items_per_query == 0 {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::OutOfRange {
                        field: format!("phase.cycles.{}", cycle_type),
                    },
                    format!("phase.cycles.{}: a cycle with no queries or items does no research", cycle_type),
                ));
            }
        }
        issues
    }

    pub fn to_research_params(&self) -> ResearchParams {
        let thresholds = PhaseThresholds {
            completion_threshold: self.completion_threshold,
            min_verified_items: self.min_verified_items,
        };
        self.cycles.iter().fold(
            ResearchParams::default().with_thresholds(thresholds),
            |params, (cycle_type, config)| params.with_cycle(*cycle_type, config.clone()),
        )
    }
}
