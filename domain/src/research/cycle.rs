//! Research cycle types and orchestration plans.

use super::brief::BriefId;
use crate::core::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CycleType {
    Quick,
    #[default]
    Comprehensive,
    Targeted,
}

impl CycleType {
    pub const ALL: [CycleType; 3] = [CycleType::Quick, CycleType::Comprehensive, CycleType::Targeted];

    pub fn as_str(&self) -> &'static str {
        match self {
            CycleType::Quick => "quick",
            CycleType::Comprehensive => "comprehensive",
            CycleType::Targeted => "targeted",
        }
    }
}

impl std::fmt::Display for CycleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CycleType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CycleType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| {
                let names: Vec<&str> = CycleType::ALL.iter().map(|t| t.as_str()).collect();
                ValidationError::invalid_choice("cycle_type", s, &names)
            })
    }
}

/// Size and depth of one research cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleConfig {
    pub queries: u32,
    pub items_per_query: u32,
    pub depth: String,
}

impl CycleConfig {
    pub fn new(queries: u32, items_per_query: u32, depth: impl Into<String>) -> Self {
        Self {
            queries,
            items_per_query,
            depth: depth.into(),
        }
    }

    pub fn default_for(cycle_type: CycleType) -> Self {
        match cycle_type {
            CycleType::Quick => Self::new(3, 2, "surface"),
            CycleType::Comprehensive => Self::new(6, 3, "deep"),
            CycleType::Targeted => Self::new(4, 4, "focused"),
        }
    }

    pub fn total_items(&self) -> u32 {
        self.queries * self.items_per_query
    }
}

/// Ordered steps for executing one cycle of a brief.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclePlan {
    pub brief_id: BriefId,
    pub cycle_type: CycleType,
    pub config: CycleConfig,
    pub steps: Vec<String>,
    pub estimated_duration_min: u32,
}

impl CyclePlan {
    pub fn new(brief_id: BriefId, cycle_type: CycleType, config: CycleConfig) -> Self {
        let steps = vec![
            "Query formulation and planning".to_string(),
            format!("Execute {} search queries", config.queries),
            format!("Scrape {} research items", config.total_items()),
            "Fact-check and verify sources".to_string(),
            "Extract and validate claims".to_string(),
        ];
        Self {
            brief_id,
            cycle_type,
            estimated_duration_min: 5 + config.queries * 2,
            config,
            steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_type_parse() {
        assert_eq!("quick".parse::<CycleType>().unwrap(), CycleType::Quick);
        let err = "exhaustive".parse::<CycleType>().unwrap_err();
        assert!(err.to_string().contains("quick, comprehensive, targeted"));
    }

    #[test]
    fn test_default_configs() {
        assert_eq!(CycleConfig::default_for(CycleType::Quick), CycleConfig::new(3, 2, "surface"));
        assert_eq!(CycleConfig::default_for(CycleType::Comprehensive).total_items(), 18);
        assert_eq!(CycleConfig::default_for(CycleType::Targeted).depth, "focused");
    }

    #[test]
    fn test_plan_steps_and_estimate() {
        let id = BriefId::new(1).unwrap();
        let plan = CyclePlan::new(
            id,
            CycleType::Comprehensive,
            CycleConfig::default_for(CycleType::Comprehensive),
        );
        assert_eq!(plan.steps.len(), 5);
        assert_eq!(plan.steps[1], "Execute 6 search queries");
        assert_eq!(plan.steps[2], "Scrape 18 research items");
        assert_eq!(plan.estimated_duration_min, 17);
    }
}
