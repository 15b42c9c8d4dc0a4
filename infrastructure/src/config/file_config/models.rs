//! Model tier configuration from TOML (`[models]` section)

use super::validation::{ConfigIssue, ConfigIssueCode};
use deepcast_application::ModelTiers;
use serde::{Deserialize, Serialize};

/// Model tier configuration from TOML
///
/// # Example
///
/// ```toml
/// [models]
/// planning = "gpt-4.1-mini"   # Iterative tool planning
/// final = "gpt-4.1"           # One-shot answer synthesis
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    pub planning: String,
    #[serde(rename = "final")]
    pub final_model: String,
}

impl Default for FileModelsConfig {
    fn default() -> Self {
        let tiers = ModelTiers::default();
        Self {
            planning: tiers.planning,
            final_model: tiers.final_model,
        }
    }
}

impl FileModelsConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        [("planning", &self.planning), ("final", &self.final_model)]
            .into_iter()
            .filter(|(_, name)| name.trim().is_empty())
            .map(|(field, _)| {
                ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName {
                        field: field.to_string(),
                    },
                    format!("models.{}: model name cannot be empty", field),
                )
            })
            .collect()
    }

    pub fn to_model_tiers(&self) -> ModelTiers {
        ModelTiers::new(self.planning.trim(), self.final_model.trim())
    }
}
