//! Model identifiers per tier.

use crate::ports::generation::ModelTier;
use serde::{Deserialize, Serialize};

/// Concrete model used for each [`ModelTier`].
///
/// The two tiers are kept distinct even when configured to the same model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTiers {
    pub planning: String,
    #[serde(rename = "final")]
    pub final_model: String,
}

impl Default for ModelTiers {
    fn default() -> Self {
        Self {
            planning: "gpt-4.1-mini".to_string(),
            final_model: "gpt-4.1".to_string(),
        }
    }
}

impl ModelTiers {
    pub fn new(planning: impl Into<String>, final_model: impl Into<String>) -> Self {
        Self {
            planning: planning.into(),
            final_model: final_model.into(),
        }
    }

    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Planning => &self.planning,
            ModelTier::Final => &self.final_model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_for_tier() {
        let tiers = ModelTiers::default();
        assert_eq!(tiers.model_for(ModelTier::Planning), "gpt-4.1-mini");
        assert_eq!(tiers.model_for(ModelTier::Final), "gpt-4.1");
    }
}
