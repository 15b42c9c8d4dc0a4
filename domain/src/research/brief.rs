//! Research brief entities

use crate::core::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const MAX_TOPIC_CHARS: usize = 500;
pub const MAX_ANGLE_CHARS: usize = 200;
pub const MIN_TARGET_LENGTH_MIN: i64 = 5;
pub const DEFAULT_TARGET_LENGTH_MIN: i64 = 30;

/// Identifier of a research brief (always a positive integer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BriefId(i64);

impl BriefId {
    pub fn new(id: i64) -> Result<Self, ValidationError> {
        if id <= 0 {
            return Err(ValidationError::InvalidBriefId(id));
        }
        Ok(Self(id))
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for BriefId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle phase of a research brief.
///
/// ```text
/// Pending ──▶ InProgress ──▶ Completed
///    │            │
///    └────────────┴──▶ Failed
/// ```
///
/// `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BriefPhase {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl BriefPhase {
    pub const ALL: [BriefPhase; 4] = [
        BriefPhase::Pending,
        BriefPhase::InProgress,
        BriefPhase::Completed,
        BriefPhase::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BriefPhase::Pending => "pending",
            BriefPhase::InProgress => "in_progress",
            BriefPhase::Completed => "completed",
            BriefPhase::Failed => "failed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BriefPhase::Pending => "Pending",
            BriefPhase::InProgress => "In Progress",
            BriefPhase::Completed => "Completed",
            BriefPhase::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BriefPhase::Completed | BriefPhase::Failed)
    }
}

impl std::fmt::Display for BriefPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BriefPhase {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BriefPhase::ALL
            .into_iter()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = BriefPhase::ALL.iter().map(|p| p.as_str()).collect();
                ValidationError::invalid_choice("status", s, &names)
            })
    }
}

/// Narrative tone requested for the final script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Informative,
    Casual,
    Formal,
    Entertaining,
}

impl Tone {
    pub const ALL: [Tone; 4] = [Tone::Informative, Tone::Casual, Tone::Formal, Tone::Entertaining];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Informative => "informative",
            Tone::Casual => "casual",
            Tone::Formal => "formal",
            Tone::Entertaining => "entertaining",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Tone::ALL
            .into_iter()
            .find(|tone| tone.as_str() == normalized)
            .ok_or_else(|| {
                let names: Vec<&str> = Tone::ALL.iter().map(|t| t.as_str()).collect();
                ValidationError::invalid_choice("tone", s, &names)
            })
    }
}

/// A validated request to create a brief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBrief {
    pub topic: String,
    pub angle: Option<String>,
    pub tone: Tone,
    pub target_length_min: i64,
    pub additional_instructions: Option<String>,
}

impl NewBrief {
    /// Validate raw caller input.
    ///
    /// Topic is trimmed and must be non-empty; blank optional strings
    /// collapse to `None`.
    pub fn validate(
        topic: &str,
        angle: Option<&str>,
        tone: &str,
        target_length_min: i64,
        additional_instructions: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(ValidationError::Missing { field: "topic" });
        }
        check_length("topic", topic, MAX_TOPIC_CHARS)?;

        let angle = non_blank(angle);
        if let Some(angle) = &angle {
            check_length("angle", angle, MAX_ANGLE_CHARS)?;
        }

        if target_length_min < MIN_TARGET_LENGTH_MIN {
            return Err(ValidationError::BelowMinimum {
                field: "target_length_min",
                min: MIN_TARGET_LENGTH_MIN,
                actual: target_length_min,
            });
        }

        Ok(Self {
            topic: topic.to_string(),
            angle,
            tone: tone.parse()?,
            target_length_min,
            additional_instructions: non_blank(additional_instructions),
        })
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A persisted research brief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchBrief {
    pub id: BriefId,
    pub topic: String,
    pub angle: Option<String>,
    pub tone: Tone,
    pub target_length_min: i64,
    pub additional_instructions: Option<String>,
    pub status: BriefPhase,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
