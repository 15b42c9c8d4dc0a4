//! Raw research counts for a brief, as read from persistence.

use serde::{Deserialize, Serialize};

/// Current counts for one brief.
///
/// Score vectors carry one entry per claim / research item that has been
/// scored; unscored rows are counted in the totals only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchProgress {
    pub total_queries: u32,
    pub completed_queries: u32,
    pub total_items: u32,
    pub verified_items: u32,
    pub total_claims: u32,
    pub verified_claims: u32,
    /// Veracity scores of claims, each in [0, 1]
    #[serde(default)]
    pub claim_scores: Vec<f64>,
    /// Credibility scores of research items, each in [0, 1]
    #[serde(default)]
    pub item_credibility: Vec<f64>,
}

/// A planned query as read back from persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub query_text: String,
    pub category: Option<String>,
    pub completed: bool,
    /// Search results the query returned; 0 until completed
    pub results_count: u32,
}

/// A research item to be recorded against a brief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewResearchItem {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub credibility_score: f64,
    pub verified: bool,
}

impl NewResearchItem {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            description: None,
            content: None,
            credibility_score: 0.5,
            verified: false,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_credibility(mut self, score: f64) -> Self {
        self.credibility_score = score.clamp(0.0, 1.0);
        self
    }

    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }
}

/// A claim extracted from research, with its veracity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClaim {
    pub text: String,
    /// fact, opinion, statistic, quote, ...
    pub category: Option<String>,
    pub veracity_score: f64,
    pub verified: bool,
}

impl NewClaim {
    pub fn new(text: impl Into<String>, veracity_score: f64) -> Self {
        Self {
            text: text.into(),
            category: None,
            veracity_score: veracity_score.clamp(0.0, 1.0),
            verified: false,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }
}
