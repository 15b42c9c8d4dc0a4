//! Fact checking: claims extracted from research content and their
//! verification against the brief's sources.
//!
//! Model output is recovered with [`parse_or_default`], so a garbled reply
//! degrades to "nothing extracted" or "nothing verified" instead of an
//! error. Entries missing their required fields are dropped.

use crate::core::error::ValidationError;
use crate::core::string::char_prefix;
use crate::parsing::{ExpectedKind, parse_or_default, require_fields};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::str::FromStr;
use tracing::warn;

/// Extraction reads at most this many characters of content.
pub const MAX_EXTRACTION_CHARS: usize = 8000;
/// Verification shows the model at most this many characters of sources.
pub const MAX_SOURCE_CHARS: usize = 6000;
/// Sources loaded per brief for extraction and verification.
pub const MAX_SOURCES: usize = 15;
/// Per-source content excerpt length.
pub const SOURCE_EXCERPT_CHARS: usize = 1500;

/// Verification status that counts a claim as verified.
pub const VERIFIED: &str = "verified";
pub const DISPUTED: &str = "disputed";
pub const UNVERIFIED: &str = "unverified";

/// How many extracted claims are sent for verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationDepth {
    Quick,
    #[default]
    Standard,
    Thorough,
}

impl VerificationDepth {
    pub const ALL: [VerificationDepth; 3] = [
        VerificationDepth::Quick,
        VerificationDepth::Standard,
        VerificationDepth::Thorough,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationDepth::Quick => "quick",
            VerificationDepth::Standard => "standard",
            VerificationDepth::Thorough => "thorough",
        }
    }

    pub fn claim_limit(&self) -> usize {
        match self {
            VerificationDepth::Quick => 5,
            VerificationDepth::Standard => 10,
            VerificationDepth::Thorough => 20,
        }
    }
}

impl std::fmt::Display for VerificationDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VerificationDepth {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VerificationDepth::ALL
            .into_iter()
            .find(|d| d.as_str() == s.trim())
            .ok_or_else(|| {
                let names: Vec<&str> = VerificationDepth::ALL.iter().map(|d| d.as_str()).collect();
                ValidationError::invalid_choice("verification_depth", s, &names)
            })
    }
}

/// A stored research item, as shown to the fact checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceExcerpt {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub content: Option<String>,
}

impl SourceExcerpt {
    /// Content excerpt, falling back to the description.
    fn body(&self) -> String {
        match (&self.content, &self.description) {
            (Some(content), _) if !content.trim().is_empty() => {
                char_prefix(content, SOURCE_EXCERPT_CHARS)
            }
            (_, Some(description)) => description.clone(),
            _ => String::new(),
        }
    }
}

/// Content to extract claims from: every source that has body text.
pub fn extraction_content(sources: &[SourceExcerpt]) -> String {
    sources
        .iter()
        .filter_map(|s| {
            let body = s.body();
            (!body.trim().is_empty()).then(|| format!("Source: {}\n{}", s.title, body))
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// Sources block for verification prompts.
pub fn verification_sources(sources: &[SourceExcerpt]) -> String {
    sources
        .iter()
        .map(|s| format!("Source: {} (URL: {})\n{}", s.title, s.url, s.body()))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// One claim as returned by the extraction prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedClaim {
    pub claim: String,
    /// date, statistic, person, event, technical, other
    pub category: Option<String>,
    /// high, medium, low
    pub confidence: Option<String>,
    /// critical, important, minor
    pub importance: Option<String>,
    pub context: Option<String>,
}

fn optional_str(map: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl ExtractedClaim {
    fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let required = match require_fields(map, &["claim"]) {
            Ok(required) => required,
            Err(missing) => {
                warn!("Dropping extracted claim without {}", missing.join(", "));
                return None;
            }
        };
        let claim = required["claim"].as_str()?.trim();
        if claim.is_empty() {
            return None;
        }
        Some(Self {
            claim: claim.to_string(),
            category: optional_str(map, "category"),
            confidence: optional_str(map, "confidence"),
            importance: optional_str(map, "importance"),
            context: optional_str(map, "context"),
        })
    }
}

/// Recover extracted claims from raw model output.
///
/// Unparseable output yields no claims.
pub fn parse_extracted_claims(raw: &str) -> Vec<ExtractedClaim> {
    match parse_or_default(raw, ExpectedKind::List, json!([])) {
        Value::Array(items) => items.iter().filter_map(ExtractedClaim::from_value).collect(),
        _ => Vec::new(),
    }
}

/// The verdict on one claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimVerification {
    pub claim: ExtractedClaim,
    /// verified, disputed, unverified, needs_more_sources
    pub verification_status: String,
    /// In [0, 1]
    pub confidence_score: f64,
    /// accept, flag, investigate_further, reject
    pub recommendation: Option<String>,
    pub evidence_found: Option<String>,
}

impl ClaimVerification {
    /// Recover a verdict for `claim` from raw model output.
    ///
    /// `None` when the output has no usable verdict.
    pub fn parse(claim: ExtractedClaim, raw: &str) -> Option<Self> {
        let value = parse_or_default(raw, ExpectedKind::Dict, json!({}));
        let map = value.as_object()?;
        let required = match require_fields(map, &["verification_status", "confidence_score"]) {
            Ok(required) => required,
            Err(missing) => {
                warn!(
                    "Verification of '{}' lacks {}",
                    claim.claim,
                    missing.join(", ")
                );
                return None;
            }
        };

        let status = required["verification_status"].as_str()?.trim().to_lowercase();
        let confidence_score = required["confidence_score"].as_f64()?.clamp(0.0, 1.0);
        Some(Self {
            claim,
            verification_status: status,
            confidence_score,
            recommendation: optional_str(map, "recommendation"),
            evidence_found: optional_str(map, "evidence_found"),
        })
    }

    pub fn is_verified(&self) -> bool {
        self.verification_status == VERIFIED
    }

    pub fn is_high_risk(&self) -> bool {
        self.verification_status == DISPUTED
            || matches!(self.recommendation.as_deref(), Some("flag" | "reject"))
    }
}

/// Follow-ups for a batch of verdicts.
pub fn verification_recommendations(verdicts: &[ClaimVerification]) -> Vec<String> {
    let mut recommendations = Vec::new();

    let flagged = verdicts
        .iter()
        .filter(|v| matches!(v.recommendation.as_deref(), Some("flag" | "reject")))
        .count();
    if flagged > 0 {
        recommendations.push(format!(
            "Review {} high-risk claims before publication",
            flagged
        ));
    }

    let scores: Vec<f64> = verdicts.iter().map(|v| v.confidence_score).collect();
    if !scores.is_empty() && super::quality::average_confidence(&scores) < 0.6 {
        recommendations
            .push("Overall claim confidence is low - consider additional research".to_string());
    }

    let disputed = verdicts.iter().filter(|v| v.verification_status == DISPUTED).count();
    if disputed > 0 {
        recommendations.push(format!(
            "Investigate {} disputed claims with contradictory evidence",
            disputed
        ));
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(text: &str) -> ExtractedClaim {
        ExtractedClaim {
            claim: text.to_string(),
            category: None,
            confidence: None,
            importance: None,
            context: None,
        }
    }

    #[test]
    fn test_parse_extracted_claims_from_prose() {
        let raw = r#"Here are the claims I found:
```json
[
  {"claim": "Ada Lovelace was born in 1815", "category": "date", "importance": "critical"},
  {"category": "person"},
  {"claim": "   "},
  {"claim": "She worked with Charles Babbage", "confidence": "high"}
]
```
Let me know if you need more."#;

        let claims = parse_extracted_claims(raw);
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0].claim, "Ada Lovelace was born in 1815");
        assert_eq!(claims[0].category.as_deref(), Some("date"));
        assert_eq!(claims[1].confidence.as_deref(), Some("high"));
        assert_eq!(claims[1].category, None);
    }

    #[test]
    fn test_unparseable_extraction_yields_nothing() {
        assert!(parse_extracted_claims("I could not find any claims.").is_empty());
        assert!(parse_extracted_claims(r#"{"claim": "not a list"}"#).is_empty());
    }

    #[test]
    fn test_parse_verification() {
        let raw = r#"Assessment: {"verification_status": "Verified", "confidence_score": 1.4,
            "recommendation": "accept", "evidence_found": "Birth record"}"#;
        let verdict = ClaimVerification::parse(claim("born 1815"), raw).unwrap();
        assert!(verdict.is_verified());
        assert_eq!(verdict.confidence_score, 1.0);
        assert_eq!(verdict.evidence_found.as_deref(), Some("Birth record"));
        assert!(!verdict.is_high_risk());
    }

    #[test]
    fn test_verification_missing_fields_is_none() {
        assert!(ClaimVerification::parse(claim("x"), r#"{"verification_status": "verified"}"#).is_none());
        assert!(ClaimVerification::parse(claim("x"), "no idea").is_none());
    }

    #[test]
    fn test_recommendations() {
        let verdict = |status: &str, score: f64, rec: Option<&str>| ClaimVerification {
            claim: claim("c"),
            verification_status: status.to_string(),
            confidence_score: score,
            recommendation: rec.map(String::from),
            evidence_found: None,
        };
        let verdicts = vec![
            verdict(VERIFIED, 0.9, Some("accept")),
            verdict(DISPUTED, 0.2, Some("flag")),
            verdict(UNVERIFIED, 0.3, None),
        ];
        assert!(verdicts[1].is_high_risk());
        assert_eq!(
            verification_recommendations(&verdicts),
            vec![
                "Review 1 high-risk claims before publication",
                "Overall claim confidence is low - consider additional research",
                "Investigate 1 disputed claims with contradictory evidence",
            ]
        );
        assert!(verification_recommendations(&verdicts[..1]).is_empty());
        assert!(verification_recommendations(&[]).is_empty());
    }

    #[test]
    fn test_depth_parsing_and_limits() {
        assert_eq!("thorough".parse::<VerificationDepth>().unwrap().claim_limit(), 20);
        assert_eq!(VerificationDepth::default().claim_limit(), 10);
        assert!("exhaustive".parse::<VerificationDepth>().is_err());
    }

    #[test]
    fn test_source_content() {
        let sources = vec![
            SourceExcerpt {
                title: "Bio".to_string(),
                url: "https://a.example".to_string(),
                description: Some("Short".to_string()),
                content: Some("Long body".to_string()),
            },
            SourceExcerpt {
                title: "Empty".to_string(),
                url: "https://b.example".to_string(),
                description: None,
                content: None,
            },
        ];
        assert_eq!(extraction_content(&sources), "Source: Bio\nLong body");
        assert!(verification_sources(&sources).contains("Source: Empty (URL: https://b.example)"));
    }
}
