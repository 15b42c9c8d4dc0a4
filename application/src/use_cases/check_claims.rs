//! Fact-check use case.
//!
//! One planning-tier call extracts claims from the brief's sources, then
//! each claim (up to the depth limit) gets one final-tier verification
//! call. Verdicts that can be recovered are recorded as claims; model
//! output that cannot be parsed is skipped, never an error.

use crate::ports::brief_repository::{BriefRepository, PersistenceError};
use crate::ports::generation::{
    GatewayError, GenerationGateway, GenerationRequest, ModelTier, ToolChoice,
};
use deepcast_domain::research::claims::{
    self, ClaimVerification, ExtractedClaim, MAX_SOURCES, VerificationDepth,
};
use deepcast_domain::research::events::{CLAIMS_EXTRACTED, CLAIMS_VERIFIED};
use deepcast_domain::research::quality::average_confidence;
use deepcast_domain::research::{AgentEvent, BriefId, NewClaim};
use deepcast_domain::{FactCheckPromptTemplate, Message, ValidationError};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Agent name recorded on fact-check events.
pub const FACT_CHECK_AGENT: &str = "fact_checker";

#[derive(Error, Debug)]
pub enum CheckClaimsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Research brief not found")]
    BriefNotFound(BriefId),

    #[error("Claim extraction failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Outcome of [`ClaimChecker::check`].
#[derive(Debug, Clone, Serialize)]
pub struct ClaimCheckReport {
    pub brief_id: BriefId,
    pub depth: VerificationDepth,
    pub extracted: usize,
    /// Verdicts recovered and recorded, in extraction order
    pub verdicts: Vec<ClaimVerification>,
    pub verified: usize,
    pub disputed: usize,
    pub unverified: usize,
    pub high_risk: usize,
    pub average_confidence: f64,
    pub recommendations: Vec<String>,
}

impl ClaimCheckReport {
    fn new(
        brief_id: BriefId,
        depth: VerificationDepth,
        extracted: usize,
        verdicts: Vec<ClaimVerification>,
    ) -> Self {
        let count = |status: &str| {
            verdicts
                .iter()
                .filter(|v| v.verification_status == status)
                .count()
        };
        let scores: Vec<f64> = verdicts.iter().map(|v| v.confidence_score).collect();
        Self {
            brief_id,
            depth,
            extracted,
            verified: count(claims::VERIFIED),
            disputed: count(claims::DISPUTED),
            unverified: count(claims::UNVERIFIED),
            high_risk: verdicts.iter().filter(|v| v.is_high_risk()).count(),
            average_confidence: average_confidence(&scores),
            recommendations: claims::verification_recommendations(&verdicts),
            verdicts,
        }
    }
}

pub struct ClaimChecker {
    gateway: Arc<dyn GenerationGateway>,
    repository: Arc<dyn BriefRepository>,
}

impl ClaimChecker {
    pub fn new(gateway: Arc<dyn GenerationGateway>, repository: Arc<dyn BriefRepository>) -> Self {
        Self {
            gateway,
            repository,
        }
    }

    /// Extract claims from `content` (or the brief's stored sources) and
    /// verify up to `depth.claim_limit()` of them.
    pub async fn check(
        &self,
        brief_id: i64,
        depth: VerificationDepth,
        content: Option<String>,
    ) -> Result<ClaimCheckReport, CheckClaimsError> {
        let id = BriefId::new(brief_id)?;
        if self.repository.get_brief(id)?.is_none() {
            return Err(CheckClaimsError::BriefNotFound(id));
        }

        let sources = self.repository.source_excerpts(id, MAX_SOURCES)?;
        let content = content.unwrap_or_else(|| claims::extraction_content(&sources));
        if content.trim().is_empty() {
            return Err(ValidationError::Missing { field: "content" }.into());
        }

        let extracted = self.extract(&content).await?;
        self.log_extraction(id, &extracted)?;

        let source_block = claims::verification_sources(&sources);
        let mut verdicts = Vec::new();
        for claim in extracted.iter().take(depth.claim_limit()) {
            let Some(verdict) = self.verify(claim.clone(), &source_block).await else {
                continue;
            };
            let mut record = NewClaim::new(verdict.claim.claim.clone(), verdict.confidence_score);
            if let Some(category) = &verdict.claim.category {
                record = record.with_category(category.clone());
            }
            if verdict.is_verified() {
                record = record.verified();
            }
            self.repository.add_claim(id, &record)?;
            verdicts.push(verdict);
        }

        let report = ClaimCheckReport::new(id, depth, extracted.len(), verdicts);
        self.repository.append_event(
            &AgentEvent::new(
                id,
                FACT_CHECK_AGENT,
                CLAIMS_VERIFIED,
                format!(
                    "Verified {} claims: {} verified, {} disputed",
                    report.verdicts.len(),
                    report.verified,
                    report.disputed
                ),
            )
            .with_payload(json!({
                "verified": report.verified,
                "disputed": report.disputed,
                "unverified": report.unverified,
                "high_risk": report.high_risk,
                "average_confidence": report.average_confidence,
                "depth": depth.as_str(),
            })),
        )?;

        info!(
            brief_id,
            "Checked {} of {} claims ({} verified)",
            report.verdicts.len(),
            report.extracted,
            report.verified
        );
        Ok(report)
    }

    async fn extract(&self, content: &str) -> Result<Vec<ExtractedClaim>, GatewayError> {
        let request = GenerationRequest::new(
            FactCheckPromptTemplate::extraction_system(),
            vec![Message::user(FactCheckPromptTemplate::extraction_request(
                content,
            ))],
        )
        .with_tool_choice(ToolChoice::None);

        let response = self.gateway.generate(ModelTier::Planning, &request).await?;
        let extracted = claims::parse_extracted_claims(&response.text_content());
        debug!("Extracted {} claims", extracted.len());
        Ok(extracted)
    }

    /// `None` when the call fails or its output has no usable verdict.
    async fn verify(&self, claim: ExtractedClaim, sources: &str) -> Option<ClaimVerification> {
        let request = GenerationRequest::new(
            FactCheckPromptTemplate::verification_system(),
            vec![Message::user(FactCheckPromptTemplate::verification_request(
                &claim, sources,
            ))],
        )
        .with_tool_choice(ToolChoice::None);

        match self.gateway.generate(ModelTier::Final, &request).await {
            Ok(response) => ClaimVerification::parse(claim, &response.text_content()),
            Err(e) => {
                warn!("Skipping claim '{}': {}", claim.claim, e);
                None
            }
        }
    }

    fn log_extraction(&self, id: BriefId, extracted: &[ExtractedClaim]) -> Result<(), PersistenceError> {
        let importance = |level: &str| {
            extracted
                .iter()
                .filter(|c| c.importance.as_deref() == Some(level))
                .count()
        };
        let high_confidence = extracted
            .iter()
            .filter(|c| c.confidence.as_deref() == Some("high"))
            .count();
        self.repository.append_event(
            &AgentEvent::new(
                id,
                FACT_CHECK_AGENT,
                CLAIMS_EXTRACTED,
                format!("Extracted {} claims", extracted.len()),
            )
            .with_payload(json!({
                "total_claims": extracted.len(),
                "critical_claims": importance("critical"),
                "important_claims": importance("important"),
                "high_confidence": high_confidence,
            })),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::phase_controller::tests::InMemoryBriefRepository;
    use crate::use_cases::planning_loop::tests::MockGateway;
    use deepcast_domain::GenerationResponse;
    use deepcast_domain::research::{BriefPhase, NewResearchItem, ResearchProgress};

    fn repository_with_source() -> Arc<InMemoryBriefRepository> {
        let repo = Arc::new(InMemoryBriefRepository::with_brief(
            BriefPhase::InProgress,
            ResearchProgress::default(),
        ));
        repo.add_item(
            BriefId::new(1).unwrap(),
            &NewResearchItem::new("Biography", "https://bio.example")
                .with_content("Ada Lovelace was born in 1815 and worked with Babbage."),
        )
        .unwrap();
        repo
    }

    fn text(s: &str) -> Result<GenerationResponse, GatewayError> {
        Ok(GenerationResponse::from_text(s))
    }

    fn event_types(repo: &InMemoryBriefRepository) -> Vec<String> {
        repo.events().into_iter().map(|e| e.event_type).collect()
    }

    #[tokio::test]
    async fn test_claims_recovered_from_prose_are_recorded() {
        let repo = repository_with_source();
        let gateway = Arc::new(MockGateway::new(vec![
            text(
                r#"Sure! Here is what I found:
```json
[
  {"claim": "Ada Lovelace was born in 1815", "category": "date", "importance": "critical"},
  {"claim": "She worked with Charles Babbage", "category": "person", "confidence": "high"}
]
```"#,
            ),
            text(
                r#"My assessment: {"verification_status": "verified", "confidence_score": 0.9,
                "recommendation": "accept", "evidence_found": "Biography"} Hope this helps."#,
            ),
            text("I am unable to judge this claim."),
        ]));

        let report = ClaimChecker::new(gateway.clone(), repo.clone())
            .check(1, VerificationDepth::Standard, None)
            .await
            .unwrap();

        assert_eq!(gateway.calls_for(ModelTier::Planning), 1);
        assert_eq!(gateway.calls_for(ModelTier::Final), 2);
        {
            let requests = gateway.requests.lock().unwrap();
            assert!(requests.iter().all(|(_, r)| r.tool_choice == ToolChoice::None));
            assert!(matches!(
                &requests[1].1.messages[0],
                Message::UserText { text } if text.contains("Source: Biography (URL: https://bio.example)")
            ));
        }

        assert_eq!(report.extracted, 2);
        assert_eq!(report.verdicts.len(), 1);
        assert_eq!(report.verified, 1);
        assert!(report.recommendations.is_empty());

        let recorded = repo.claims();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].text, "Ada Lovelace was born in 1815");
        assert_eq!(recorded[0].category.as_deref(), Some("date"));
        assert_eq!(recorded[0].veracity_score, 0.9);
        assert!(recorded[0].verified);

        assert_eq!(event_types(&repo), vec!["claims_extracted", "claims_verified"]);
        assert_eq!(repo.events()[0].payload["critical_claims"], 1);
    }

    #[tokio::test]
    async fn test_garbage_extraction_records_nothing() {
        let repo = repository_with_source();
        let gateway = Arc::new(MockGateway::new(vec![text(
            "I'm sorry, I couldn't find any specific claims {in this text.",
        )]));

        let report = ClaimChecker::new(gateway.clone(), repo.clone())
            .check(1, VerificationDepth::Quick, None)
            .await
            .unwrap();

        assert_eq!(report.extracted, 0);
        assert!(report.verdicts.is_empty());
        assert_eq!(gateway.calls_for(ModelTier::Final), 0);
        assert!(repo.claims().is_empty());
        assert_eq!(event_types(&repo), vec!["claims_extracted", "claims_verified"]);
    }

    #[tokio::test]
    async fn test_depth_limits_verification_calls() {
        let repo = repository_with_source();
        let listed: Vec<_> = (0..7)
            .map(|n| json!({"claim": format!("Claim {n}"), "category": "other"}))
            .collect();
        let mut responses = vec![text(&serde_json::to_string(&listed).unwrap())];
        for _ in 0..5 {
            responses.push(text(
                r#"{"verification_status": "disputed", "confidence_score": 0.3, "recommendation": "flag"}"#,
            ));
        }
        let gateway = Arc::new(MockGateway::new(responses));

        let report = ClaimChecker::new(gateway.clone(), repo.clone())
            .check(1, VerificationDepth::Quick, None)
            .await
            .unwrap();

        assert_eq!(gateway.calls_for(ModelTier::Final), 5);
        assert_eq!(report.extracted, 7);
        assert_eq!(report.disputed, 5);
        assert_eq!(report.high_risk, 5);
        assert_eq!(repo.claims().len(), 5);
        assert!(repo.claims().iter().all(|c| !c.verified));
        assert_eq!(
            report.recommendations,
            vec![
                "Review 5 high-risk claims before publication",
                "Overall claim confidence is low - consider additional research",
                "Investigate 5 disputed claims with contradictory evidence",
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_verification_call_is_skipped() {
        let repo = repository_with_source();
        let gateway = Arc::new(MockGateway::new(vec![
            text(r#"[{"claim": "A"}, {"claim": "B"}]"#),
            Err(GatewayError::Timeout),
            text(r#"{"verification_status": "unverified", "confidence_score": 0.5}"#),
        ]));

        let report = ClaimChecker::new(gateway, repo.clone())
            .check(1, VerificationDepth::Standard, None)
            .await
            .unwrap();

        assert_eq!(report.verdicts.len(), 1);
        assert_eq!(report.verdicts[0].claim.claim, "B");
        assert_eq!(report.unverified, 1);
        assert_eq!(repo.claims().len(), 1);
    }

    #[tokio::test]
    async fn test_extraction_transport_failure_is_an_error() {
        let repo = repository_with_source();
        let gateway = Arc::new(MockGateway::new(vec![Err(GatewayError::ConnectionError(
            "refused".into(),
        ))]));

        let err = ClaimChecker::new(gateway, repo.clone())
            .check(1, VerificationDepth::Standard, None)
            .await
            .unwrap_err();

        assert!(matches!(err, CheckClaimsError::Gateway(_)));
        assert!(repo.events().is_empty());
    }

    #[tokio::test]
    async fn test_requires_content_and_existing_brief() {
        let repo = Arc::new(InMemoryBriefRepository::with_brief(
            BriefPhase::Pending,
            ResearchProgress::default(),
        ));
        let gateway = Arc::new(MockGateway::new(vec![]));
        let checker = ClaimChecker::new(gateway.clone(), repo.clone());

        assert!(matches!(
            checker.check(1, VerificationDepth::Standard, None).await,
            Err(CheckClaimsError::Validation(ValidationError::Missing { field: "content" }))
        ));
        assert!(matches!(
            checker.check(9, VerificationDepth::Standard, None).await,
            Err(CheckClaimsError::BriefNotFound(_))
        ));
        assert_eq!(gateway.calls_for(ModelTier::Planning), 0);

        // Explicit content needs no stored sources
        let gateway = Arc::new(MockGateway::new(vec![text("[]")]));
        let report = ClaimChecker::new(gateway, repo)
            .check(1, VerificationDepth::Standard, Some("Ada wrote notes.".into()))
            .await
            .unwrap();
        assert_eq!(report.extracted, 0);
    }
}
