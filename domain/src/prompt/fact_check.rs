//! Prompt templates for claim extraction and verification

use crate::core::string::char_prefix;
use crate::research::claims::{ExtractedClaim, MAX_EXTRACTION_CHARS, MAX_SOURCE_CHARS};

pub struct FactCheckPromptTemplate;

impl FactCheckPromptTemplate {
    pub fn extraction_system() -> String {
        "You are a meticulous fact checker preparing a podcast episode. \
You extract verifiable factual claims from research material and respond only with JSON."
            .to_string()
    }

    /// Asks for a JSON array of claims found in `content`.
    pub fn extraction_request(content: &str) -> String {
        let content = char_prefix(content, MAX_EXTRACTION_CHARS);
        format!(
            r#"Extract the factual claims from the content below that should be verified before broadcast.

## Content

{content}

## Output

Return a JSON array. Each element is an object with:
- "claim": the claim, stated on its own
- "category": one of date, statistic, person, event, technical, other
- "confidence": how clearly the content states it (high, medium, low)
- "importance": how much the episode relies on it (critical, important, minor)
- "context": the surrounding sentence

Return [] if there are no verifiable claims."#
        )
    }

    pub fn verification_system() -> String {
        "You are a fact checker. You judge claims strictly against the sources provided \
and respond only with a JSON object."
            .to_string()
    }

    /// Asks for a verdict on `claim` against the `sources` block.
    pub fn verification_request(claim: &ExtractedClaim, sources: &str) -> String {
        let sources = char_prefix(sources, MAX_SOURCE_CHARS);
        let context = claim.context.as_deref().unwrap_or("none");
        format!(
            r#"Verify this claim against the sources.

Claim: {claim}
Category: {category}
Context: {context}

## Sources

{sources}

## Output

Return a JSON object with:
- "verification_status": verified, disputed, unverified or needs_more_sources
- "confidence_score": number between 0 and 1
- "evidence_found": supporting evidence, quoted or paraphrased
- "contradictions": contradicting evidence, if any
- "supporting_sources": titles of the sources that support the claim
- "recommendation": accept, flag, investigate_further or reject
- "notes": anything the host should know"#,
            claim = claim.claim,
            category = claim.category.as_deref().unwrap_or("other"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_request_caps_content() {
        let content = "a".repeat(MAX_EXTRACTION_CHARS + 500);
        let prompt = FactCheckPromptTemplate::extraction_request(&content);
        assert!(prompt.contains(&"a".repeat(MAX_EXTRACTION_CHARS)));
        assert!(!prompt.contains(&"a".repeat(MAX_EXTRACTION_CHARS + 1)));
    }

    #[test]
    fn test_verification_request_names_claim() {
        let claim = ExtractedClaim {
            claim: "The bridge opened in 1937".to_string(),
            category: Some("date".to_string()),
            confidence: None,
            importance: None,
            context: None,
        };
        let prompt = FactCheckPromptTemplate::verification_request(&claim, "Source: History");
        assert!(prompt.contains("Claim: The bridge opened in 1937"));
        assert!(prompt.contains("Category: date"));
        assert!(prompt.contains("Context: none"));
    }
}
