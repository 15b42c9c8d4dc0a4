//! Quality aggregation over research counts.
//!
//! Everything here is a pure function of its inputs. Metrics are never
//! stored; callers recompute them from the current counts each time.

use super::progress::{QueryRecord, ResearchProgress};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Score at or above which a claim or source counts as "high".
pub const HIGH_SCORE: f64 = 0.8;

/// Query categories a well-rounded research plan covers.
pub const EXPECTED_QUERY_CATEGORIES: [&str; 6] = [
    "core_facts",
    "context",
    "events",
    "analysis",
    "perspectives",
    "timeline",
];

/// No single category should exceed this share of all queries.
const BALANCE_SHARE: f64 = 0.4;

/// Fewer average results per completed query than this reads as over-specific.
pub const MIN_RESULTS_PER_QUERY: f64 = 3.0;
/// More average results per completed query than this reads as too broad.
pub const MAX_RESULTS_PER_QUERY: f64 = 10.0;
/// A query below this share of the average result count is underperforming.
const UNDERPERFORMING_SHARE: f64 = 0.7;

pub fn completion_percentage(completed: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(completed) * 100.0 / f64::from(total)
}

pub fn average_confidence(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// Combined trust in verified content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentReliability {
    High,
    Medium,
    Low,
}

impl ContentReliability {
    pub fn as_str(&self) -> &str {
        match self {
            ContentReliability::High => "high",
            ContentReliability::Medium => "medium",
            ContentReliability::Low => "low",
        }
    }
}

impl std::fmt::Display for ContentReliability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn content_reliability(
    avg_verification_confidence: f64,
    avg_credibility: f64,
) -> ContentReliability {
    let combined = (avg_verification_confidence + avg_credibility) / 2.0;
    if combined >= 0.8 {
        ContentReliability::High
    } else if combined >= 0.6 {
        ContentReliability::Medium
    } else {
        ContentReliability::Low
    }
}

/// Overall grade of a research effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResearchQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ResearchQuality {
    pub fn as_str(&self) -> &str {
        match self {
            ResearchQuality::Excellent => "excellent",
            ResearchQuality::Good => "good",
            ResearchQuality::Fair => "fair",
            ResearchQuality::Poor => "poor",
        }
    }
}

impl std::fmt::Display for ResearchQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Average of three ratios; each denominator is floored to 1.
pub fn research_quality(
    high_conf_claims: u32,
    total_claims: u32,
    verified_count: u32,
    total_verified: u32,
    high_cred_sources: u32,
    total_sources: u32,
) -> ResearchQuality {
    let ratio = |num: u32, den: u32| f64::from(num) / f64::from(den.max(1));
    let factors = [
        ratio(high_conf_claims, total_claims),
        ratio(verified_count, total_verified),
        ratio(high_cred_sources, total_sources),
    ];
    let avg = factors.iter().sum::<f64>() / factors.len() as f64;

    if avg >= 0.7 {
        ResearchQuality::Excellent
    } else if avg >= 0.5 {
        ResearchQuality::Good
    } else if avg >= 0.3 {
        ResearchQuality::Fair
    } else {
        ResearchQuality::Poor
    }
}

/// Aggregated quality snapshot of one brief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// In [0, 100]
    pub completion_percentage: f64,
    pub verified_items: u32,
    pub verified_claims: u32,
    pub total_claims: u32,
    /// Mean claim veracity in [0, 1]
    pub average_confidence: f64,
    /// Mean source credibility in [0, 1]
    pub average_credibility: f64,
    pub content_reliability: ContentReliability,
    pub research_quality: ResearchQuality,
}

impl QualityMetrics {
    pub fn from_progress(progress: &ResearchProgress) -> Self {
        let avg_confidence = average_confidence(&progress.claim_scores);
        let avg_credibility = average_confidence(&progress.item_credibility);

        Self {
            completion_percentage: completion_percentage(
                progress.completed_queries,
                progress.total_queries,
            ),
            verified_items: progress.verified_items,
            verified_claims: progress.verified_claims,
            total_claims: progress.total_claims,
            average_confidence: avg_confidence,
            average_credibility: avg_credibility,
            content_reliability: content_reliability(avg_confidence, avg_credibility),
            research_quality: research_quality(
                count_high(&progress.claim_scores),
                progress.total_claims,
                progress.verified_claims,
                progress.total_claims,
                count_high(&progress.item_credibility),
                progress.total_items,
            ),
        }
    }
}

fn count_high(scores: &[f64]) -> u32 {
    scores.iter().filter(|s| **s >= HIGH_SCORE).count() as u32
}

/// How evenly queries are spread across categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageBalance {
    Balanced,
    Unbalanced,
    NoQueries,
}

impl CoverageBalance {
    pub fn as_str(&self) -> &str {
        match self {
            CoverageBalance::Balanced => "balanced",
            CoverageBalance::Unbalanced => "unbalanced",
            CoverageBalance::NoQueries => "no_queries",
        }
    }
}

impl std::fmt::Display for CoverageBalance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryCoverage {
    pub categories_covered: Vec<String>,
    pub category_distribution: BTreeMap<String, usize>,
    /// Distinct categories over the expected six, as a percentage (1 decimal)
    pub coverage_score: f64,
    pub balance: CoverageBalance,
}

/// Analyze query categories. Missing categories count as `unknown`.
pub fn query_coverage<'a>(categories: impl IntoIterator<Item = Option<&'a str>>) -> QueryCoverage {
    let mut distribution: BTreeMap<String, usize> = BTreeMap::new();
    let mut total = 0usize;
    for category in categories {
        *distribution
            .entry(category.unwrap_or("unknown").to_string())
            .or_default() += 1;
        total += 1;
    }

    if total == 0 {
        return QueryCoverage {
            categories_covered: Vec::new(),
            category_distribution: distribution,
            coverage_score: 0.0,
            balance: CoverageBalance::NoQueries,
        };
    }

    let raw_score = distribution.len() as f64 / EXPECTED_QUERY_CATEGORIES.len() as f64 * 100.0;
    let max_count = distribution.values().copied().max().unwrap_or(0);
    let balance = if max_count as f64 <= total as f64 * BALANCE_SHARE {
        CoverageBalance::Balanced
    } else {
        CoverageBalance::Unbalanced
    };

    QueryCoverage {
        categories_covered: distribution.keys().cloned().collect(),
        category_distribution: distribution,
        coverage_score: (raw_score * 10.0).round() / 10.0,
        balance,
    }
}

/// Result counts of completed queries, with refinement advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPerformance {
    pub completed_queries: usize,
    pub total_results: u32,
    /// Over completed queries, rounded to 1 decimal
    pub average_results: f64,
    pub underperforming: usize,
    pub zero_results: usize,
    pub recommendations: Vec<String>,
}

/// Analyze how well completed queries performed.
///
/// Pending queries carry no result count yet and are ignored.
pub fn query_performance(queries: &[QueryRecord]) -> QueryPerformance {
    let completed: Vec<u32> = queries
        .iter()
        .filter(|q| q.completed)
        .map(|q| q.results_count)
        .collect();

    if completed.is_empty() {
        return QueryPerformance {
            completed_queries: 0,
            total_results: 0,
            average_results: 0.0,
            underperforming: 0,
            zero_results: 0,
            recommendations: vec!["No performance data available".to_string()],
        };
    }

    let total_results: u32 = completed.iter().sum();
    let average = f64::from(total_results) / completed.len() as f64;
    let underperforming = completed
        .iter()
        .filter(|&&n| f64::from(n) < average * UNDERPERFORMING_SHARE)
        .count();
    let zero_results = completed.iter().filter(|&&n| n == 0).count();

    let mut recommendations = Vec::new();
    if underperforming > 0 {
        recommendations.push(format!(
            "Consider refining {} underperforming queries",
            underperforming
        ));
    }
    if zero_results > 0 {
        recommendations.push(format!(
            "Replace {} queries that returned no results",
            zero_results
        ));
    }
    if average < MIN_RESULTS_PER_QUERY {
        recommendations
            .push("Overall query specificity may be too high - consider broader terms".to_string());
    } else if average > MAX_RESULTS_PER_QUERY {
        recommendations
            .push("Queries may be too broad - consider more specific targeting".to_string());
    }
    if recommendations.is_empty() {
        recommendations.push("Query performance looks good - maintain current strategy".to_string());
    }

    QueryPerformance {
        completed_queries: completed.len(),
        total_results,
        average_results: (average * 10.0).round() / 10.0,
        underperforming,
        zero_results,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_percentage() {
        assert_eq!(completion_percentage(0, 0), 0.0);
        assert_eq!(completion_percentage(9, 10), 90.0);
        assert_eq!(completion_percentage(5, 10), 50.0);
    }

    #[test]
    fn test_completion_is_non_decreasing() {
        let total = 10;
        let mut last = 0.0;
        for completed in 0..=total {
            let pct = completion_percentage(completed, total);
            assert!(pct >= last);
            last = pct;
        }
    }

    #[test]
    fn test_average_confidence() {
        assert_eq!(average_confidence(&[]), 0.0);
        assert!((average_confidence(&[0.5, 1.0]) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_content_reliability_bands() {
        assert_eq!(content_reliability(0.9, 0.7), ContentReliability::High);
        assert_eq!(content_reliability(0.6, 0.6), ContentReliability::Medium);
        assert_eq!(content_reliability(0.2, 0.9), ContentReliability::Low);
    }

    #[test]
    fn test_research_quality_floors_denominators() {
        // All zero: every ratio is 0/1
        assert_eq!(research_quality(0, 0, 0, 0, 0, 0), ResearchQuality::Poor);
        assert_eq!(research_quality(8, 10, 9, 10, 7, 10), ResearchQuality::Excellent);
        assert_eq!(research_quality(5, 10, 5, 10, 5, 10), ResearchQuality::Good);
        assert_eq!(research_quality(4, 10, 4, 10, 4, 10), ResearchQuality::Fair);
    }

    #[test]
    fn test_metrics_from_progress() {
        let progress = ResearchProgress {
            total_queries: 10,
            completed_queries: 9,
            total_items: 8,
            verified_items: 6,
            total_claims: 4,
            verified_claims: 3,
            claim_scores: vec![0.9, 0.8, 0.7, 0.6],
            item_credibility: vec![0.9; 8],
        };

        let metrics = QualityMetrics::from_progress(&progress);
        assert_eq!(metrics.completion_percentage, 90.0);
        assert_eq!(metrics.verified_items, 6);
        assert!((metrics.average_confidence - 0.75).abs() < 1e-9);
        assert_eq!(metrics.content_reliability, ContentReliability::High);
        // (2/4 + 3/4 + 8/8) / 3 = 0.75
        assert_eq!(metrics.research_quality, ResearchQuality::Excellent);
    }

    #[test]
    fn test_query_coverage() {
        let coverage = query_coverage([
            Some("core_facts"),
            Some("context"),
            Some("events"),
            Some("analysis"),
            None,
        ]);
        assert_eq!(coverage.categories_covered.len(), 5);
        assert_eq!(coverage.coverage_score, 83.3);
        assert_eq!(coverage.balance, CoverageBalance::Balanced);
        assert_eq!(coverage.category_distribution["unknown"], 1);

        let skewed = query_coverage([Some("events"), Some("events"), Some("timeline")]);
        assert_eq!(skewed.balance, CoverageBalance::Unbalanced);

        let empty = query_coverage(std::iter::empty());
        assert_eq!(empty.balance, CoverageBalance::NoQueries);
        assert_eq!(empty.coverage_score, 0.0);
    }

    fn record(completed: bool, results_count: u32) -> QueryRecord {
        QueryRecord {
            query_text: "q".to_string(),
            category: None,
            completed,
            results_count,
        }
    }

    #[test]
    fn test_query_performance_flags_weak_queries() {
        let performance =
            query_performance(&[record(true, 8), record(true, 0), record(true, 7), record(false, 0)]);
        assert_eq!(performance.completed_queries, 3);
        assert_eq!(performance.total_results, 15);
        assert_eq!(performance.average_results, 5.0);
        assert_eq!(performance.underperforming, 1);
        assert_eq!(performance.zero_results, 1);
        assert_eq!(
            performance.recommendations,
            vec![
                "Consider refining 1 underperforming queries",
                "Replace 1 queries that returned no results",
            ]
        );
    }

    #[test]
    fn test_query_performance_breadth_advice() {
        let narrow = query_performance(&[record(true, 2), record(true, 2)]);
        assert_eq!(
            narrow.recommendations,
            vec!["Overall query specificity may be too high - consider broader terms"]
        );

        let broad = query_performance(&[record(true, 12), record(true, 14)]);
        assert_eq!(
            broad.recommendations,
            vec!["Queries may be too broad - consider more specific targeting"]
        );

        let good = query_performance(&[record(true, 5), record(true, 6)]);
        assert_eq!(
            good.recommendations,
            vec!["Query performance looks good - maintain current strategy"]
        );
    }

    #[test]
    fn test_query_performance_without_completed_queries() {
        let performance = query_performance(&[record(false, 0)]);
        assert_eq!(performance.completed_queries, 0);
        assert_eq!(performance.average_results, 0.0);
        assert_eq!(performance.recommendations, vec!["No performance data available"]);
    }
}
