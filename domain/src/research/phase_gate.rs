//! Quality gate deciding whether a brief may move to its next phase.
//!
//! The decision is pure; committing it (and the audit event) is the
//! application layer's job.

use super::brief::BriefPhase;
use super::quality::QualityMetrics;
use serde::{Deserialize, Serialize};

/// Thresholds for InProgress → Completed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseThresholds {
    /// Minimum query completion, in percent
    pub completion_threshold: f64,
    pub min_verified_items: u32,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            completion_threshold: 80.0,
            min_verified_items: 5,
        }
    }
}

/// Outcome of evaluating the gate for the current phase.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Transition to `next`; `requirements_met` records why
    Advance {
        next: BriefPhase,
        requirements_met: Vec<String>,
    },
    /// Stay put; `shortfall` lists each unmet threshold
    Hold { shortfall: Vec<String> },
    /// Completed and Failed accept no transitions
    Terminal,
}

pub fn evaluate(
    current: BriefPhase,
    metrics: &QualityMetrics,
    force: bool,
    thresholds: &PhaseThresholds,
) -> GateDecision {
    match current {
        BriefPhase::Pending => GateDecision::Advance {
            next: BriefPhase::InProgress,
            requirements_met: vec!["Brief created and validated".to_string()],
        },
        BriefPhase::InProgress => {
            let passes = metrics.completion_percentage >= thresholds.completion_threshold
                && metrics.verified_items >= thresholds.min_verified_items;

            if passes || force {
                GateDecision::Advance {
                    next: BriefPhase::Completed,
                    requirements_met: vec![
                        format!("Query completion: {:.1}%", metrics.completion_percentage),
                        format!("Verified items: {}", metrics.verified_items),
                        format!("Claims gathered: {}", metrics.total_claims),
                    ],
                }
            } else {
                GateDecision::Hold {
                    shortfall: vec![
                        format!(
                            "Need {}% query completion (have {:.1}%)",
                            thresholds.completion_threshold, metrics.completion_percentage
                        ),
                        format!(
                            "Need {} verified items (have {})",
                            thresholds.min_verified_items, metrics.verified_items
                        ),
                        "Consider running more research cycles".to_string(),
                    ],
                }
            }
        }
        BriefPhase::Completed | BriefPhase::Failed => GateDecision::Terminal,
    }
}

/// Recommended follow-ups once a brief has entered `phase`.
pub fn next_actions(phase: BriefPhase) -> Vec<&'static str> {
    match phase {
        BriefPhase::Pending => vec![
            "Run clarification agent if needed",
            "Begin initial query formulation",
            "Start research cycle",
        ],
        BriefPhase::InProgress => vec![
            "Continue research cycles",
            "Monitor quality metrics",
            "Validate and verify sources",
        ],
        BriefPhase::Completed => vec![
            "Begin script generation",
            "Review and finalize manuscript",
            "Prepare for delivery",
        ],
        BriefPhase::Failed => vec!["No specific actions defined"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::progress::ResearchProgress;

    fn metrics(completed: u32, total: u32, verified_items: u32) -> QualityMetrics {
        QualityMetrics::from_progress(&ResearchProgress {
            total_queries: total,
            completed_queries: completed,
            verified_items,
            total_items: verified_items,
            ..Default::default()
        })
    }

    #[test]
    fn test_pending_advances_unconditionally() {
        let decision = evaluate(
            BriefPhase::Pending,
            &metrics(0, 0, 0),
            false,
            &PhaseThresholds::default(),
        );
        assert_eq!(
            decision,
            GateDecision::Advance {
                next: BriefPhase::InProgress,
                requirements_met: vec!["Brief created and validated".to_string()],
            }
        );
    }

    #[test]
    fn test_in_progress_passes_both_thresholds() {
        let decision = evaluate(
            BriefPhase::InProgress,
            &metrics(9, 10, 6),
            false,
            &PhaseThresholds::default(),
        );
        let GateDecision::Advance { next, requirements_met } = decision else {
            panic!("expected advance");
        };
        assert_eq!(next, BriefPhase::Completed);
        assert_eq!(requirements_met[0], "Query completion: 90.0%");
        assert_eq!(requirements_met[1], "Verified items: 6");
    }

    #[test]
    fn test_in_progress_shortfall_lists_both_thresholds() {
        let decision = evaluate(
            BriefPhase::InProgress,
            &metrics(5, 10, 2),
            false,
            &PhaseThresholds::default(),
        );
        let GateDecision::Hold { shortfall } = decision else {
            panic!("expected hold");
        };
        assert_eq!(shortfall[0], "Need 80% query completion (have 50.0%)");
        assert_eq!(shortfall[1], "Need 5 verified items (have 2)");
        assert_eq!(shortfall[2], "Consider running more research cycles");
    }

    #[test]
    fn test_one_threshold_is_not_enough() {
        let thresholds = PhaseThresholds::default();
        // Completion passes, verified items do not
        assert!(matches!(
            evaluate(BriefPhase::InProgress, &metrics(10, 10, 4), false, &thresholds),
            GateDecision::Hold { .. }
        ));
        // Verified items pass, completion does not
        assert!(matches!(
            evaluate(BriefPhase::InProgress, &metrics(7, 10, 9), false, &thresholds),
            GateDecision::Hold { .. }
        ));
    }

    #[test]
    fn test_force_overrides_thresholds() {
        let decision = evaluate(
            BriefPhase::InProgress,
            &metrics(0, 10, 0),
            true,
            &PhaseThresholds::default(),
        );
        assert!(matches!(
            decision,
            GateDecision::Advance { next: BriefPhase::Completed, .. }
        ));
    }

    #[test]
    fn test_terminal_phases_never_transition() {
        for phase in [BriefPhase::Completed, BriefPhase::Failed] {
            for force in [false, true] {
                let decision =
                    evaluate(phase, &metrics(10, 10, 10), force, &PhaseThresholds::default());
                assert_eq!(decision, GateDecision::Terminal);
            }
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let strict = PhaseThresholds {
            completion_threshold: 95.0,
            min_verified_items: 10,
        };
        let GateDecision::Hold { shortfall } =
            evaluate(BriefPhase::InProgress, &metrics(9, 10, 6), false, &strict)
        else {
            panic!("expected hold");
        };
        assert_eq!(shortfall[0], "Need 95% query completion (have 90.0%)");
    }

    #[test]
    fn test_next_actions() {
        assert_eq!(next_actions(BriefPhase::Completed)[0], "Begin script generation");
        assert_eq!(next_actions(BriefPhase::Failed), vec!["No specific actions defined"]);
    }
}
