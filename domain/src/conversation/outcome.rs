//! Loop phases and terminal outcomes

use super::state::ConversationState;

/// Phase of a planning loop run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopPhase {
    Planning,
    ExecutingTools,
    Done,
    BoundExceeded,
    Aborted,
}

impl LoopPhase {
    pub fn as_str(&self) -> &str {
        match self {
            LoopPhase::Planning => "planning",
            LoopPhase::ExecutingTools => "executing_tools",
            LoopPhase::Done => "done",
            LoopPhase::BoundExceeded => "bound_exceeded",
            LoopPhase::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LoopPhase::Done | LoopPhase::BoundExceeded | LoopPhase::Aborted
        )
    }
}

impl std::fmt::Display for LoopPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a run stopped without an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// The model or a tool channel was unreachable
    TransportError(String),
    Cancelled,
    DeadlineExceeded,
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbortReason::TransportError(msg) => write!(f, "transport error: {}", msg),
            AbortReason::Cancelled => write!(f, "cancelled"),
            AbortReason::DeadlineExceeded => write!(f, "deadline exceeded"),
        }
    }
}

/// Result of a full run (planning loop plus final synthesis).
///
/// Hitting the iteration bound is a partial success: the transcript
/// gathered so far is still synthesized into an answer.
#[derive(Debug, Clone)]
pub enum LoopOutcome {
    Completed {
        answer: String,
        transcript: ConversationState,
    },
    BoundExceeded {
        answer: String,
        transcript: ConversationState,
    },
    Aborted {
        reason: AbortReason,
        transcript: ConversationState,
    },
}

impl LoopOutcome {
    pub fn answer(&self) -> Option<&str> {
        match self {
            LoopOutcome::Completed { answer, .. } | LoopOutcome::BoundExceeded { answer, .. } => {
                Some(answer)
            }
            LoopOutcome::Aborted { .. } => None,
        }
    }

    pub fn transcript(&self) -> &ConversationState {
        match self {
            LoopOutcome::Completed { transcript, .. }
            | LoopOutcome::BoundExceeded { transcript, .. }
            | LoopOutcome::Aborted { transcript, .. } => transcript,
        }
    }

    pub fn bound_exceeded(&self) -> bool {
        matches!(self, LoopOutcome::BoundExceeded { .. })
    }

    pub fn phase(&self) -> LoopPhase {
        match self {
            LoopOutcome::Completed { .. } => LoopPhase::Done,
            LoopOutcome::BoundExceeded { .. } => LoopPhase::BoundExceeded,
            LoopOutcome::Aborted { .. } => LoopPhase::Aborted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let done = LoopOutcome::Completed {
            answer: "42".to_string(),
            transcript: ConversationState::new("q"),
        };
        assert_eq!(done.answer(), Some("42"));
        assert!(!done.bound_exceeded());
        assert_eq!(done.phase(), LoopPhase::Done);

        let aborted = LoopOutcome::Aborted {
            reason: AbortReason::Cancelled,
            transcript: ConversationState::new("q"),
        };
        assert_eq!(aborted.answer(), None);
        assert_eq!(aborted.transcript().len(), 1);
        assert!(aborted.phase().is_terminal());
    }

    #[test]
    fn test_abort_reason_display() {
        assert_eq!(
            AbortReason::TransportError("503".into()).to_string(),
            "transport error: 503"
        );
        assert!(!LoopPhase::Planning.is_terminal());
    }
}
