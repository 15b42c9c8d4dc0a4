//! Run Research use case.
//!
//! Composes the [`PlanningLoop`] and the [`FinalSynthesizer`]:
//! 1. Plan and call tools with the planning tier until the model stops
//!    (or the iteration bound is hit)
//! 2. Summarize the transcript once with the final tier
//!
//! A bound-exceeded loop is a partial success and is still synthesized.
//! An aborted loop is returned without synthesis.

use crate::config::LoopParams;
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::generation::{GatewayError, GenerationGateway};
use crate::ports::progress::LoopProgressNotifier;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::tool_schema::ToolSchemaPort;
use crate::use_cases::final_synthesis::FinalSynthesizer;
use crate::use_cases::planning_loop::{PlanningEnd, PlanningLoop};
use crate::use_cases::shared::race;
use deepcast_domain::core::string::truncate;
use deepcast_domain::{LoopOutcome, ResearchPromptTemplate};
use std::sync::Arc;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Errors that can occur during a research run.
///
/// Aborts inside the planning loop are not errors; they are reported as
/// [`LoopOutcome::Aborted`].
#[derive(Error, Debug)]
pub enum RunResearchError {
    #[error("Task must not be empty")]
    EmptyTask,

    #[error("Final synthesis failed: {0}")]
    Transport(#[from] GatewayError),
}

/// Input for the [`RunResearchUseCase`].
#[derive(Debug, Clone)]
pub struct RunResearchInput {
    pub task: String,
    pub params: LoopParams,
}

impl RunResearchInput {
    pub fn new(task: impl Into<String>, params: LoopParams) -> Self {
        Self {
            task: task.into(),
            params,
        }
    }
}

/// Use case for a full research run (planning loop plus final synthesis).
pub struct RunResearchUseCase {
    gateway: Arc<dyn GenerationGateway>,
    tool_executor: Arc<dyn ToolExecutorPort>,
    tool_schema: Arc<dyn ToolSchemaPort>,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl RunResearchUseCase {
    pub fn new(
        gateway: Arc<dyn GenerationGateway>,
        tool_executor: Arc<dyn ToolExecutorPort>,
        tool_schema: Arc<dyn ToolSchemaPort>,
    ) -> Self {
        Self {
            gateway,
            tool_executor,
            tool_schema,
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub async fn execute(
        &self,
        input: RunResearchInput,
        progress: &dyn LoopProgressNotifier,
    ) -> Result<LoopOutcome, RunResearchError> {
        let task = input.task.trim();
        if task.is_empty() {
            return Err(RunResearchError::EmptyTask);
        }
        info!("Starting research run: {}", truncate(task, 100));

        let deadline = input.params.timeout.map(|t| Instant::now() + t);
        let catalog = self.tool_executor.catalog();

        let mut planning = PlanningLoop::new(
            self.gateway.clone(),
            self.tool_executor.clone(),
            self.tool_schema.clone(),
        )
        .with_conversation_logger(self.conversation_logger.clone());
        if let Some(token) = &self.cancellation_token {
            planning = planning.with_cancellation(token.clone());
        }

        let run = planning
            .run(
                task,
                &ResearchPromptTemplate::planning_system(catalog),
                &input.params,
                deadline,
                progress,
            )
            .await;

        let phase = run.phase();
        let bound_exceeded = match run.end {
            PlanningEnd::Done => false,
            PlanningEnd::BoundExceeded => true,
            PlanningEnd::Aborted(reason) => {
                progress.on_finished(phase);
                return Ok(LoopOutcome::Aborted {
                    reason,
                    transcript: run.transcript,
                });
            }
        };

        let synthesizer = FinalSynthesizer::new(self.gateway.clone())
            .with_conversation_logger(self.conversation_logger.clone());
        let synthesis_instructions = ResearchPromptTemplate::synthesis_system(catalog);
        let synthesis = synthesizer.synthesize(
            &synthesis_instructions,
            &run.transcript,
            self.tool_schema.all_tools_schema(catalog),
            progress,
        );

        let raced = race(synthesis, &self.cancellation_token, deadline).await;
        let answer = match raced {
            Ok(answer) => answer?,
            Err(reason) => {
                progress.on_finished(phase);
                return Ok(LoopOutcome::Aborted {
                    reason,
                    transcript: run.transcript,
                });
            }
        };

        info!(
            "Research run finished: {} planning calls, {} tool calls",
            run.iterations,
            run.transcript.tool_call_count()
        );
        progress.on_finished(phase);

        Ok(if bound_exceeded {
            LoopOutcome::BoundExceeded {
                answer,
                transcript: run.transcript,
            }
        } else {
            LoopOutcome::Completed {
                answer,
                transcript: run.transcript,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::generation::ModelTier;
    use crate::ports::progress::NoLoopProgress;
    use crate::use_cases::planning_loop::tests::{
        MockGateway, MockToolExecutor, NameOnlySchema, lookup, tool_response,
    };
    use deepcast_domain::{AbortReason, GenerationResponse};

    fn use_case(gateway: Arc<MockGateway>) -> RunResearchUseCase {
        RunResearchUseCase::new(
            gateway,
            Arc::new(MockToolExecutor::new(vec![])),
            Arc::new(NameOnlySchema),
        )
    }

    #[tokio::test]
    async fn test_k_rounds_then_single_synthesis() {
        let gateway = Arc::new(MockGateway::new(vec![
            Ok(tool_response("", vec![lookup("c1", "a")])),
            Ok(tool_response("", vec![lookup("c2", "b")])),
            Ok(GenerationResponse::from_text("I have enough")),
            Ok(GenerationResponse::from_text("Final answer")),
        ]));

        let outcome = use_case(gateway.clone())
            .execute(
                RunResearchInput::new("Who is Ada Lovelace?", LoopParams::default()),
                &NoLoopProgress,
            )
            .await
            .unwrap();

        assert_eq!(outcome.answer(), Some("Final answer"));
        assert!(!outcome.bound_exceeded());
        assert_eq!(gateway.calls_for(ModelTier::Planning), 3);
        assert_eq!(gateway.calls_for(ModelTier::Final), 1);

        let requests = gateway.requests.lock().unwrap();
        let (_, final_request) = requests.last().unwrap();
        assert!(final_request.instructions.contains("without calling any more tools"));
    }

    #[tokio::test]
    async fn test_bound_exceeded_is_still_synthesized() {
        let gateway = Arc::new(MockGateway::new(vec![
            Ok(tool_response("", vec![lookup("c1", "a")])),
            Ok(tool_response("", vec![lookup("c2", "b")])),
            Ok(GenerationResponse::from_text("Partial answer")),
        ]));

        let outcome = use_case(gateway.clone())
            .execute(
                RunResearchInput::new("task", LoopParams::default().with_max_iterations(2)),
                &NoLoopProgress,
            )
            .await
            .unwrap();

        assert!(outcome.bound_exceeded());
        assert_eq!(outcome.answer(), Some("Partial answer"));
        assert_eq!(outcome.transcript().tool_call_count(), 2);
        assert_eq!(gateway.calls_for(ModelTier::Planning), 2);
    }

    #[tokio::test]
    async fn test_aborted_run_skips_synthesis() {
        let gateway = Arc::new(MockGateway::new(vec![Err(GatewayError::ConnectionError(
            "refused".into(),
        ))]));

        let outcome = use_case(gateway.clone())
            .execute(RunResearchInput::new("task", LoopParams::default()), &NoLoopProgress)
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            LoopOutcome::Aborted { reason: AbortReason::TransportError(_), .. }
        ));
        assert_eq!(gateway.calls_for(ModelTier::Final), 0);
    }

    #[tokio::test]
    async fn test_synthesis_failure_is_transport_error() {
        let gateway = Arc::new(MockGateway::new(vec![
            Ok(GenerationResponse::from_text("no tools needed")),
            Err(GatewayError::Timeout),
        ]));

        let err = use_case(gateway)
            .execute(RunResearchInput::new("task", LoopParams::default()), &NoLoopProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, RunResearchError::Transport(GatewayError::Timeout)));
    }

    #[tokio::test]
    async fn test_empty_task_rejected() {
        let gateway = Arc::new(MockGateway::new(vec![]));
        let err = use_case(gateway)
            .execute(RunResearchInput::new("   ", LoopParams::default()), &NoLoopProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, RunResearchError::EmptyTask));
    }
}
