//! Planning loop use case.
//!
//! Drives the conversation between the planning model tier and the tools:
//!
//! ```text
//! Planning ──(tool calls)──▶ ExecutingTools ──▶ Planning ──▶ …
//!    │                                               │
//!    └──(no tool calls)──▶ Done        (bound hit)──▶ BoundExceeded
//!
//! any step ──(transport failure / cancel / deadline)──▶ Aborted
//! ```
//!
//! Tools run one at a time in the order the model requested them. A tool
//! failure is written into the transcript as that call's result; only a
//! transport failure ends the run.

use crate::config::LoopParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, LOOP_FINISHED, NoConversationLogger, PLANNING_CALL,
    TOOL_CALL, TOOL_RESULT,
};
use crate::ports::generation::{
    GatewayError, GenerationGateway, GenerationRequest, ModelTier, ToolChoice,
};
use crate::ports::progress::LoopProgressNotifier;
use crate::ports::tool_executor::{ToolExecutorPort, ToolInvokeError};
use crate::ports::tool_schema::ToolSchemaPort;
use crate::use_cases::shared::{check_abort, race};
use deepcast_domain::core::string::truncate;
use deepcast_domain::tool::{DefaultToolValidator, ToolCall, ToolError, ToolValidator};
use deepcast_domain::{AbortReason, ConversationState, GenerationResponse, LoopPhase};
use serde_json::json;
use std::sync::Arc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How a planning run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanningEnd {
    /// The model stopped requesting tools
    Done,
    /// `max_iterations` planning calls were made and the model still wanted tools
    BoundExceeded,
    Aborted(AbortReason),
}

/// Transcript and termination of one planning run.
#[derive(Debug, Clone)]
pub struct PlanningRun {
    pub transcript: ConversationState,
    /// Planning calls issued
    pub iterations: usize,
    pub end: PlanningEnd,
}

impl PlanningRun {
    pub fn phase(&self) -> LoopPhase {
        match self.end {
            PlanningEnd::Done => LoopPhase::Done,
            PlanningEnd::BoundExceeded => LoopPhase::BoundExceeded,
            PlanningEnd::Aborted(_) => LoopPhase::Aborted,
        }
    }
}

/// Use case for running the planning loop.
pub struct PlanningLoop {
    gateway: Arc<dyn GenerationGateway>,
    tool_executor: Arc<dyn ToolExecutorPort>,
    tool_schema: Arc<dyn ToolSchemaPort>,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl Clone for PlanningLoop {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            tool_executor: self.tool_executor.clone(),
            tool_schema: self.tool_schema.clone(),
            conversation_logger: self.conversation_logger.clone(),
            cancellation_token: self.cancellation_token.clone(),
        }
    }
}

impl PlanningLoop {
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

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Run the loop until the model stops, the bound is hit, or the run aborts.
    pub async fn run(
        &self,
        task: &str,
        instructions: &str,
        params: &LoopParams,
        deadline: Option<Instant>,
        progress: &dyn LoopProgressNotifier,
    ) -> PlanningRun {
        info!("Starting planning loop: {}", truncate(task, 100));

        let tools = self
            .tool_schema
            .all_tools_schema(self.tool_executor.catalog());
        debug!("{} tools available", tools.len());

        let mut transcript = ConversationState::new(task);
        let mut iterations = 0usize;

        let end = loop {
            if let Err(reason) = check_abort(&self.cancellation_token, deadline) {
                break PlanningEnd::Aborted(reason);
            }
            if iterations >= params.max_iterations {
                warn!(
                    "Planning loop hit max_iterations ({}) with tools still requested",
                    params.max_iterations
                );
                break PlanningEnd::BoundExceeded;
            }

            iterations += 1;
            progress.on_phase_change(LoopPhase::Planning);
            progress.on_planning_start(iterations, params.max_iterations);
            self.conversation_logger.log(ConversationEvent::new(
                PLANNING_CALL,
                json!({
                    "iteration": iterations,
                    "messages": transcript.len(),
                }),
            ));

            let request = GenerationRequest::new(instructions, transcript.messages().to_vec())
                .with_tools(tools.clone())
                .with_tool_choice(ToolChoice::Auto);

            let response = match self.plan(&request, deadline, progress).await {
                Ok(response) => response,
                Err(reason) => break PlanningEnd::Aborted(reason),
            };

            let text = response.text_content();
            let text = text.trim();
            if !text.is_empty() {
                transcript.push_assistant(text);
            }

            let calls = response.tool_calls();
            progress.on_planning_complete(iterations, calls.len());
            if calls.is_empty() {
                break PlanningEnd::Done;
            }

            debug!(
                "Iteration {}/{}: executing {} tool calls",
                iterations,
                params.max_iterations,
                calls.len()
            );
            progress.on_phase_change(LoopPhase::ExecutingTools);

            if let Err(reason) = self
                .execute_batch(calls, &mut transcript, deadline, progress)
                .await
            {
                break PlanningEnd::Aborted(reason);
            }
        };

        match &end {
            PlanningEnd::Done => info!("Planning finished after {} iterations", iterations),
            PlanningEnd::BoundExceeded => {}
            PlanningEnd::Aborted(reason) => warn!("Planning aborted: {}", reason),
        }

        let run = PlanningRun {
            transcript,
            iterations,
            end,
        };
        self.conversation_logger.log(ConversationEvent::new(
            LOOP_FINISHED,
            json!({
                "phase": run.phase().as_str(),
                "iterations": run.iterations,
                "tool_calls": run.transcript.tool_call_count(),
            }),
        ));
        run
    }

    /// One planning call, streamed and raced against cancellation and deadline.
    async fn plan(
        &self,
        request: &GenerationRequest,
        deadline: Option<Instant>,
        progress: &dyn LoopProgressNotifier,
    ) -> Result<GenerationResponse, AbortReason> {
        let call = async {
            let handle = self
                .gateway
                .generate_streaming(ModelTier::Planning, request)
                .await?;
            handle.collect_with(|chunk| progress.on_model_chunk(chunk)).await
        };

        race(call, &self.cancellation_token, deadline)
            .await?
            .map_err(|e: GatewayError| AbortReason::TransportError(e.to_string()))
    }

    /// Append and dispatch each call in order.
    async fn execute_batch(
        &self,
        calls: Vec<ToolCall>,
        transcript: &mut ConversationState,
        deadline: Option<Instant>,
        progress: &dyn LoopProgressNotifier,
    ) -> Result<(), AbortReason> {
        for call in calls {
            check_abort(&self.cancellation_token, deadline)?;

            if let Err(e) = transcript.push_request(call.clone()) {
                warn!("Skipping tool call: {}", e);
                continue;
            }

            self.conversation_logger.log(ConversationEvent::new(
                TOOL_CALL,
                json!({
                    "call_id": call.call_id.as_str(),
                    "tool": call.tool_name,
                    "arguments": call.arguments_json(),
                }),
            ));
            progress.on_tool_start(&call);

            let started = std::time::Instant::now();
            let result = race(self.dispatch(&call), &self.cancellation_token, deadline).await?;
            let duration_ms = started.elapsed().as_millis() as u64;

            let (output, success) = match result {
                Ok(output) => (output, true),
                Err(ToolInvokeError::Tool(err)) => {
                    debug!("Tool '{}' failed: {}", call.tool_name, err);
                    (err.to_string(), false)
                }
                Err(ToolInvokeError::Transport(msg)) => {
                    progress.on_tool_complete(&call, false, duration_ms);
                    return Err(AbortReason::TransportError(msg));
                }
            };

            progress.on_tool_complete(&call, success, duration_ms);
            self.conversation_logger.log(ConversationEvent::new(
                TOOL_RESULT,
                json!({
                    "call_id": call.call_id.as_str(),
                    "tool": call.tool_name,
                    "success": success,
                    "duration_ms": duration_ms,
                    "bytes": output.len(),
                }),
            ));

            if let Err(e) = transcript.push_result(&call.call_id, output) {
                warn!("Dropping tool result: {}", e);
            }
        }
        Ok(())
    }

    /// Validate against the catalog, then execute.
    async fn dispatch(&self, call: &ToolCall) -> Result<String, ToolInvokeError> {
        let Some(descriptor) = self.tool_executor.catalog().get(&call.tool_name) else {
            return Err(ToolError::unknown_tool(&call.tool_name).into());
        };
        DefaultToolValidator.validate(call, descriptor)?;
        self.tool_executor.execute(call).await
    }
}
