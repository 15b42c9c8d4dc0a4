//! Final synthesis use case.
//!
//! Issues exactly one call to the final model tier with tool use disabled,
//! asking it to answer from the transcript alone.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, FINAL_SYNTHESIS, NoConversationLogger,
};
use crate::ports::generation::{
    GatewayError, GenerationGateway, GenerationRequest, ModelTier, ToolChoice,
};
use crate::ports::progress::LoopProgressNotifier;
use deepcast_domain::ConversationState;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct FinalSynthesizer {
    gateway: Arc<dyn GenerationGateway>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl FinalSynthesizer {
    pub fn new(gateway: Arc<dyn GenerationGateway>) -> Self {
        Self {
            gateway,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Summarize `transcript` into the final answer.
    ///
    /// `tools` are sent for context only; `tool_choice` is `none`.
    pub async fn synthesize(
        &self,
        instructions: &str,
        transcript: &ConversationState,
        tools: Vec<serde_json::Value>,
        progress: &dyn LoopProgressNotifier,
    ) -> Result<String, GatewayError> {
        debug!(
            "Synthesizing answer from {} messages ({} tool calls)",
            transcript.len(),
            transcript.tool_call_count()
        );
        progress.on_synthesis_start();

        let request = GenerationRequest::new(instructions, transcript.messages().to_vec())
            .with_tools(tools)
            .with_tool_choice(ToolChoice::None);

        let response = self
            .gateway
            .generate_streaming(ModelTier::Final, &request)
            .await?
            .collect_with(|chunk| progress.on_model_chunk(chunk))
            .await?;

        if response.has_tool_calls() {
            warn!("Final tier requested tools despite tool_choice=none; ignoring them");
        }

        let answer = response.text_content().trim().to_string();
        self.conversation_logger.log(ConversationEvent::new(
            FINAL_SYNTHESIS,
            json!({
                "model": response.model,
                "bytes": answer.len(),
                "text": answer,
            }),
        ));
        Ok(answer)
    }
}
