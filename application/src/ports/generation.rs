//! Generation gateway port
//!
//! Defines the interface for asking a text-generation model what to do next.

use async_trait::async_trait;
use deepcast_domain::{GenerationResponse, Message, StreamEvent};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during gateway operations.
///
/// Every variant means the model channel itself failed; callers treat
/// them as transport failures.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Stream closed before completion")]
    TransportClosed,
}

/// Which model tier to call.
///
/// The planning tier is cheap and called repeatedly; the final tier is
/// called once per run to write the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelTier {
    Planning,
    Final,
}

impl ModelTier {
    pub fn as_str(&self) -> &str {
        match self {
            ModelTier::Planning => "planning",
            ModelTier::Final => "final",
        }
    }
}

impl std::fmt::Display for ModelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the model may request tools in this call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolChoice {
    #[default]
    Auto,
    None,
}

impl ToolChoice {
    pub fn as_str(&self) -> &str {
        match self {
            ToolChoice::Auto => "auto",
            ToolChoice::None => "none",
        }
    }
}

/// One generation call: instructions, full transcript and exported tools.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub instructions: String,
    pub messages: Vec<Message>,
    /// Model-facing tool schemas (already strict-normalized)
    pub tools: Vec<serde_json::Value>,
    pub tool_choice: ToolChoice,
}

impl GenerationRequest {
    pub fn new(instructions: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            instructions: instructions.into(),
            messages,
            tools: Vec::new(),
            tool_choice: ToolChoice::Auto,
        }
    }

    pub fn with_tools(mut self, tools: Vec<serde_json::Value>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = choice;
        self
    }
}

/// Handle for receiving streaming events from a generation call.
///
/// Wraps an `mpsc::Receiver<StreamEvent>`; the stream is consumed once.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Wrap an already complete response as a single-event stream.
    pub fn completed(response: GenerationResponse) -> Self {
        let (tx, rx) = mpsc::channel(1);
        // Capacity 1 and a fresh channel: this cannot fail
        let _ = tx.try_send(StreamEvent::Completed(response));
        Self::new(rx)
    }

    /// Consume the stream, forwarding each text delta to `on_delta`.
    ///
    /// Closing the channel before a terminal event is a transport failure.
    pub async fn collect_with(
        mut self,
        mut on_delta: impl FnMut(&str) + Send,
    ) -> Result<GenerationResponse, GatewayError> {
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => on_delta(&chunk),
                StreamEvent::Completed(response) => return Ok(response),
                StreamEvent::Error(e) => return Err(GatewayError::RequestFailed(e)),
            }
        }
        Err(GatewayError::TransportClosed)
    }

    pub async fn collect(self) -> Result<GenerationResponse, GatewayError> {
        self.collect_with(|_| {}).await
    }
}

/// Gateway for model communication
///
/// Tiers map to concrete model identifiers inside the adapter.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Send a request and wait for the full response.
    async fn generate(
        &self,
        tier: ModelTier,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, GatewayError>;

    /// Send a request and get a streaming response.
    ///
    /// Default implementation calls `generate()` and wraps the result in a
    /// single `Completed` event.
    async fn generate_streaming(
        &self,
        tier: ModelTier,
        request: &GenerationRequest,
    ) -> Result<StreamHandle, GatewayError> {
        let response = self.generate(tier, request).await?;
        Ok(StreamHandle::completed(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_forwards_deltas() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(StreamEvent::Delta("Hel".into())).await.unwrap();
        tx.send(StreamEvent::Delta("lo".into())).await.unwrap();
        tx.send(StreamEvent::Completed(GenerationResponse::from_text("Hello")))
            .await
            .unwrap();
        drop(tx);

        let mut seen = String::new();
        let response = StreamHandle::new(rx)
            .collect_with(|chunk| seen.push_str(chunk))
            .await
            .unwrap();
        assert_eq!(seen, "Hello");
        assert_eq!(response.text_content(), "Hello");
    }

    #[tokio::test]
    async fn test_collect_error_event() {
        let (tx, rx) = mpsc::channel(1);
        tx.send(StreamEvent::Error("overloaded".into())).await.unwrap();
        let err = StreamHandle::new(rx).collect().await.unwrap_err();
        assert!(matches!(err, GatewayError::RequestFailed(msg) if msg == "overloaded"));
    }

    #[tokio::test]
    async fn test_closed_stream_is_transport_failure() {
        let (tx, rx) = mpsc::channel::<StreamEvent>(1);
        drop(tx);
        let err = StreamHandle::new(rx).collect().await.unwrap_err();
        assert!(matches!(err, GatewayError::TransportClosed));
    }

    #[test]
    fn test_request_builder() {
        let request = GenerationRequest::new("be brief", vec![Message::user("hi")])
            .with_tool_choice(ToolChoice::None);
        assert_eq!(request.tool_choice.as_str(), "none");
        assert!(request.tools.is_empty());
        assert_eq!(ModelTier::Final.to_string(), "final");
    }
}
